//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping fetch errors and adding
/// configuration, workbook, and delivery failures.
#[derive(Debug)]
pub enum ReportError {
    /// An error from the gateway client or normalizer.
    Api(noga_api::Error),
    /// Configuration could not be read or failed validation.
    Config(String),
    /// A workbook could not be written or read back.
    Workbook(String),
    /// Mail could not be built or handed to the transport.
    Delivery(String),
    /// Filesystem I/O failed.
    Io(std::io::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Workbook(msg) => write!(f, "Workbook error: {}", msg),
            Self::Delivery(msg) => write!(f, "Delivery error: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<noga_api::Error> for ReportError {
    fn from(e: noga_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook(e.to_string())
    }
}

impl From<calamine::XlsxError> for ReportError {
    fn from(e: calamine::XlsxError) -> Self {
        Self::Workbook(e.to_string())
    }
}

impl From<lettre::error::Error> for ReportError {
    fn from(e: lettre::error::Error) -> Self {
        Self::Delivery(e.to_string())
    }
}

impl From<lettre::address::AddressError> for ReportError {
    fn from(e: lettre::address::AddressError) -> Self {
        Self::Delivery(e.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for ReportError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        Self::Delivery(e.to_string())
    }
}
