//! Error types for the gateway client and normalizer.

/// Errors that can occur while fetching or flattening a dataset response.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The network exchange could not complete (connection failure or timeout).
    #[error("transport failure: {context}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint was reachable but answered with a non-success status.
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16, body: String },
    /// The response decoded but its structure is not one the normalizer recognizes.
    #[error("unexpected response structure: {0}")]
    Schema(String),
    /// Every candidate endpoint failed. Carries each attempt's cause in scan order.
    #[error("all {} candidate endpoints failed", .0.len())]
    Exhausted(Vec<Error>),
}
