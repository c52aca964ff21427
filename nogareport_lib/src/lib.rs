//! Library layer for the Noga report pipeline: dataset registry,
//! configuration, fetch orchestration, workbook output, summary building,
//! and mail delivery.
//!
//! Wraps the `noga_api` client crate with everything the daily report run
//! needs around it.

pub mod config;
pub mod dataset;
pub mod error;
pub mod mailer;
pub mod runner;
pub mod summary;
pub mod workbook;

pub use noga_api;
pub use noga_api::types;

pub use config::{Config, DeliveryMethod, EmailConfig};
pub use dataset::{DatasetKey, DatasetSpec};
pub use error::ReportError;
pub use mailer::Mailer;
pub use runner::{run_all, run_dataset, DatasetOutcome};
