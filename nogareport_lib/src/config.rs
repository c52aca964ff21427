//! Configuration loading and validation.
//!
//! A single TOML file describes where workbooks go and how mail is sent.
//! Dataset definitions default to the built-in production registry; the
//! file can override endpoints, history starts, and workbook names per
//! feed. Subscription keys never need to live in the file — each feed has
//! an environment variable fallback.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::dataset::{DatasetKey, DatasetSpec};
use crate::error::ReportError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    /// Required for the report pipeline; fetch-only runs work without it.
    #[serde(default)]
    pub email: Option<EmailConfig>,
    /// Per-feed overrides; feeds not listed use the built-in definitions.
    #[serde(default)]
    pub datasets: Vec<DatasetOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Which transport carries the report mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// The SendGrid HTTP API.
    #[default]
    Sendgrid,
    /// Direct SMTP submission.
    Smtp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub method: DeliveryMethod,
    pub from_address: String,
    pub recipients: Vec<String>,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub sendgrid: Option<SendgridConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendgridConfig {
    /// Falls back to the `SENDGRID_API_KEY` environment variable when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_sendgrid_url")]
    pub api_url: String,
}

impl Default for SendgridConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_sendgrid_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetOverride {
    pub key: DatasetKey,
    #[serde(default)]
    pub subscription_key: Option<String>,
    #[serde(default)]
    pub endpoints: Option<Vec<String>>,
    #[serde(default)]
    pub history_start: Option<NaiveDate>,
    #[serde(default)]
    pub workbook_name: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_smtp_port() -> u16 {
    587
}

fn default_use_tls() -> bool {
    true
}

fn default_sendgrid_url() -> String {
    "https://api.sendgrid.com".to_string()
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ReportError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ReportError> {
        let Some(ref email) = self.email else {
            return Ok(());
        };
        if email.from_address.is_empty() {
            return Err(ReportError::Config("email.from_address must be set".to_string()));
        }
        if email.recipients.is_empty() {
            return Err(ReportError::Config(
                "email.recipients must contain at least one address".to_string(),
            ));
        }
        if email.method == DeliveryMethod::Smtp && email.smtp.is_none() {
            return Err(ReportError::Config(
                "email.method = \"smtp\" requires an [email.smtp] section".to_string(),
            ));
        }
        Ok(())
    }

    /// Materializes the dataset registry: built-in definitions with file
    /// overrides applied in order, and subscription keys resolved, config
    /// file first, then the feed's environment variable.
    pub fn resolved_datasets(&self) -> Result<Vec<DatasetSpec>, ReportError> {
        DatasetKey::ALL
            .iter()
            .map(|&key| {
                let mut spec = DatasetSpec::builtin(key);
                let mut configured = None;
                for over in self.datasets.iter().filter(|d| d.key == key) {
                    if let Some(ref endpoints) = over.endpoints {
                        spec.endpoints = endpoints.clone();
                    }
                    if let Some(history_start) = over.history_start {
                        spec.history_start = history_start;
                    }
                    if let Some(ref workbook_name) = over.workbook_name {
                        spec.workbook_name = workbook_name.clone();
                    }
                    if let Some(ref subscription_key) = over.subscription_key {
                        configured = Some(subscription_key.clone());
                    }
                }
                if spec.endpoints.is_empty() {
                    return Err(ReportError::Config(format!(
                        "dataset '{key}' has no endpoints"
                    )));
                }
                match configured.or_else(|| std::env::var(key.key_env_var()).ok()) {
                    Some(k) if !k.is_empty() => spec.subscription_key = k,
                    _ => {
                        return Err(ReportError::Config(format!(
                            "no subscription key for dataset '{key}': set it in the config file or via {}",
                            key.key_env_var()
                        )))
                    }
                }
                Ok(spec)
            })
            .collect()
    }
}
