//! Mail delivery for produced workbooks.
//!
//! Two transports are supported: the SendGrid HTTP API and direct SMTP
//! submission. Both take the same inputs — a subject, a plain-text body,
//! and a list of workbook paths — and both treat a missing file as a
//! skipped attachment rather than a failure.

use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;

use crate::config::{DeliveryMethod, EmailConfig, SendgridConfig, SmtpConfig};
use crate::error::ReportError;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Environment fallback for the SendGrid credential.
const SENDGRID_KEY_ENV: &str = "SENDGRID_API_KEY";

pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Sends one message with the given files attached.
    ///
    /// Files that cannot be read are skipped with a warning. Returns
    /// `Ok(false)` when nothing was attachable and the send was skipped
    /// entirely.
    pub async fn deliver(
        &self,
        subject: &str,
        body: &str,
        files: &[PathBuf],
    ) -> Result<bool, ReportError> {
        let attachments = load_attachments(files);
        if attachments.is_empty() {
            tracing::warn!(subject = %subject, "no attachable files, skipping delivery");
            return Ok(false);
        }

        match self.config.method {
            DeliveryMethod::Smtp => self.send_smtp(subject, body, &attachments).await?,
            DeliveryMethod::Sendgrid => self.send_sendgrid(subject, body, &attachments).await?,
        }
        Ok(true)
    }

    async fn send_smtp(
        &self,
        subject: &str,
        body: &str,
        attachments: &[(String, Vec<u8>)],
    ) -> Result<(), ReportError> {
        let smtp = self.config.smtp.as_ref().ok_or_else(|| {
            ReportError::Config("email.method = \"smtp\" requires an [email.smtp] section".to_string())
        })?;
        let transport = build_smtp_transport(smtp)?;
        let from: Mailbox = self.config.from_address.parse()?;
        let content_type =
            ContentType::parse(XLSX_MIME).map_err(|e| ReportError::Delivery(e.to_string()))?;

        for recipient in &self.config.recipients {
            let to: Mailbox = match recipient.parse() {
                Ok(mailbox) => mailbox,
                Err(e) => {
                    tracing::error!(recipient = %recipient, error = %e,
                        "invalid recipient address, skipping");
                    continue;
                }
            };

            let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
            for (name, bytes) in attachments {
                parts = parts.singlepart(
                    Attachment::new(name.clone()).body(bytes.clone(), content_type.clone()),
                );
            }

            let message = Message::builder()
                .from(from.clone())
                .to(to)
                .subject(subject)
                .multipart(parts)?;

            match transport.send(message).await {
                Ok(_) => {
                    tracing::info!(recipient = %recipient, subject = %subject, "mail sent")
                }
                Err(e) => {
                    tracing::error!(recipient = %recipient, error = %e, "failed to send mail")
                }
            }
        }
        Ok(())
    }

    async fn send_sendgrid(
        &self,
        subject: &str,
        body: &str,
        attachments: &[(String, Vec<u8>)],
    ) -> Result<(), ReportError> {
        let default_config = SendgridConfig::default();
        let sendgrid = self.config.sendgrid.as_ref().unwrap_or(&default_config);
        let api_key = sendgrid
            .api_key
            .clone()
            .or_else(|| std::env::var(SENDGRID_KEY_ENV).ok())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "no SendGrid API key: set email.sendgrid.api_key or {SENDGRID_KEY_ENV}"
                ))
            })?;

        let engine = base64::engine::general_purpose::STANDARD;
        let encoded: Vec<serde_json::Value> = attachments
            .iter()
            .map(|(name, bytes)| {
                json!({
                    "content": engine.encode(bytes),
                    "filename": name,
                    "type": XLSX_MIME,
                    "disposition": "attachment",
                })
            })
            .collect();
        let to: Vec<serde_json::Value> = self
            .config
            .recipients
            .iter()
            .map(|r| json!({"email": r}))
            .collect();
        let payload = json!({
            "personalizations": [{"to": to}],
            "from": {"email": self.config.from_address},
            "subject": subject,
            "content": [{"type": "text/plain", "value": body}],
            "attachments": encoded,
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ReportError::Delivery(e.to_string()))?;
        let url = format!("{}/v3/mail/send", sendgrid.api_url.trim_end_matches('/'));
        let resp = client
            .post(&url)
            .bearer_auth(&api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ReportError::Delivery(format!("SendGrid request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ReportError::Delivery(format!(
                "SendGrid returned HTTP {status}: {}",
                truncate(&detail)
            )));
        }
        tracing::info!(status = %status, subject = %subject, "mail accepted by SendGrid");
        Ok(())
    }
}

fn build_smtp_transport(
    smtp: &SmtpConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, ReportError> {
    let creds = Credentials::new(smtp.username.clone(), smtp.password.clone());
    let transport = if smtp.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
            .port(smtp.port)
            .credentials(creds)
            .build()
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
            .port(smtp.port)
            .credentials(creds)
            .build()
    };
    Ok(transport)
}

fn load_attachments(files: &[PathBuf]) -> Vec<(String, Vec<u8>)> {
    let mut attachments = Vec::new();
    for path in files {
        match std::fs::read(path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("report.xlsx")
                    .to_string();
                attachments.push((name, bytes));
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping missing attachment")
            }
        }
    }
    attachments
}

fn truncate(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
