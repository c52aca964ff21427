//! HTTP client for the Noga ISO API gateway.

use std::time::Duration;

use serde_json::Value;

use crate::{range::DateRange, Error};

/// Header carrying the per-dataset subscription credential.
const SUBSCRIPTION_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Fixed bound on each request-response exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for one gateway product. Datasets use distinct subscription keys,
/// so the caller creates one client per dataset.
pub struct Client {
    http: reqwest::Client,
    subscription_key: String,
}

impl Client {
    /// Creates a client with the standard 60-second exchange timeout.
    pub fn new(subscription_key: String) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport {
                context: "building HTTP client".to_string(),
                source: e,
            })?;
        Ok(Self {
            http,
            subscription_key,
        })
    }

    /// Performs one exchange against a single endpoint and returns the
    /// decoded body unaltered.
    pub async fn fetch_raw(&self, endpoint: &str, range: &DateRange) -> Result<Value, Error> {
        let payload = serde_json::json!({
            "fromDate": range.from_param(),
            "toDate": range.to_param(),
        });

        let resp = self
            .http
            .post(endpoint)
            .header(SUBSCRIPTION_HEADER, &self.subscription_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %endpoint, error = %e, "exchange failed");
                Error::Transport {
                    context: endpoint.to_string(),
                    source: e,
                }
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!(endpoint = %endpoint, error = %e, "failed to read response body");
            Error::Transport {
                context: endpoint.to_string(),
                source: e,
            }
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!(endpoint = %endpoint, status = %status, body = %snippet, "upstream error");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(endpoint = %endpoint, error = %e, "response body is not JSON");
            Error::Schema(format!("response body is not valid JSON: {e}"))
        })
    }

    /// Scans an ordered list of candidate endpoints, returning the first
    /// successful response. Exhaustion yields [`Error::Exhausted`] carrying
    /// every attempt's cause — intermediate failures are never swallowed.
    pub async fn fetch(&self, endpoints: &[String], range: &DateRange) -> Result<Value, Error> {
        let mut failures = Vec::new();
        for endpoint in endpoints {
            match self.fetch_raw(endpoint, range).await {
                Ok(raw) => return Ok(raw),
                Err(err) => {
                    tracing::warn!(endpoint = %endpoint, error = %err, "candidate endpoint failed");
                    failures.push(err);
                }
            }
        }
        Err(Error::Exhausted(failures))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
