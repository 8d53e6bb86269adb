//! Meowfacts API client: one bounded GET per language, normalized into records.

pub mod types;

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{IngestConfig, MAX_COUNT, MIN_COUNT, is_language_code};
use types::{Record, extract_facts, normalize, processing_timestamp};

#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    ConnectionFailure(String),

    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FactsError {
    /// Short label for the failing stage, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FactsError::Validation(_) => "validation",
            FactsError::Timeout => "timeout",
            FactsError::ConnectionFailure(_) => "connection",
            FactsError::Upstream { .. } => "upstream",
            FactsError::MalformedResponse(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for FactsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FactsError::Timeout
        } else if e.is_decode() {
            FactsError::MalformedResponse(e.to_string())
        } else if let Some(status) = e.status() {
            FactsError::Upstream {
                status: status.as_u16(),
            }
        } else {
            FactsError::ConnectionFailure(e.to_string())
        }
    }
}

/// Source of facts for one language.
/// Implemented by `FactsClient` for production; mock implementations used in tests.
pub trait FactSource {
    async fn fetch_language(&self, lang: &str, count: u32) -> Result<Vec<Record>, FactsError>;
}

#[derive(Clone)]
pub struct FactsClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl FactsClient {
    pub fn new(http: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            http,
            endpoint,
            timeout,
        }
    }

    pub fn from_config(http: Client, config: &IngestConfig) -> Self {
        Self::new(http, config.endpoint.clone(), config.timeout)
    }

    fn request_url(&self, lang: &str, count: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lang", lang)
            .append_pair("count", &count.to_string());
        url
    }

    async fn get_body(&self, lang: &str, count: u32) -> Result<Value, FactsError> {
        let url = self.request_url(lang, count);
        debug!(%url, "requesting facts");

        let response = self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactsError::Upstream {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| FactsError::MalformedResponse(e.to_string()))
    }
}

impl FactSource for FactsClient {
    async fn fetch_language(&self, lang: &str, count: u32) -> Result<Vec<Record>, FactsError> {
        validate_request(lang, count)?;
        let body = self.get_body(lang, count).await?;
        let timestamp = processing_timestamp();
        let records = normalize(lang, extract_facts(lang, body), &timestamp);
        debug!(lang, records = records.len(), "facts normalized");
        Ok(records)
    }
}

/// Reject a request before it touches the network.
pub fn validate_request(lang: &str, count: u32) -> Result<(), FactsError> {
    if lang.trim().is_empty() {
        return Err(FactsError::Validation("language code must not be empty".into()));
    }
    if !is_language_code(lang) {
        return Err(FactsError::Validation(format!(
            "invalid language code '{lang}': use ASCII letters, digits or '-'"
        )));
    }
    if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
        return Err(FactsError::Validation(format!(
            "count must be between {MIN_COUNT} and {MAX_COUNT}, got {count}"
        )));
    }
    Ok(())
}
