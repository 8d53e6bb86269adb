use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::IngestConfig;
use crate::facts::{FactSource, FactsError};
use crate::facts::types::Record;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid request for language '{lang}': {source}")]
    Validation { lang: String, source: FactsError },

    #[error("no facts collected from any language (failed: {})", .failed.join(", "))]
    NoData { failed: Vec<String> },

    #[error("failed to write dataset to {}: {source}", .path.display())]
    Persistence { path: PathBuf, source: io::Error },
}

#[derive(Debug)]
pub struct IngestReport {
    pub records: usize,
    pub failed: Vec<String>,
    pub output: PathBuf,
}

impl IngestReport {
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Wrote {} records to {}",
            self.records,
            self.output.display()
        );
        if !self.failed.is_empty() {
            line.push_str(&format!(
                " ({} failed language(s): {})",
                self.failed.len(),
                self.failed.join(", ")
            ));
        }
        line
    }
}

/// Fetch every configured language in order and persist the combined dataset.
///
/// A language whose request fails upstream is logged and skipped. The run
/// fails when a request is invalid, when nothing was collected, or when the
/// dataset cannot be written.
pub async fn run_ingestion(
    source: &impl FactSource,
    config: &IngestConfig,
) -> Result<IngestReport, IngestError> {
    let mut dataset: Vec<Record> = Vec::new();
    let mut failed = Vec::new();

    for lang in &config.languages {
        debug!(lang = %lang, count = config.count, "fetching facts");
        match source.fetch_language(lang, config.count).await {
            Ok(records) => {
                info!(lang = %lang, records = records.len(), "fetched facts");
                dataset.extend(records);
            }
            Err(e @ FactsError::Validation(_)) => {
                return Err(IngestError::Validation {
                    lang: lang.clone(),
                    source: e,
                });
            }
            Err(e) => {
                warn!(lang = %lang, kind = e.kind(), error = %e, "failed to fetch facts");
                failed.push(lang.clone());
            }
        }
    }

    if dataset.is_empty() {
        return Err(IngestError::NoData { failed });
    }

    write_dataset(&config.output, &dataset)?;

    let report = IngestReport {
        records: dataset.len(),
        failed,
        output: config.output.clone(),
    };
    info!(
        records = report.records,
        failed = ?report.failed,
        output = %report.output.display(),
        "ingestion complete"
    );
    Ok(report)
}

/// Write records as an indented JSON array, creating parent directories.
pub fn write_dataset(path: &Path, records: &[Record]) -> Result<(), IngestError> {
    let persistence = |source: io::Error| IngestError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(persistence)?;
    }

    let mut json = serde_json::to_string_pretty(records).map_err(|e| persistence(e.into()))?;
    json.push('\n');
    fs::write(path, json).map_err(persistence)
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::facts::FactsClient;
    use reqwest::Client;
    use std::time::Duration;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn timeout_for_one_language_does_not_abort_run() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("lang", "eng"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": ["one", "two", "three"]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("lang", "ces"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": ["pozdě"]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config =
            IngestConfig::new(url::Url::parse(&format!("{}/", server.uri())).unwrap());
        config.languages = vec!["eng".into(), "ces".into()];
        config.count = 3;
        config.timeout = Duration::from_millis(200);
        config.output = dir.path().join("requested_dataset.json");

        let client = FactsClient::from_config(Client::new(), &config);
        let report = run_ingestion(&client, &config).await.unwrap();

        assert_eq!(report.records, 3);
        assert_eq!(report.failed, vec!["ces".to_string()]);
        let dataset: Vec<Record> =
            serde_json::from_str(&fs::read_to_string(&config.output).unwrap()).unwrap();
        assert_eq!(dataset.len(), 3);
    }
}
