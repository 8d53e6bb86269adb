use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://meowfacts.herokuapp.com/";
pub const DEFAULT_COUNT: u32 = 200;
pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_DATASET_PATH: &str = "requested_dataset.json";
pub const DEFAULT_CSV_PATH: &str = "table_dataset.csv";
pub const DEFAULT_XLSX_PATH: &str = "table_dataset.xlsx";

/// Languages served by the Meowfacts API, in request order.
pub const SUPPORTED_LANGUAGES: [&str; 13] = [
    "eng", "ces", "ger", "ben", "esp", "rus", "por", "fil", "ukr", "urd", "ita", "zho", "kor",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid endpoint URL '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        source: url::ParseError,
    },

    #[error("endpoint must be HTTP(S), got '{0}'")]
    InvalidScheme(String),

    #[error("no languages configured")]
    NoLanguages,

    #[error("invalid language code '{0}'")]
    InvalidLanguage(String),

    #[error("count must be between 1 and 1000, got {0}")]
    CountOutOfRange(u32),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Settings for one ingestion run.
///
/// Built by [`IngestConfig::from_env`] (defaults plus `MEOWFACTS_URL`),
/// then overlaid with CLI flags.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub endpoint: Url,
    pub languages: Vec<String>,
    pub count: u32,
    pub timeout: Duration,
    pub output: PathBuf,
}

impl IngestConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            languages: SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            count: DEFAULT_COUNT,
            timeout: DEFAULT_TIMEOUT,
            output: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("MEOWFACTS_URL")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if let Some(url) = &url {
            debug!(%url, "endpoint overridden from MEOWFACTS_URL");
        }
        let endpoint = parse_endpoint(url.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
        Ok(Self::new(endpoint))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        if let Some(bad) = self.languages.iter().find(|l| !is_language_code(l)) {
            return Err(ConfigError::InvalidLanguage(bad.clone()));
        }
        if !(MIN_COUNT..=MAX_COUNT).contains(&self.count) {
            return Err(ConfigError::CountOutOfRange(self.count));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Input and output locations for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub input: PathBuf,
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_DATASET_PATH),
            csv: PathBuf::from(DEFAULT_CSV_PATH),
            xlsx: PathBuf::from(DEFAULT_XLSX_PATH),
        }
    }
}

/// Non-empty, ASCII letters, digits or `-`.
pub fn is_language_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> IngestConfig {
        IngestConfig::new(parse_endpoint(DEFAULT_ENDPOINT).unwrap())
    }

    #[test]
    fn defaults_are_valid() {
        let config = default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.languages.first().map(String::as_str), Some("eng"));
        assert_eq!(config.languages.len(), 13);
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.output, PathBuf::from("requested_dataset.json"));
    }

    #[test]
    fn validate_rejects_count_out_of_range() {
        let mut config = default_config();
        config.count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::CountOutOfRange(0))));
        config.count = 1001;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CountOutOfRange(1001))
        ));
        config.count = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_language_list() {
        let config = IngestConfig {
            languages: vec![],
            ..default_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoLanguages)));
    }

    #[test]
    fn validate_rejects_bad_language_code() {
        let config = IngestConfig {
            languages: vec!["eng".into(), "".into()],
            ..default_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLanguage(_))));
        assert!(!is_language_code("en g"));
        assert!(is_language_code("zh-hant"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = IngestConfig {
            timeout: Duration::ZERO,
            ..default_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn parse_endpoint_rejects_non_http() {
        assert!(matches!(
            parse_endpoint("ftp://example.com/"),
            Err(ConfigError::InvalidScheme(_))
        ));
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn parse_endpoint_accepts_local_mock() {
        assert!(parse_endpoint("http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn export_defaults_match_dataset_path() {
        let export = ExportConfig::default();
        assert_eq!(export.input, PathBuf::from(DEFAULT_DATASET_PATH));
        assert_eq!(export.csv, PathBuf::from("table_dataset.csv"));
        assert_eq!(export.xlsx, PathBuf::from("table_dataset.xlsx"));
    }
}
