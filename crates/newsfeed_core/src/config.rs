//! Runtime configuration for the news endpoint, cache and logging.
//!
//! # Invariants
//! - Every field has a default, so an empty or missing file is valid.
//! - `NEWSFEED_API_KEY` overrides the file value when set and non-empty.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_ENV: &str = "NEWSFEED_API_KEY";

const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const DEFAULT_PATH: &str = "/v2/everything";
const DEFAULT_QUERY: &str = "android";
const DEFAULT_DB_FILE: &str = "articles.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Endpoint, cache and logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsConfig {
    pub base_url: String,
    pub path: String,
    /// Search term sent as `q`; omitted when empty.
    pub query: String,
    /// Sent as `apiKey`; omitted when empty.
    pub api_key: String,
    /// `None` keeps the HTTP client's default.
    pub request_timeout_secs: Option<u64>,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
    pub db_path: PathBuf,
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: DEFAULT_PATH.to_string(),
            query: DEFAULT_QUERY.to_string(),
            api_key: String::new(),
            request_timeout_secs: None,
            system_proxy: true,
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_level: None,
            log_dir: None,
        }
    }
}

impl NewsConfig {
    /// Loads config from an optional TOML file, then applies env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn apply_env_overrides(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NewsConfig;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn empty_document_yields_defaults() {
        let config = NewsConfig::from_toml_str("").unwrap();
        assert_eq!(config, NewsConfig::default());
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn file_values_override_defaults() {
        let config = NewsConfig::from_toml_str(
            r#"
            base_url = "http://localhost:8080"
            query = "rust"
            request_timeout_secs = 3
            db_path = "/tmp/news.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.path, "/v2/everything");
        assert_eq!(config.query, "rust");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.db_path, PathBuf::from("/tmp/news.db"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(NewsConfig::from_toml_str("endpoint = \"x\"").is_err());
    }

    #[test]
    fn env_api_key_overrides_file_unless_blank() {
        let mut config = NewsConfig::from_toml_str("api_key = \"from-file\"").unwrap();

        config.apply_env_overrides(Some("   ".to_string()));
        assert_eq!(config.api_key, "from-file");

        config.apply_env_overrides(Some("from-env".to_string()));
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let err = NewsConfig::from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
