use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Overrides `ingest.incoming_file` when set.
pub const INCOMING_FILE_ENV: &str = "INCOMING_FILE_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default)]
    pub key_prefix: Option<String>,
    #[serde(
        default = "default_store_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreBackend::default(),
            url: default_store_url(),
            key_prefix: None,
            timeout: default_store_timeout(),
        }
    }
}

fn default_store_url() -> String {
    "redis://redis:6379/0".to_string()
}

fn default_store_timeout() -> Duration {
    Duration::from_secs(2)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub incoming_file: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Reads `path` if given, falls back to defaults otherwise, then applies
    /// environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.override_incoming_file(std::env::var(INCOMING_FILE_ENV).ok());
        Ok(config)
    }

    fn override_incoming_file(&mut self, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.ingest.incoming_file = Some(PathBuf::from(value));
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.web.bind, "0.0.0.0:5000");
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.store.url, "redis://redis:6379/0");
        assert_eq!(config.store.timeout, Duration::from_secs(2));
        assert!(config.store.key_prefix.is_none());
        assert!(config.ingest.incoming_file.is_none());
    }

    #[test]
    fn reads_all_sections_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "\
web:
  bind: 127.0.0.1:8080
store:
  backend: memory
  url: redis://localhost:6380/2
  key_prefix: devices
  timeout: 750ms
ingest:
  incoming_file: /data/samples.csv
"
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:8080");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.url, "redis://localhost:6380/2");
        assert_eq!(config.store.key_prefix.as_deref(), Some("devices"));
        assert_eq!(config.store.timeout, Duration::from_millis(750));
        assert_eq!(
            config.ingest.incoming_file,
            Some(PathBuf::from("/data/samples.csv"))
        );
    }

    #[test]
    fn rejects_bad_timeout() {
        let result = serde_yaml::from_str::<Config>("store:\n  timeout: soon\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Config::from_file("/nonexistent/config.yaml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn incoming_file_override() {
        let mut config = Config::default();
        config.override_incoming_file(Some("  ".into()));
        assert!(config.ingest.incoming_file.is_none());

        config.override_incoming_file(Some("/tmp/in.csv".into()));
        assert_eq!(
            config.ingest.incoming_file,
            Some(PathBuf::from("/tmp/in.csv"))
        );

        config.override_incoming_file(None);
        assert!(config.ingest.incoming_file.is_some());
    }
}
