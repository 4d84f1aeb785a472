//! Configuration management for the Zero sentiment service.
//!
//! The service reads a single JSON file at `~/.zero/sentiment.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `PORT` → sentiment.port
//! - `ZERO_SENTIMENT_HOST` → sentiment.host
//! - `ZERO_SENTIMENT_RESULTS` → sentiment.results_path
//! - `ZERO_LOG_LEVEL` → observability.log_level
//! - `ZERO_LOG_FORMAT` → observability.log_format

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ResultExt};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new()
        .map_or_else(
            || PathBuf::from(".zero"),
            |dirs| dirs.home_dir().join(".zero"),
        )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("sentiment.json")
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure for the sentiment service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Sentiment ranking service configuration
    #[serde(default)]
    pub sentiment: SentimentConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .context(format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Split out from `apply_env_overrides` so tests do not have to mutate
    /// the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(p) => self.sentiment.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT override"),
            }
        }

        if let Some(host) = lookup("ZERO_SENTIMENT_HOST") {
            self.sentiment.host = host;
        }

        if let Some(path) = lookup("ZERO_SENTIMENT_RESULTS") {
            self.sentiment.results_path = Some(PathBuf::from(path));
        }

        if let Some(level) = lookup("ZERO_LOG_LEVEL") {
            self.observability.log_level = level;
        }

        if let Some(format) = lookup("ZERO_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }

    /// Get the effective bind address as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.sentiment.host, self.sentiment.port)
    }
}

// ============================================================================
// Observability
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Aliases: "level" for backward compatibility with existing config files
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    /// Aliases: "format" for backward compatibility with existing config files
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to exclude from logging.
    ///
    /// These modules will be set to `warn` level to reduce noise.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

// ============================================================================
// Sentiment Service
// ============================================================================

/// Sentiment ranking service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// HTTP host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of entries in each of the rises/falls lists
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Analyse a random sample of this many entities instead of the whole universe
    #[serde(default)]
    pub sample_size: Option<usize>,

    /// Maximum number of entities processed concurrently within a pass
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout for network text sources, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Random delay range `[min, max]` in milliseconds applied after an entity
    /// was served by a network source
    #[serde(default = "default_politeness_delay")]
    pub politeness_delay_ms: [u64; 2],

    /// Trigger a refresh as soon as the service starts
    #[serde(default = "default_true")]
    pub refresh_on_startup: bool,

    /// Periodically trigger a refresh every N seconds (disabled when unset)
    #[serde(default)]
    pub auto_refresh_secs: Option<u64>,

    /// Write the full result table as CSV after each completed pass
    #[serde(default)]
    pub results_path: Option<PathBuf>,

    /// Network text source toggles
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Custom universe; the curated default list is used when unset
    #[serde(default)]
    pub universe: Option<Vec<UniverseEntry>>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            top_n: default_top_n(),
            sample_size: None,
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
            politeness_delay_ms: default_politeness_delay(),
            refresh_on_startup: true,
            auto_refresh_secs: None,
            results_path: None,
            sources: SourcesConfig::default(),
            universe: None,
        }
    }
}

/// Toggles for the network text sources.
///
/// The synthetic fallback cannot be disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Structured news search API
    #[serde(default = "default_true")]
    pub structured_feed: bool,

    /// Headline RSS feed
    #[serde(default = "default_true")]
    pub rss_feed: bool,

    /// Best-effort HTML scrape of the quote news page
    #[serde(default = "default_true")]
    pub html_scrape: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            structured_feed: true,
            rss_feed: true,
            html_scrape: true,
        }
    }
}

/// A single universe entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseEntry {
    /// Ticker symbol
    pub symbol: String,
    /// Company display name
    pub name: String,
}

// ============================================================================
// Defaults
// ============================================================================

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "pretty".into()
}
fn default_true() -> bool {
    true
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    5000
}
fn default_top_n() -> usize {
    10
}
fn default_concurrency() -> usize {
    4
}
fn default_request_timeout() -> u64 {
    10
}
fn default_politeness_delay() -> [u64; 2] {
    [500, 1500]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sentiment.port, 5000);
        assert_eq!(config.sentiment.top_n, 10);
        assert_eq!(config.sentiment.request_timeout_secs, 10);
        assert_eq!(config.sentiment.politeness_delay_ms, [500, 1500]);
        assert!(config.sentiment.sources.rss_feed);
        assert!(config.sentiment.universe.is_none());
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "observability": { "level": "debug" },
            "sentiment": {
                "port": 8080,
                "sample_size": 20,
                "sources": { "html_scrape": false },
                "universe": [{ "symbol": "AAPL", "name": "Apple Inc." }]
            }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, "pretty");
        assert_eq!(config.sentiment.port, 8080);
        assert_eq!(config.sentiment.sample_size, Some(20));
        assert_eq!(config.sentiment.concurrency, 4);
        assert!(config.sentiment.sources.structured_feed);
        assert!(!config.sentiment.sources.html_scrape);
        assert_eq!(config.sentiment.universe.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("ZERO_SENTIMENT_HOST", "0.0.0.0"),
            ("ZERO_LOG_FORMAT", "json"),
            ("ZERO_SENTIMENT_RESULTS", "/tmp/results.csv"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.observability.log_format, "json");
        assert_eq!(
            config.sentiment.results_path,
            Some(PathBuf::from("/tmp/results.csv"))
        );
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.sentiment.port, 5000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment.json");
        fs::write(&path, r#"{ "sentiment": { "top_n": 5 } }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.sentiment.top_n, 5);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        match err {
            crate::Error::WithContext { source, .. } => {
                assert!(matches!(*source, crate::Error::Json(_)))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config from"));
        assert!(matches!(
            err,
            crate::Error::WithContext { ref source, .. } if matches!(**source, crate::Error::Io(_))
        ));
    }
}
