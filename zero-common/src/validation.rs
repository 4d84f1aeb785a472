//! Configuration validation for the sentiment service.
//!
//! Rejects values that would make a refresh pass meaningless or a
//! politeness delay impossible to sample.

use std::collections::HashSet;
use thiserror::Error;

use crate::config::{Config, ObservabilityConfig, SentimentConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port {port}: must be between 1 and 65535")]
    InvalidPort { port: u16, field: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.sentiment.validate() {
            errors.push(e);
        }

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load (with environment overrides) and validate configuration.
    pub fn load_and_validate() -> crate::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for SentimentConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort {
                port: self.port,
                field: "sentiment.port".into(),
            });
        }

        if self.top_n == 0 {
            return Err(ValidationError::InvalidValue {
                field: "sentiment.top_n".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.concurrency == 0 {
            return Err(ValidationError::InvalidValue {
                field: "sentiment.concurrency".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.sample_size == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "sentiment.sample_size".into(),
                reason: "must be greater than 0 when set".into(),
            });
        }

        if self.auto_refresh_secs == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "sentiment.auto_refresh_secs".into(),
                reason: "must be greater than 0 when set".into(),
            });
        }

        let [min, max] = self.politeness_delay_ms;
        if min > max {
            return Err(ValidationError::InvalidValue {
                field: "sentiment.politeness_delay_ms".into(),
                reason: format!("minimum {min} exceeds maximum {max}"),
            });
        }

        if let Some(ref universe) = self.universe {
            let mut seen = HashSet::new();
            for entry in universe {
                if entry.symbol.trim().is_empty() {
                    return Err(ValidationError::MissingField {
                        field: "sentiment.universe[].symbol".into(),
                    });
                }
                if !seen.insert(entry.symbol.as_str()) {
                    return Err(ValidationError::Conflict {
                        reason: format!("symbol {} appears more than once in sentiment.universe", entry.symbol),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UniverseEntry;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.observability.log_level = "invalid".into();
        let result = config.validate();
        assert!(matches!(
            result,
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "observability.log_level"
        ));
    }

    #[test]
    fn test_zero_top_n() {
        let mut config = Config::default();
        config.sentiment.top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency() {
        let mut config = Config::default();
        config.sentiment.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_delay_range() {
        let mut config = Config::default();
        config.sentiment.politeness_delay_ms = [2000, 100];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("politeness_delay_ms"));
    }

    #[test]
    fn test_zero_delay_range_is_valid() {
        let mut config = Config::default();
        config.sentiment.politeness_delay_ms = [0, 0];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_universe_symbol() {
        let mut config = Config::default();
        config.sentiment.universe = Some(vec![
            UniverseEntry { symbol: "AAPL".into(), name: "Apple Inc.".into() },
            UniverseEntry { symbol: "AAPL".into(), name: "Apple again".into() },
        ]);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::Conflict { .. })
        ));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = Config::default();
        config.sentiment.top_n = 0;
        config.observability.log_format = "xml".into();
        assert!(matches!(config.validate(), Err(ValidationError::Multiple(ref e)) if e.len() == 2));
    }
}
