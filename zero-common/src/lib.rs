//! Zero Common - Shared configuration, logging and error types for the Zero
//! sentiment service.
//!
//! This crate provides:
//! - Configuration types and loading (file + environment overrides)
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup with noise filtering
//! - Small string utilities shared by the service crates

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{
    Config, ObservabilityConfig, SentimentConfig, SourcesConfig, UniverseEntry,
};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};
