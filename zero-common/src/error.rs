//! Error types for configuration handling.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias using the shared error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or checking service configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Attach context to any error convertible into [`Error`].
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}
