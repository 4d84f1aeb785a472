//! Error types for zero-sentiment.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::any::Any;

/// Pass-level and service errors.
///
/// Per-source acquisition failures are [`crate::sources::SourceError`] and
/// never surface here; the source chain absorbs them.
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    #[error("Universe catalog is empty")]
    EmptyCatalog,

    #[error("Refresh pass failed: {0}")]
    Pass(String),

    #[error("Results export failed: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for SentimentError {
    fn from(e: csv::Error) -> Self {
        Self::Export(e.to_string())
    }
}

impl From<std::io::Error> for SentimentError {
    fn from(e: std::io::Error) -> Self {
        Self::Export(e.to_string())
    }
}

impl IntoResponse for SentimentError {
    fn into_response(self) -> Response {
        let status = match &self {
            SentimentError::EmptyCatalog | SentimentError::Config(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Message carried by a panic payload, when it is a string.
pub(crate) fn panic_text(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SentimentError::EmptyCatalog.to_string(),
            "Universe catalog is empty"
        );
        assert_eq!(
            SentimentError::Pass("boom".into()).to_string(),
            "Refresh pass failed: boom"
        );
    }

    #[test]
    fn test_io_error_maps_to_export() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: SentimentError = io.into();
        assert!(matches!(err, SentimentError::Export(_)));
    }

    #[test]
    fn test_into_response_status() {
        let response = SentimentError::EmptyCatalog.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = SentimentError::Export("disk full".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_panic_text() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_text(&*boxed), Some("boom"));

        let boxed: Box<dyn Any + Send> = Box::new(String::from("bad index"));
        assert_eq!(panic_text(&*boxed), Some("bad index"));

        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_text(&*boxed), None);
    }
}
