//! Text acquisition for a single entity.
//!
//! Each strategy implements [`TextSource`]. The [`SourceChain`] tries them in
//! priority order and stops at the first one that yields at least one text.
//! When every network strategy fails, the synthetic fallback produces a
//! deterministic set of phrases, so acquisition never comes back empty.
//!
//! ```text
//! structured feed (10) ─► RSS feed (20) ─► HTML scrape (30) ─► synthetic
//! ```

pub mod chain;
pub mod health;
pub mod rss_feed;
pub mod scrape;
pub mod structured;
pub mod synthetic;

pub use chain::SourceChain;
pub use health::{SourceHealth, SourceHealthTracker};
pub use rss_feed::RssFeedSource;
pub use scrape::{extract_headlines, HtmlScrapeSource};
pub use structured::StructuredFeedSource;
pub use synthetic::SyntheticSource;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::universe::Entity;

/// Maximum number of texts kept from any single strategy.
pub const MAX_TEXTS: usize = 10;

/// Browser user agent sent by the network strategies.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// ============================================================================
// Text Batch
// ============================================================================

/// Texts acquired for one entity by one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBatch {
    /// Entity symbol
    pub symbol: String,
    /// Name of the strategy that produced the texts
    pub source: &'static str,
    /// Whether the strategy went over the network
    pub network: bool,
    /// Between 0 and [`MAX_TEXTS`] raw texts, in source order
    pub texts: Vec<String>,
}

// ============================================================================
// Source Error
// ============================================================================

/// Why a single strategy produced nothing for an entity.
#[derive(Debug, Clone)]
pub enum SourceError {
    /// Connection failure or timeout
    Network(String),
    /// Non-success HTTP status
    Status(u16),
    /// Response body could not be parsed
    Parse(String),
    /// Request succeeded but yielded no usable text
    Empty,
    /// Strategy panicked while fetching
    Panicked(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Status(code) => write!(f, "HTTP status {}", code),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::Empty => write!(f, "No texts found"),
            Self::Panicked(msg) => write!(f, "Strategy panicked: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    /// Failure happened before a usable response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

// ============================================================================
// Text Source Trait
// ============================================================================

/// A fallible text acquisition strategy.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Strategy name (e.g., "rss_feed")
    fn name(&self) -> &'static str;

    /// Position in the chain (lower = tried first)
    fn priority(&self) -> u8;

    /// Whether fetching touches the network.
    fn is_network(&self) -> bool {
        true
    }

    /// Fetch up to [`MAX_TEXTS`] texts for an entity.
    async fn fetch(&self, entity: &Entity) -> Result<Vec<String>, SourceError>;
}

/// Keep trimmed, non-empty texts, capped at [`MAX_TEXTS`].
pub(crate) fn clean_texts<I, S>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .take(MAX_TEXTS)
        .collect()
}

/// Build the HTTP client shared by the network strategies.
pub fn http_client(timeout_secs: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        assert_eq!(SourceError::Status(404).to_string(), "HTTP status 404");
        assert_eq!(SourceError::Empty.to_string(), "No texts found");
        assert_eq!(
            SourceError::Network("connection refused".into()).to_string(),
            "Network error: connection refused"
        );
    }

    #[test]
    fn test_is_transport() {
        assert!(SourceError::Network("x".into()).is_transport());
        assert!(SourceError::Status(503).is_transport());
        assert!(!SourceError::Parse("x".into()).is_transport());
        assert!(!SourceError::Empty.is_transport());
    }

    #[test]
    fn test_clean_texts() {
        let texts = clean_texts(["  a  ", "", "   ", "b"]);
        assert_eq!(texts, vec!["a", "b"]);

        let many: Vec<String> = (0..25).map(|i| format!("headline {i}")).collect();
        assert_eq!(clean_texts(&many).len(), MAX_TEXTS);
    }
}
