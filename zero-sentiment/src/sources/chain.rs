//! Ordered fallback across text strategies.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

use zero_common::config::SentimentConfig;

use super::health::{SourceHealth, SourceHealthTracker};
use super::{
    http_client, HtmlScrapeSource, RssFeedSource, SourceError, StructuredFeedSource,
    SyntheticSource, TextBatch, TextSource,
};
use crate::error::{panic_text, SentimentError};
use crate::universe::Entity;

/// Tries network strategies in priority order, then the synthetic fallback.
///
/// `acquire` never fails and never returns an empty batch.
pub struct SourceChain {
    /// Strategies sorted by priority
    sources: Vec<Arc<dyn TextSource>>,
    /// Terminal strategy
    fallback: SyntheticSource,
    /// Per-strategy counters
    health: SourceHealthTracker,
}

impl Default for SourceChain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SourceChain {
    /// Build a chain from arbitrary strategies; the synthetic fallback is
    /// always appended.
    pub fn new(mut sources: Vec<Arc<dyn TextSource>>) -> Self {
        sources.sort_by_key(|s| s.priority());

        let mut names: Vec<&'static str> = sources.iter().map(|s| s.name()).collect();
        names.push(SyntheticSource::NAME);

        Self {
            sources,
            fallback: SyntheticSource,
            health: SourceHealthTracker::new(&names),
        }
    }

    /// Build the production chain from configuration.
    pub fn from_config(config: &SentimentConfig) -> Result<Self, SentimentError> {
        let client = http_client(config.request_timeout_secs)
            .map_err(|e| SentimentError::Config(format!("HTTP client: {}", e)))?;

        let mut sources: Vec<Arc<dyn TextSource>> = Vec::new();
        if config.sources.structured_feed {
            sources.push(Arc::new(StructuredFeedSource::new(client.clone())));
        }
        if config.sources.rss_feed {
            sources.push(Arc::new(RssFeedSource::new(client.clone())));
        }
        if config.sources.html_scrape {
            sources.push(Arc::new(HtmlScrapeSource::new(client)));
        }

        Ok(Self::new(sources))
    }

    /// Strategy names in the order they are tried.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once(SyntheticSource::NAME))
            .collect()
    }

    /// Acquire texts for one entity.
    ///
    /// A strategy that errors or panics is recorded as a failure and the
    /// next one is tried.
    pub async fn acquire(&self, entity: &Entity) -> TextBatch {
        for source in &self.sources {
            let name = source.name();

            match fetch_guarded(source.as_ref(), entity).await {
                Ok(texts) if !texts.is_empty() => {
                    self.health.record_success(name).await;
                    debug!(
                        symbol = %entity.symbol,
                        source = name,
                        count = texts.len(),
                        "Acquired texts"
                    );
                    return TextBatch {
                        symbol: entity.symbol.clone(),
                        source: name,
                        network: source.is_network(),
                        texts,
                    };
                }
                Ok(_) => {
                    self.health.record_failure(name, "No texts found").await;
                    debug!(symbol = %entity.symbol, source = name, "Source returned no texts");
                }
                Err(e) => {
                    self.health.record_failure(name, &e.to_string()).await;
                    match &e {
                        SourceError::Panicked(_) => error!(
                            symbol = %entity.symbol,
                            source = name,
                            error = %e,
                            "Source panicked, falling back"
                        ),
                        e if e.is_transport() => warn!(
                            symbol = %entity.symbol,
                            source = name,
                            error = %e,
                            "Source failed, falling back"
                        ),
                        _ => debug!(
                            symbol = %entity.symbol,
                            source = name,
                            error = %e,
                            "Source had nothing usable"
                        ),
                    }
                }
            }
        }

        self.health.record_success(SyntheticSource::NAME).await;
        if !self.sources.is_empty() {
            warn!(symbol = %entity.symbol, "No real news found, using synthetic texts");
        }

        TextBatch {
            symbol: entity.symbol.clone(),
            source: SyntheticSource::NAME,
            network: false,
            texts: self.fallback.generate(entity),
        }
    }

    /// Per-strategy statistics in chain order.
    pub async fn stats(&self) -> Vec<SourceHealth> {
        self.health.snapshot().await
    }
}

/// Run one strategy, turning a panic into [`SourceError::Panicked`].
async fn fetch_guarded(source: &dyn TextSource, entity: &Entity) -> Result<Vec<String>, SourceError> {
    AssertUnwindSafe(source.fetch(entity))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            let msg = panic_text(&*payload).unwrap_or("unknown panic");
            Err(SourceError::Panicked(msg.to_string()))
        })
}
