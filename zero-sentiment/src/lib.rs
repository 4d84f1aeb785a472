//! Zero Sentiment Library
//!
//! Ranks a curated universe of listed companies by news sentiment and
//! publishes the top predicted rises and falls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  zero-sentiment (Rust Service)                      │
//! │                           :5000                                     │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐      │
//! │  │  Source Chain   │─►│  Sentiment      │─►│  Ranking        │      │
//! │  │  (fallback)     │  │  Aggregator     │  │  Engine         │      │
//! │  └─────────────────┘  └─────────────────┘  └────────┬────────┘      │
//! │                                                     ▼               │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐      │
//! │  │  HTTP Routes    │◄─│  Snapshot       │◄─│  Refresh        │      │
//! │  │  (axum)         │  │  (Arc swap)     │  │  Coordinator    │      │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## Text acquisition
//! - Structured news feed, then RSS, then HTML scrape
//! - Deterministic synthetic phrases when every network strategy fails
//!
//! ## Scoring
//! - VADER polarity per text, averaged per entity
//! - Prediction score is the compound sentiment scaled to [-100, 100]
//!
//! ## Refresh
//! - At most one pass in flight; overlapping requests are rejected
//! - Readers always see the last complete snapshot

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod error;
pub mod export;
pub mod ranking;
pub mod refresh;
pub mod routes;
pub mod scheduler;
pub mod sentiment;
pub mod sources;
pub mod universe;

pub use error::SentimentError;
pub use ranking::{rank_results, EngineConfig, EntityResult, RankedEntry, RankingEngine};
pub use refresh::{PassSettings, RankedSnapshot, RefreshCoordinator, RefreshOutcome, RefreshStatus};
pub use scheduler::{AutoRefreshScheduler, AutoRefreshSettings};
pub use sentiment::{prediction_score, SentimentAggregator, SentimentVector, TextScorer};
pub use sources::{SourceChain, TextBatch, TextSource};
pub use universe::{Entity, UniverseCatalog};

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use zero_common::config::Config;

/// Sentiment service state
pub struct SentimentState {
    /// Configuration
    pub config: Config,
    /// Pass lifecycle and published snapshot
    pub coordinator: RefreshCoordinator,
    /// Periodic refresh trigger
    pub scheduler: Arc<AutoRefreshScheduler>,
}

impl SentimentState {
    /// Build the production state: network source chain, VADER scoring and
    /// the configured universe.
    pub fn from_config(config: Config) -> Result<Self, SentimentError> {
        let settings = &config.sentiment;

        let chain = Arc::new(SourceChain::from_config(settings)?);
        let engine = RankingEngine::new(
            chain,
            SentimentAggregator::default(),
            EngineConfig {
                concurrency: settings.concurrency,
                politeness_delay_ms: settings.politeness_delay_ms,
            },
        );

        let catalog = UniverseCatalog::from_config(settings.universe.as_deref());
        let coordinator = RefreshCoordinator::new(
            engine,
            catalog,
            PassSettings {
                top_n: settings.top_n,
                sample_size: settings.sample_size,
                results_path: settings.results_path.clone(),
            },
        );

        Ok(Self::new(config, coordinator))
    }

    /// Wrap an already built coordinator.
    pub fn new(config: Config, coordinator: RefreshCoordinator) -> Self {
        let scheduler = Arc::new(AutoRefreshScheduler::from_interval(
            config.sentiment.auto_refresh_secs,
        ));

        Self {
            config,
            coordinator,
            scheduler,
        }
    }
}

/// Main sentiment service
pub struct SentimentService {
    state: Arc<SentimentState>,
}

impl SentimentService {
    /// Create a new sentiment service
    pub fn new(config: Config) -> Result<Self> {
        let state = Arc::new(SentimentState::from_config(config)?);
        Ok(Self { state })
    }

    /// Start the sentiment service
    pub async fn start(self) -> Result<()> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = routes::build_router(self.state.clone()).layer(cors);

        if self.state.config.sentiment.refresh_on_startup {
            let outcome = self.state.coordinator.refresh().await;
            tracing::info!(?outcome, "Startup refresh requested");
        }

        // Start the auto refresh scheduler
        let scheduler = Arc::clone(&self.state.scheduler);
        let coordinator = self.state.coordinator.clone();
        tokio::spawn(scheduler.run(coordinator));

        // Start HTTP server
        let addr: SocketAddr = self.state.config.bind_address().parse()?;
        tracing::info!(address = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
