//! Zero Sentiment - News-sentiment ranking service for the Zero ecosystem.
//!
//! Scores a curated equity universe from recent headlines and serves the
//! top predicted rises and falls over HTTP.

use anyhow::Result;
use zero_common::config::Config;
use zero_common::logging::init_from_config;
use zero_sentiment::SentimentService;

#[tokio::main]
async fn main() -> Result<()> {
    // Start timing immediately for cold-start measurement
    let startup_start = std::time::Instant::now();

    // Load configuration (file, then environment overrides)
    let config = Config::load_and_validate()?;

    // Initialize logging
    init_from_config(&config.observability);

    tracing::info!("Zero Sentiment v{}", env!("CARGO_PKG_VERSION"));

    let service = SentimentService::new(config)?;

    // Log startup timing before entering main service loop
    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    service.start().await
}
