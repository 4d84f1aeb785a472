//! HTTP routes for the sentiment service.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use zero_common::util::round_to;

use crate::ranking::{EntityResult, RankedEntry};
use crate::refresh::{RefreshOutcome, RefreshStatus};
use crate::sources::SourceHealth;
use crate::SentimentState;

/// `last_update` format.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// One row of the rises or falls list.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub rank: usize,
    pub ticker: String,
    pub company: String,
    /// Prediction score, 2 decimal places
    pub score: f64,
    /// Compound sentiment, 3 decimal places
    pub sentiment: f64,
    pub headline: String,
}

impl From<&RankedEntry> for EntryResponse {
    fn from(e: &RankedEntry) -> Self {
        Self {
            rank: e.rank,
            ticker: e.symbol.clone(),
            company: e.display_name.clone(),
            score: round_to(e.prediction_score, 2),
            sentiment: round_to(e.compound_sentiment, 3),
            headline: e.sample_headline.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub top_rises: Vec<EntryResponse>,
    pub top_falls: Vec<EntryResponse>,
    pub last_update: Option<String>,
    pub status: RefreshStatus,
    pub progress: u8,
    pub total_companies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Strategy counters plus derived success rate.
#[derive(Debug, Serialize)]
pub struct SourceStats {
    #[serde(flatten)]
    pub health: SourceHealth,
    /// Percentage, 1 decimal place
    pub success_rate: f64,
}

impl From<SourceHealth> for SourceStats {
    fn from(health: SourceHealth) -> Self {
        let success_rate = round_to(health.success_rate(), 1);
        Self {
            health,
            success_rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceStats>,
}

#[derive(Debug, Serialize)]
pub struct ResultRow {
    pub ticker: String,
    pub company: String,
    pub prediction_score: f64,
    pub sentiment_compound: f64,
    pub sentiment_pos: f64,
    pub sentiment_neg: f64,
    pub sentiment_neu: f64,
    pub headlines_count: usize,
    pub source: String,
    pub sample_headlines: Vec<String>,
}

impl From<&EntityResult> for ResultRow {
    fn from(r: &EntityResult) -> Self {
        Self {
            ticker: r.entity.symbol.clone(),
            company: r.entity.display_name.clone(),
            prediction_score: r.prediction_score,
            sentiment_compound: r.sentiment.compound,
            sentiment_pos: r.sentiment.positive,
            sentiment_neg: r.sentiment.negative,
            sentiment_neu: r.sentiment.neutral,
            headlines_count: r.sentiment.sample_count,
            source: r.source.clone(),
            sample_headlines: r.sample_texts.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultRow>,
    pub count: usize,
}

/// Auto refresh toggle request
#[derive(Debug, Deserialize)]
pub struct AutoRefreshRequest {
    #[serde(default)]
    pub enabled: bool,
    /// Interval in seconds
    pub interval: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AutoRefreshResponse {
    pub enabled: bool,
    pub interval: u64,
}

// ============================================================================
// Router
// ============================================================================

/// Build the service router.
pub fn build_router(state: Arc<SentimentState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Dashboard
        .route("/refresh", post(refresh))
        .route("/api/refresh", post(refresh))
        .route("/data", get(get_data))
        .route("/api/data", get(get_data))
        // Diagnostics
        .route("/api/sources", get(get_sources))
        .route("/api/results", get(get_results))
        .route(
            "/api/auto-refresh",
            get(get_auto_refresh).post(set_auto_refresh),
        )
        .with_state(state)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "zero-sentiment".to_string(),
    })
}

/// Trigger a refresh pass
pub async fn refresh(
    State(state): State<Arc<SentimentState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.coordinator.refresh().await {
        RefreshOutcome::Accepted => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Analysis started" })),
        ),
        RefreshOutcome::AlreadyRunning => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Analysis already running" })),
        ),
    }
}

/// Current rankings and pass status
pub async fn get_data(State(state): State<Arc<SentimentState>>) -> Json<DashboardResponse> {
    let snapshot = state.coordinator.snapshot().await;

    let progress = match snapshot.status {
        RefreshStatus::Idle => 0,
        RefreshStatus::Completed => 100,
        RefreshStatus::Running | RefreshStatus::Error => state.coordinator.progress().percent(),
    };

    Json(DashboardResponse {
        top_rises: snapshot.top_rises.iter().map(EntryResponse::from).collect(),
        top_falls: snapshot.top_falls.iter().map(EntryResponse::from).collect(),
        last_update: snapshot
            .generated_at
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
        status: snapshot.status,
        progress,
        total_companies: snapshot.total_entities,
        error: snapshot.error_detail.clone(),
    })
}

/// Per-strategy acquisition statistics
pub async fn get_sources(State(state): State<Arc<SentimentState>>) -> Json<SourcesResponse> {
    let stats = state.coordinator.engine().chain().stats().await;
    let sources = stats.into_iter().map(SourceStats::from).collect();
    Json(SourcesResponse { sources })
}

/// Every result of the last completed pass
pub async fn get_results(State(state): State<Arc<SentimentState>>) -> Json<ResultsResponse> {
    let results = state.coordinator.results().await;
    let rows: Vec<ResultRow> = results.iter().map(ResultRow::from).collect();
    let count = rows.len();

    Json(ResultsResponse {
        results: rows,
        count,
    })
}

/// Current auto refresh settings
pub async fn get_auto_refresh(
    State(state): State<Arc<SentimentState>>,
) -> Json<AutoRefreshResponse> {
    let settings = state.scheduler.settings().await;
    Json(AutoRefreshResponse {
        enabled: settings.enabled,
        interval: settings.interval_secs,
    })
}

/// Enable or disable auto refresh
pub async fn set_auto_refresh(
    State(state): State<Arc<SentimentState>>,
    Json(req): Json<AutoRefreshRequest>,
) -> Json<AutoRefreshResponse> {
    let settings = state.scheduler.update(req.enabled, req.interval).await;
    Json(AutoRefreshResponse {
        enabled: settings.enabled,
        interval: settings.interval_secs,
    })
}
