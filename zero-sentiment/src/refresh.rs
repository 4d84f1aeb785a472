//! Refresh coordinator: runs ranking passes in the background and publishes
//! immutable snapshots.
//!
//! # State machine
//!
//! ```text
//! idle ──refresh()──► running ──ok──► completed ──refresh()──► running
//!                        │                                       ▲
//!                        └──err/panic──► error ──refresh()───────┘
//! ```
//!
//! The status check and the transition to `running` happen under one write
//! lock, so at most one pass is in flight. Readers clone the current
//! `Arc<RankedSnapshot>` and never wait for a pass.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn, Instrument};

use zero_common::logging::generate_trace_id;
use zero_common::pass_span;

use crate::error::{panic_text, SentimentError};
use crate::export;
use crate::ranking::{rank_results, EntityResult, PassProgress, RankedEntry, RankingEngine};
use crate::universe::{self, UniverseCatalog};

// ============================================================================
// Snapshot
// ============================================================================

/// Lifecycle of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    Idle,
    Running,
    Completed,
    Error,
}

impl std::fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Point-in-time view published by the coordinator. Never mutated after
/// publication.
#[derive(Debug, Clone, Serialize)]
pub struct RankedSnapshot {
    pub top_rises: Vec<RankedEntry>,
    pub top_falls: Vec<RankedEntry>,
    /// Completion time of the last successful pass
    pub generated_at: Option<DateTime<Local>>,
    pub status: RefreshStatus,
    /// Entities covered by the current or last pass
    pub total_entities: usize,
    pub error_detail: Option<String>,
    /// Identifier of the current or last pass
    pub pass_id: Option<String>,
}

impl RankedSnapshot {
    pub fn idle() -> Self {
        Self {
            top_rises: Vec::new(),
            top_falls: Vec::new(),
            generated_at: None,
            status: RefreshStatus::Idle,
            total_entities: 0,
            error_detail: None,
            pass_id: None,
        }
    }
}

/// Result of a `refresh()` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Accepted,
    AlreadyRunning,
}

// ============================================================================
// Coordinator
// ============================================================================

/// Pass parameters.
#[derive(Debug, Clone)]
pub struct PassSettings {
    /// Entries per list
    pub top_n: usize,
    /// Analyse a random subset of this size
    pub sample_size: Option<usize>,
    /// CSV destination written after each completed pass
    pub results_path: Option<PathBuf>,
}

impl Default for PassSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            sample_size: None,
            results_path: None,
        }
    }
}

struct Inner {
    snapshot: RwLock<Arc<RankedSnapshot>>,
    results: RwLock<Arc<Vec<EntityResult>>>,
    progress: PassProgress,
    engine: RankingEngine,
    catalog: RwLock<UniverseCatalog>,
    settings: PassSettings,
}

/// Owns the current snapshot and the pass lifecycle. Cheap to clone.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl RefreshCoordinator {
    pub fn new(engine: RankingEngine, catalog: UniverseCatalog, settings: PassSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                snapshot: RwLock::new(Arc::new(RankedSnapshot::idle())),
                results: RwLock::new(Arc::new(Vec::new())),
                progress: PassProgress::default(),
                engine,
                catalog: RwLock::new(catalog),
                settings,
            }),
        }
    }

    /// Latest published snapshot.
    pub async fn snapshot(&self) -> Arc<RankedSnapshot> {
        Arc::clone(&*self.inner.snapshot.read().await)
    }

    /// Every result of the last completed pass, in pass order.
    pub async fn results(&self) -> Arc<Vec<EntityResult>> {
        Arc::clone(&*self.inner.results.read().await)
    }

    /// Progress of the current pass as an integer percentage.
    pub fn progress(&self) -> &PassProgress {
        &self.inner.progress
    }

    pub fn engine(&self) -> &RankingEngine {
        &self.inner.engine
    }

    /// Start a pass unless one is already running. Returns immediately.
    pub async fn refresh(&self) -> RefreshOutcome {
        let pass_id = generate_trace_id();

        {
            let mut current = self.inner.snapshot.write().await;
            if current.status == RefreshStatus::Running {
                return RefreshOutcome::AlreadyRunning;
            }

            let mut next = RankedSnapshot::clone(&current);
            next.status = RefreshStatus::Running;
            next.error_detail = None;
            next.pass_id = Some(pass_id.clone());
            *current = Arc::new(next);
            self.inner.progress.reset(0);
        }

        let span = pass_span!(pass_id);
        tokio::spawn(supervise(Arc::clone(&self.inner)).instrument(span));

        RefreshOutcome::Accepted
    }

    /// Replace the catalog used by subsequent passes.
    pub async fn replace_catalog(&self, catalog: UniverseCatalog) {
        info!(entries = catalog.len(), "Universe catalog replaced");
        *self.inner.catalog.write().await = catalog;
    }
}

/// Run a pass on its own task and publish its outcome. A panic inside the
/// pass surfaces here as a `JoinError`.
async fn supervise(inner: Arc<Inner>) {
    let started = std::time::Instant::now();

    let worker = {
        let inner = Arc::clone(&inner);
        tokio::spawn(async move { run_pass(&inner).await }.in_current_span())
    };

    let outcome = match worker.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(SentimentError::Pass(panic_message(e.into_panic()))),
        Err(e) => Err(SentimentError::Pass(e.to_string())),
    };

    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(results) => {
            let (top_rises, top_falls) = rank_results(&results, inner.settings.top_n);
            let results = Arc::new(results);

            // Export while still running so the next pass cannot overlap it.
            if let Some(path) = inner.settings.results_path.clone() {
                write_export(path, Arc::clone(&results)).await;
            }

            {
                let mut current = inner.snapshot.write().await;
                *current = Arc::new(RankedSnapshot {
                    top_rises,
                    top_falls,
                    generated_at: Some(Local::now()),
                    status: RefreshStatus::Completed,
                    total_entities: results.len(),
                    error_detail: None,
                    pass_id: current.pass_id.clone(),
                });
                *inner.results.write().await = Arc::clone(&results);
            }

            info!(entities = results.len(), duration_ms, "Refresh pass completed");
        }
        Err(e) => {
            error!(error = %e, duration_ms, "Refresh pass failed");

            let mut current = inner.snapshot.write().await;
            let mut next = RankedSnapshot::clone(&current);
            next.status = RefreshStatus::Error;
            next.error_detail = Some(e.to_string());
            *current = Arc::new(next);
        }
    }
}

async fn run_pass(inner: &Inner) -> Result<Vec<EntityResult>, SentimentError> {
    let catalog = inner.catalog.read().await.clone();
    let entities = catalog.load()?;

    let targets = match inner.settings.sample_size {
        Some(n) => universe::sample(&entities, n, &mut rand::thread_rng()),
        None => entities,
    };

    inner.progress.reset(targets.len());
    {
        let mut current = inner.snapshot.write().await;
        let mut next = RankedSnapshot::clone(&current);
        next.total_entities = targets.len();
        *current = Arc::new(next);
    }

    info!(entities = targets.len(), "Refresh pass started");
    Ok(inner.engine.run(&targets, &inner.progress).await)
}

async fn write_export(path: PathBuf, results: Arc<Vec<EntityResult>>) {
    let target = path.clone();
    let written = tokio::task::spawn_blocking(move || export::write_csv(&target, &results)).await;

    match written {
        Ok(Ok(())) => info!(path = %path.display(), "Results exported"),
        Ok(Err(e)) => warn!(path = %path.display(), error = %e, "Results export failed"),
        Err(e) => warn!(path = %path.display(), error = %e, "Results export task failed"),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match panic_text(&*payload) {
        Some(msg) => format!("pass panicked: {}", msg),
        None => "pass panicked".to_string(),
    }
}
