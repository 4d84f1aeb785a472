//! Per-strategy acquisition statistics.
//!
//! Counts attempts, successes and failures for every strategy in the chain,
//! including the synthetic fallback, and keeps the most recent error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use zero_common::util::truncate_with_ellipsis;

/// Longest error message kept per strategy.
const MAX_ERROR_CHARS: usize = 200;

// ============================================================================
// Source Health
// ============================================================================

/// Counters for a single strategy.
#[derive(Debug, Clone, Serialize)]
pub struct SourceHealth {
    /// Strategy name
    pub name: String,
    /// Total fetch attempts
    pub attempts: u64,
    /// Attempts that yielded at least one text
    pub successes: u64,
    /// Attempts that failed or yielded nothing
    pub failures: u64,
    /// Last successful attempt
    pub last_success: Option<DateTime<Utc>>,
    /// Last error message
    pub last_error: Option<String>,
    /// When the last error happened
    pub last_error_at: Option<DateTime<Utc>>,
}

impl SourceHealth {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attempts: 0,
            successes: 0,
            failures: 0,
            last_success: None,
            last_error: None,
            last_error_at: None,
        }
    }

    pub fn record_success(&mut self) {
        self.attempts += 1;
        self.successes += 1;
        self.last_success = Some(Utc::now());
    }

    pub fn record_failure(&mut self, error: &str) {
        self.attempts += 1;
        self.failures += 1;
        self.last_error = Some(truncate_with_ellipsis(error, MAX_ERROR_CHARS));
        self.last_error_at = Some(Utc::now());
    }

    /// Success rate as percentage
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            100.0
        } else {
            (self.successes as f64 / self.attempts as f64) * 100.0
        }
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Statistics for every strategy of a chain, reported in chain order.
pub struct SourceHealthTracker {
    order: Vec<&'static str>,
    health: RwLock<HashMap<&'static str, SourceHealth>>,
}

impl SourceHealthTracker {
    pub fn new(names: &[&'static str]) -> Self {
        let health = names.iter().map(|n| (*n, SourceHealth::new(*n))).collect();
        Self {
            order: names.to_vec(),
            health: RwLock::new(health),
        }
    }

    pub async fn record_success(&self, name: &'static str) {
        let mut health = self.health.write().await;
        health
            .entry(name)
            .or_insert_with(|| SourceHealth::new(name))
            .record_success();
    }

    pub async fn record_failure(&self, name: &'static str, error: &str) {
        let mut health = self.health.write().await;
        health
            .entry(name)
            .or_insert_with(|| SourceHealth::new(name))
            .record_failure(error);
    }

    /// Snapshot of all counters.
    pub async fn snapshot(&self) -> Vec<SourceHealth> {
        let health = self.health.read().await;
        self.order
            .iter()
            .filter_map(|name| health.get(name).cloned())
            .collect()
    }
}
