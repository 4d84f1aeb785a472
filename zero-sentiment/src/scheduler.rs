//! Periodic refresh trigger.
//!
//! Calls [`RefreshCoordinator::refresh`] every `interval_secs` while enabled.
//! Settings can be changed at runtime; the loop picks up changes immediately.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tokio::time::Duration;
use tracing::{debug, info};

use crate::refresh::{RefreshCoordinator, RefreshOutcome};

/// Interval used when auto refresh is enabled without one.
pub const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Auto refresh settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoRefreshSettings {
    pub enabled: bool,
    pub interval_secs: u64,
}

impl Default for AutoRefreshSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

/// Background scheduler for periodic passes.
#[derive(Default)]
pub struct AutoRefreshScheduler {
    settings: RwLock<AutoRefreshSettings>,
    changed: Notify,
}

impl AutoRefreshScheduler {
    pub fn new(settings: AutoRefreshSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            changed: Notify::new(),
        }
    }

    /// Enabled with the given interval, disabled when `None`.
    pub fn from_interval(interval_secs: Option<u64>) -> Self {
        Self::new(match interval_secs {
            Some(secs) => AutoRefreshSettings {
                enabled: true,
                interval_secs: secs,
            },
            None => AutoRefreshSettings::default(),
        })
    }

    pub async fn settings(&self) -> AutoRefreshSettings {
        *self.settings.read().await
    }

    /// Change settings. A zero or missing interval keeps the current one.
    pub async fn update(&self, enabled: bool, interval_secs: Option<u64>) -> AutoRefreshSettings {
        let updated = {
            let mut settings = self.settings.write().await;
            settings.enabled = enabled;
            if let Some(secs) = interval_secs.filter(|s| *s > 0) {
                settings.interval_secs = secs;
            }
            *settings
        };

        info!(
            enabled = updated.enabled,
            interval_secs = updated.interval_secs,
            "Auto refresh settings updated"
        );
        self.changed.notify_one();
        updated
    }

    /// Run forever, triggering refreshes while enabled.
    pub async fn run(self: Arc<Self>, coordinator: RefreshCoordinator) {
        loop {
            let current = self.settings().await;

            if !current.enabled {
                self.changed.notified().await;
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(current.interval_secs)) => {
                    match coordinator.refresh().await {
                        RefreshOutcome::Accepted => info!("Auto refresh started"),
                        RefreshOutcome::AlreadyRunning => {
                            debug!("Auto refresh skipped, pass already running")
                        }
                    }
                }
                _ = self.changed.notified() => {
                    debug!("Auto refresh settings changed");
                }
            }
        }
    }
}
