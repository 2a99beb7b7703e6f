//! Async monitoring orchestrator.
//!
//! Drives a [`DataManager`] in a tokio task, sending periodic
//! [`DashboardData`] snapshots through an `mpsc` channel so the TUI event
//! loop can consume them without any shared mutable state.

use std::time::Duration;

use aqi_core::time_utils::TimezoneHandler;
use aqi_data::analysis::DashboardSnapshot;
use aqi_data::source::DataSource;
use chrono::NaiveDateTime;
use tokio::sync::mpsc;
use tokio::time;

use crate::data_manager::DataManager;

// ── Public types ──────────────────────────────────────────────────────────────

/// A single refresh result forwarded to the TUI layer.
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// Latest good snapshot; may be stale when `last_error` is set.
    pub snapshot: Option<DashboardSnapshot>,
    /// Local time of this refresh attempt.
    pub fetched_at: NaiveDateTime,
    /// Error from the most recent fetch, if it failed.
    pub last_error: Option<String>,
    /// Age of `snapshot` in seconds.
    pub cache_age_secs: u64,
}

impl DashboardData {
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some() && self.snapshot.is_some()
    }
}

// ── MonitoringOrchestrator ────────────────────────────────────────────────────

/// How often the loop checks whether the cache is due.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Background refresh coordinator.
///
/// Call [`MonitoringOrchestrator::start`] to spin up the loop in a dedicated
/// tokio task and receive a channel endpoint for [`DashboardData`] updates.
pub struct MonitoringOrchestrator {
    /// How often to refresh; also the cache TTL.
    update_interval: Duration,
    source: DataSource,
    tz: TimezoneHandler,
}

impl MonitoringOrchestrator {
    pub fn new(update_interval_secs: u64, source: DataSource, tz: TimezoneHandler) -> Self {
        Self {
            update_interval: Duration::from_secs(update_interval_secs),
            source,
            tz,
        }
    }

    /// Start the monitoring loop.
    ///
    /// Returns the receiving end of the snapshot channel and a
    /// [`MonitoringHandle`] that aborts the loop.
    pub fn start(self) -> (mpsc::Receiver<DashboardData>, MonitoringHandle) {
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.monitoring_loop(tx).await;
        });

        (rx, MonitoringHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    /// Check the cache every [`POLL_INTERVAL`] (or `update_interval` when
    /// shorter) until the receiver is dropped.
    ///
    /// The data manager only fetches once its TTL has run out, so data is
    /// refreshed at most one poll period after `update_interval`. An update
    /// is sent after every fetch attempt.
    async fn monitoring_loop(self, tx: mpsc::Sender<DashboardData>) {
        let mut data_manager = match DataManager::new(
            self.source.clone(),
            self.tz,
            self.update_interval.as_secs(),
        ) {
            Ok(mgr) => mgr,
            Err(e) => {
                tracing::error!(error = %e, "cannot start data manager");
                let _ = tx
                    .send(DashboardData {
                        snapshot: None,
                        fetched_at: self.tz.now_local(),
                        last_error: Some(e.to_string()),
                        cache_age_secs: 0,
                    })
                    .await;
                return;
            }
        };

        let mut interval = time::interval(self.update_interval.min(POLL_INTERVAL));

        loop {
            // The first tick fires immediately.
            interval.tick().await;

            if tx.is_closed() {
                tracing::debug!("dashboard channel closed; exiting loop");
                break;
            }

            if !data_manager.is_due() {
                continue;
            }
            let snapshot = data_manager.get_data(false).await.cloned();

            let data = DashboardData {
                snapshot,
                fetched_at: self.tz.now_local(),
                last_error: data_manager.last_error().map(str::to_string),
                cache_age_secs: data_manager.cache_age().map_or(0, |age| age.as_secs()),
            };

            tracing::info!(
                readings = data.snapshot.as_ref().map_or(0, |s| s.series.len()),
                failed = data.last_error.is_some(),
                "dashboard refreshed"
            );

            if let Err(e) = tx.send(data).await {
                tracing::warn!(error = %e, "failed to send dashboard data; receiver dropped");
            }
        }
    }
}

// ── MonitoringHandle ──────────────────────────────────────────────────────────

/// A handle to the background refresh task.
pub struct MonitoringHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl MonitoringHandle {
    /// Immediately abort the refresh loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
