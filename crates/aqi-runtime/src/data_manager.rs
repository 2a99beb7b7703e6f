//! TTL-cached data manager for the monitoring runtime.
//!
//! Wraps a [`DataSource`] and the [`analyze`] pipeline with a time-to-live
//! cache. Callers use [`DataManager::get_data`] to obtain a fresh-or-cached
//! [`DashboardSnapshot`]; on fetch failure the previous snapshot is kept and
//! the error is recorded. The TTL runs from the last fetch attempt, so a
//! failing source is tried at most once per TTL.

use std::time::{Duration, Instant};

use aqi_core::error::Result;
use aqi_core::time_utils::TimezoneHandler;
use aqi_data::analysis::{analyze, DashboardSnapshot};
use aqi_data::source::{http_client, DataSource};
use reqwest::Client;

// ── DataManager ───────────────────────────────────────────────────────────────

/// TTL-cached wrapper around source loading and analysis.
///
/// # Example
/// ```no_run
/// use aqi_core::time_utils::TimezoneHandler;
/// use aqi_data::source::DataSource;
/// use aqi_runtime::data_manager::DataManager;
///
/// # async fn run() -> aqi_core::Result<()> {
/// let source = DataSource::parse("./pm25.csv")?;
/// let mut mgr = DataManager::new(source, TimezoneHandler::new("Asia/Bangkok"), 600)?;
/// if let Some(snapshot) = mgr.get_data(false).await {
///     println!("{} readings", snapshot.series.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct DataManager {
    source: DataSource,
    tz: TimezoneHandler,
    client: Client,
    /// Maximum age of cached data before it is considered stale.
    cache_ttl: Duration,
    cache: Option<DashboardSnapshot>,
    /// When the cache was last populated.
    cache_timestamp: Option<Instant>,
    /// When a fetch was last started, successful or not.
    last_attempt: Option<Instant>,
    /// Human-readable description of the last error encountered.
    last_error: Option<String>,
}

impl DataManager {
    /// Create a new manager; fails only if the HTTP client cannot be built.
    pub fn new(source: DataSource, tz: TimezoneHandler, cache_ttl_secs: u64) -> Result<Self> {
        Ok(Self {
            source,
            tz,
            client: http_client()?,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache: None,
            cache_timestamp: None,
            last_attempt: None,
            last_error: None,
        })
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return a snapshot, fetching only when the TTL since the last attempt
    /// has run out.
    ///
    /// When `force_refresh` is `true` the TTL is ignored. On fetch failure
    /// the previous cache (if any) is returned, even when stale.
    pub async fn get_data(&mut self, force_refresh: bool) -> Option<&DashboardSnapshot> {
        if !force_refresh && !self.is_due() {
            tracing::debug!("returning cached snapshot");
            return self.cache.as_ref();
        }

        self.last_attempt = Some(Instant::now());
        match self.fetch().await {
            Ok(snapshot) => {
                tracing::debug!(
                    readings = snapshot.series.len(),
                    skipped = snapshot.rows_skipped,
                    "snapshot cache updated"
                );
                self.cache = Some(snapshot);
                self.cache_timestamp = Some(Instant::now());
                self.last_error = None;
                self.cache.as_ref()
            }
            Err(e) => {
                tracing::warn!(error = %e, source = %self.source, "fetch failed; keeping cached data");
                self.last_error = Some(e.to_string());
                self.cache.as_ref()
            }
        }
    }

    /// Load the source and analyze it, bypassing the cache entirely.
    pub async fn fetch(&self) -> Result<DashboardSnapshot> {
        let loaded = self.source.load(&self.client, self.tz).await?;
        Ok(analyze(loaded, self.tz.now_local()))
    }

    /// Age of the current cache entry, or `None` if nothing was fetched yet.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cache_timestamp.map(|ts| ts.elapsed())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// `true` when the next [`DataManager::get_data`] call will fetch.
    pub fn is_due(&self) -> bool {
        self.last_attempt
            .map_or(true, |attempt| attempt.elapsed() >= self.cache_ttl)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
