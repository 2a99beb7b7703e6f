//! Main analysis pipeline for the PM2.5 monitor.
//!
//! Reduces a loaded series into a [`DashboardSnapshot`] that every view can
//! render without touching the raw readings again.

use aqi_core::models::{DailyAggregate, HealthImpactSummary, MonthlyAggregate, Reading, Series};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::SeriesAggregator;
use crate::reader::LoadedSeries;

// ── Public types ──────────────────────────────────────────────────────────────

/// Immutable, fully-materialized view of one data load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub series: Series,
    pub daily: Vec<DailyAggregate>,
    pub monthly: Vec<MonthlyAggregate>,
    /// Most recent reading, `None` for an empty series.
    pub latest: Option<Reading>,
    /// Mean over the readings recorded on `today`.
    pub today: Option<DailyAggregate>,
    /// Health impact for the year of `today`.
    pub impact: HealthImpactSummary,
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// Local time at which the snapshot was built.
    pub generated_at: NaiveDateTime,
}

impl DashboardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Compute daily means, then monthly means from them.
/// 2. Pick the latest reading and today's mean.
/// 3. Compute the health impact for the current year.
pub fn analyze(loaded: LoadedSeries, now: NaiveDateTime) -> DashboardSnapshot {
    let today: NaiveDate = now.date();
    let series = loaded.series;

    let daily = SeriesAggregator::daily_means(&series);
    let monthly = SeriesAggregator::monthly_means(&daily);
    let latest = SeriesAggregator::latest(&series).ok();
    let today_mean = SeriesAggregator::mean_for_date(&series, today);
    let impact = SeriesAggregator::health_impact(&daily, today.year());

    debug!(
        "Analyzed {} readings: {} days, {} months, {} unhealthy days in {}",
        series.len(),
        daily.len(),
        monthly.len(),
        impact.unhealthy_day_count,
        impact.year
    );

    DashboardSnapshot {
        series,
        daily,
        monthly,
        latest,
        today: today_mean,
        impact,
        rows_read: loaded.rows_read,
        rows_skipped: loaded.rows_skipped,
        generated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn loaded(readings: &[(&str, f64)]) -> LoadedSeries {
        LoadedSeries {
            series: readings
                .iter()
                .map(|(t, v)| Reading::new(ts(t), *v))
                .collect(),
            rows_read: readings.len() + 1,
            rows_skipped: 1,
        }
    }

    #[test]
    fn test_analyze_populates_snapshot() {
        let input = loaded(&[
            ("2023-12-31 10:00", 80.0),
            ("2024-03-01 08:00", 40.0),
            ("2024-03-02 08:00", 10.0),
            ("2024-03-02 18:00", 20.0),
        ]);
        let snap = analyze(input, ts("2024-03-02 19:00"));

        assert_eq!(snap.daily.len(), 3);
        assert_eq!(snap.monthly.len(), 2);
        assert_eq!(snap.latest.map(|r| r.pm25), Some(20.0));
        assert_eq!(snap.today.map(|d| d.mean), Some(15.0));
        assert_eq!(snap.impact.year, 2024);
        assert_eq!(snap.impact.unhealthy_day_count, 1);
        assert_eq!(snap.rows_skipped, 1);
        assert_eq!(snap.daily[0].year(), 2023);
    }

    #[test]
    fn test_analyze_empty_series() {
        let snap = analyze(LoadedSeries::default(), ts("2024-03-02 19:00"));
        assert!(snap.is_empty());
        assert!(snap.latest.is_none());
        assert!(snap.today.is_none());
        assert!(!snap.impact.has_data());
    }

    #[test]
    fn test_analyze_no_reading_today() {
        let snap = analyze(loaded(&[("2024-03-01 08:00", 40.0)]), ts("2024-03-05 08:00"));
        assert!(snap.today.is_none());
        assert!(snap.latest.is_some());
    }
}
