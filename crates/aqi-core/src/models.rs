use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single PM2.5 sample taken from the shared spreadsheet.
///
/// The timestamp is local wall-clock time; any timezone conversion has
/// already been applied by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Local time at which the sample was recorded.
    pub timestamp: NaiveDateTime,
    /// PM2.5 concentration in µg/m³ (finite, non-negative).
    pub pm25: f64,
}

impl Reading {
    /// Construct a new reading.
    pub fn new(timestamp: NaiveDateTime, pm25: f64) -> Self {
        Self { timestamp, pm25 }
    }

    /// Calendar date of the sample.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Readings from one sensor, ordered ascending by timestamp.
///
/// Duplicate timestamps are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    readings: Vec<Reading>,
}

impl Series {
    /// Build a series from readings in any order.
    pub fn new(mut readings: Vec<Reading>) -> Self {
        readings.sort_by_key(|r| r.timestamp);
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }
}

impl FromIterator<Reading> for Series {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

/// Mean concentration of all readings on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub mean: f64,
    /// Number of readings averaged into `mean`.
    pub samples: usize,
}

impl DailyAggregate {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Mean of the daily means within one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub year: i32,
    pub month: u32,
    pub mean: f64,
    /// Number of days with data in the month.
    pub days: usize,
}

/// Cumulative health impact over one calendar year of daily means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthImpactSummary {
    pub year: i32,
    /// Days in the year that have at least one reading.
    pub days_with_data: usize,
    /// Days whose mean exceeds the unhealthy threshold.
    pub unhealthy_day_count: usize,
    /// Cigarette equivalent, truncated for display.
    pub cumulative_cigarette_equivalent: u64,
    /// Cigarette equivalent before truncation.
    pub raw_cigarette_equivalent: f64,
}

impl HealthImpactSummary {
    /// Zero-valued summary for a year without data.
    pub fn zero(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    pub fn has_data(&self) -> bool {
        self.days_with_data > 0
    }
}

/// Mean / max / min over a non-empty series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_series_sorts_on_construction() {
        let series = Series::new(vec![
            Reading::new(ts("2024-01-03 08:00"), 3.0),
            Reading::new(ts("2024-01-01 08:00"), 1.0),
            Reading::new(ts("2024-01-02 08:00"), 2.0),
        ]);
        let values: Vec<f64> = series.iter().map(|r| r.pm25).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_series_keeps_duplicate_timestamps() {
        let series = Series::new(vec![
            Reading::new(ts("2024-01-01 08:00"), 10.0),
            Reading::new(ts("2024-01-01 08:00"), 12.0),
        ]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_series_collects_in_order() {
        assert!(Series::default().is_empty());
        let series: Series = vec![
            Reading::new(ts("2024-01-05 09:00"), 5.0),
            Reading::new(ts("2024-01-01 07:30"), 1.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(series.readings()[0].timestamp, ts("2024-01-01 07:30"));
        assert_eq!(series.readings()[1].timestamp, ts("2024-01-05 09:00"));
    }

    #[test]
    fn test_health_impact_zero() {
        let summary = HealthImpactSummary::zero(2023);
        assert_eq!(summary.year, 2023);
        assert_eq!(summary.unhealthy_day_count, 0);
        assert_eq!(summary.cumulative_cigarette_equivalent, 0);
        assert!(!summary.has_data());
    }
}
