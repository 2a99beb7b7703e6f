//! PM2.5 aggregation over daily, monthly, yearly and arbitrary date windows.

use std::collections::BTreeMap;

use aqi_core::error::{AqiError, Result};
use aqi_core::models::{
    DailyAggregate, HealthImpactSummary, MonthlyAggregate, RangeStats, Reading, Series,
};
use aqi_core::tiers::{CIGARETTE_PM25_EQUIVALENT, UNHEALTHY_THRESHOLD};
use chrono::{Datelike, NaiveDate, Weekday};

// ── Running mean ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

// ── CalendarMonth ─────────────────────────────────────────────────────────────

/// One day cell in a calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Daily mean for the date, `None` when there were no readings.
    pub aggregate: Option<DailyAggregate>,
}

/// Every day of one month paired with its daily mean.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarMonth {
    /// Days laid out in Monday-first weeks; cells outside the month are `None`.
    pub fn weeks(&self) -> Vec<[Option<CalendarDay>; 7]> {
        let Some(first) = self.days.first() else {
            return Vec::new();
        };
        let mut weeks = Vec::new();
        let mut week: [Option<CalendarDay>; 7] = [None; 7];
        let mut col = first.date.weekday().num_days_from_monday() as usize;

        for day in &self.days {
            week[col] = Some(*day);
            col += 1;
            if col == 7 {
                weeks.push(week);
                week = [None; 7];
                col = 0;
            }
        }
        if col != 0 {
            weeks.push(week);
        }
        weeks
    }

    /// Weekday column headers in display order.
    pub fn weekday_order() -> [Weekday; 7] {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
    }
}

// ── SeriesAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that reduces a PM2.5 series into summaries.
pub struct SeriesAggregator;

impl SeriesAggregator {
    /// Mean concentration per calendar date, ascending by date.
    ///
    /// Dates come straight from the reading timestamps; no timezone
    /// conversion happens here.
    pub fn daily_means(series: &Series) -> Vec<DailyAggregate> {
        let mut map: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
        for reading in series {
            map.entry(reading.date()).or_default().add(reading.pm25);
        }

        map.into_iter()
            .map(|(date, acc)| DailyAggregate {
                date,
                mean: acc.mean(),
                samples: acc.count,
            })
            .collect()
    }

    /// Mean of the daily means per calendar month, ascending.
    ///
    /// Each day weighs the same regardless of how many readings it had.
    pub fn monthly_means(daily: &[DailyAggregate]) -> Vec<MonthlyAggregate> {
        let mut map: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
        for day in daily {
            map.entry((day.date.year(), day.date.month()))
                .or_default()
                .add(day.mean);
        }

        map.into_iter()
            .map(|((year, month), acc)| MonthlyAggregate {
                year,
                month,
                mean: acc.mean(),
                days: acc.count,
            })
            .collect()
    }

    /// Unhealthy-day count and cigarette equivalent for one calendar year.
    ///
    /// A year without data yields a zero summary.
    pub fn health_impact(daily: &[DailyAggregate], year: i32) -> HealthImpactSummary {
        let in_year: Vec<&DailyAggregate> = daily.iter().filter(|d| d.year() == year).collect();
        if in_year.is_empty() {
            return HealthImpactSummary::zero(year);
        }

        let unhealthy_day_count = in_year
            .iter()
            .filter(|d| d.mean > UNHEALTHY_THRESHOLD)
            .count();
        let total: f64 = in_year.iter().map(|d| d.mean).sum();
        let raw = total / CIGARETTE_PM25_EQUIVALENT;

        HealthImpactSummary {
            year,
            days_with_data: in_year.len(),
            unhealthy_day_count,
            cumulative_cigarette_equivalent: raw.trunc() as u64,
            raw_cigarette_equivalent: raw,
        }
    }

    /// The in-year days that [`SeriesAggregator::health_impact`] counts as unhealthy.
    pub fn unhealthy_days(daily: &[DailyAggregate], year: i32) -> Vec<DailyAggregate> {
        daily
            .iter()
            .filter(|d| d.year() == year && d.mean > UNHEALTHY_THRESHOLD)
            .copied()
            .collect()
    }

    /// Readings whose calendar date lies in `start..=end`.
    ///
    /// Fails with [`AqiError::InvalidRange`] when `start > end`; a valid range
    /// with no readings gives an empty series.
    pub fn range_filter(series: &Series, start: NaiveDate, end: NaiveDate) -> Result<Series> {
        if start > end {
            return Err(AqiError::InvalidRange { start, end });
        }
        Ok(series
            .iter()
            .filter(|r| (start..=end).contains(&r.date()))
            .copied()
            .collect())
    }

    /// Mean, max and min over a non-empty series.
    pub fn range_stats(series: &Series) -> Result<RangeStats> {
        if series.is_empty() {
            return Err(AqiError::EmptySeries);
        }
        let mut acc = Accumulator::default();
        let mut max = f64::MIN;
        let mut min = f64::MAX;
        for reading in series {
            acc.add(reading.pm25);
            max = max.max(reading.pm25);
            min = min.min(reading.pm25);
        }
        Ok(RangeStats {
            mean: acc.mean(),
            max,
            min,
            count: acc.count,
        })
    }

    /// The reading with the greatest timestamp.
    pub fn latest(series: &Series) -> Result<Reading> {
        series
            .iter()
            .max_by_key(|r| r.timestamp)
            .copied()
            .ok_or(AqiError::EmptySeries)
    }

    /// Daily mean for one date, if it has readings.
    pub fn mean_for_date(series: &Series, date: NaiveDate) -> Option<DailyAggregate> {
        let mut acc = Accumulator::default();
        for reading in series.iter().filter(|r| r.date() == date) {
            acc.add(reading.pm25);
        }
        (acc.count > 0).then(|| DailyAggregate {
            date,
            mean: acc.mean(),
            samples: acc.count,
        })
    }

    /// Lay out one month of daily means as calendar cells.
    pub fn calendar_month(
        daily: &[DailyAggregate],
        year: i32,
        month: u32,
    ) -> Result<CalendarMonth> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AqiError::Config(format!("invalid month {year}-{month:02}")))?;

        let by_date: BTreeMap<NaiveDate, DailyAggregate> =
            daily.iter().map(|d| (d.date, *d)).collect();

        let days = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|date| CalendarDay {
                date,
                aggregate: by_date.get(&date).copied(),
            })
            .collect();

        Ok(CalendarMonth { year, month, days })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn reading(ts: &str, pm25: f64) -> Reading {
        Reading::new(
            NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M").unwrap(),
            pm25,
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(y: i32, m: u32, d: u32, mean: f64) -> DailyAggregate {
        DailyAggregate {
            date: date(y, m, d),
            mean,
            samples: 1,
        }
    }

    fn sample_series() -> Series {
        Series::new(vec![
            reading("2024-01-01T08:00", 10.0),
            reading("2024-01-01T20:00", 20.0),
            reading("2024-01-02T08:00", 30.0),
        ])
    }

    // ── daily_means ───────────────────────────────────────────────────────────

    #[test]
    fn test_daily_means_groups_by_date() {
        let daily = SeriesAggregator::daily_means(&sample_series());
        assert_eq!(
            daily,
            vec![
                DailyAggregate {
                    date: date(2024, 1, 1),
                    mean: 15.0,
                    samples: 2
                },
                DailyAggregate {
                    date: date(2024, 1, 2),
                    mean: 30.0,
                    samples: 1
                },
            ]
        );
    }

    #[test]
    fn test_daily_means_empty_series() {
        assert!(SeriesAggregator::daily_means(&Series::default()).is_empty());
    }

    #[test]
    fn test_daily_means_sorted_regardless_of_input_order() {
        let series = Series::new(vec![
            reading("2024-01-20T08:00", 1.0),
            reading("2024-01-10T08:00", 2.0),
            reading("2024-01-15T08:00", 3.0),
        ]);
        let dates: Vec<NaiveDate> = SeriesAggregator::daily_means(&series)
            .iter()
            .map(|d| d.date)
            .collect();
        assert_eq!(dates, vec![date(2024, 1, 10), date(2024, 1, 15), date(2024, 1, 20)]);
    }

    #[test]
    fn test_daily_means_is_idempotent() {
        let series = sample_series();
        let first = SeriesAggregator::daily_means(&series);
        let second = SeriesAggregator::daily_means(&series);
        assert_eq!(first, second);
        assert_eq!(series, sample_series());
    }

    #[test]
    fn test_daily_means_tolerates_duplicate_timestamps() {
        let series = Series::new(vec![
            reading("2024-01-01T08:00", 10.0),
            reading("2024-01-01T08:00", 30.0),
        ]);
        let daily = SeriesAggregator::daily_means(&series);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].mean, 20.0);
        assert_eq!(daily[0].samples, 2);
    }

    // ── monthly_means ─────────────────────────────────────────────────────────

    #[test]
    fn test_monthly_means_weights_days_equally() {
        let daily = vec![
            day(2024, 1, 1, 10.0),
            day(2024, 1, 2, 30.0),
            day(2024, 2, 1, 50.0),
        ];
        let monthly = SeriesAggregator::monthly_means(&daily);
        assert_eq!(monthly.len(), 2);
        assert_eq!((monthly[0].year, monthly[0].month), (2024, 1));
        assert_eq!(monthly[0].mean, 20.0);
        assert_eq!(monthly[0].days, 2);
        assert_eq!(monthly[1].mean, 50.0);
    }

    #[test]
    fn test_monthly_means_empty() {
        assert!(SeriesAggregator::monthly_means(&[]).is_empty());
    }

    // ── health_impact ─────────────────────────────────────────────────────────

    #[test]
    fn test_health_impact_arithmetic() {
        let daily = vec![
            day(2024, 1, 1, 40.0),
            day(2024, 1, 2, 30.0),
            day(2024, 1, 3, 50.0),
        ];
        let summary = SeriesAggregator::health_impact(&daily, 2024);
        assert_eq!(summary.unhealthy_day_count, 2);
        assert_eq!(summary.cumulative_cigarette_equivalent, 5);
        assert!((summary.raw_cigarette_equivalent - 120.0 / 22.0).abs() < 1e-12);
        assert_eq!(summary.days_with_data, 3);
    }

    #[test]
    fn test_health_impact_threshold_is_strict() {
        let daily = vec![day(2024, 5, 1, 37.5), day(2024, 5, 2, 37.51)];
        let summary = SeriesAggregator::health_impact(&daily, 2024);
        assert_eq!(summary.unhealthy_day_count, 1);
    }

    #[test]
    fn test_health_impact_filters_to_year() {
        let daily = vec![
            day(2023, 12, 31, 100.0),
            day(2024, 1, 1, 44.0),
            day(2025, 1, 1, 100.0),
        ];
        let summary = SeriesAggregator::health_impact(&daily, 2024);
        assert_eq!(summary.unhealthy_day_count, 1);
        assert_eq!(summary.cumulative_cigarette_equivalent, 2);
    }

    #[test]
    fn test_health_impact_no_data_is_zero() {
        let daily = vec![day(2023, 6, 1, 80.0)];
        let summary = SeriesAggregator::health_impact(&daily, 2024);
        assert_eq!(summary, HealthImpactSummary::zero(2024));
        assert!(!summary.has_data());
    }

    #[test]
    fn test_unhealthy_days_matches_count() {
        let daily = vec![
            day(2024, 1, 1, 40.0),
            day(2024, 1, 2, 30.0),
            day(2024, 1, 3, 50.0),
        ];
        let days = SeriesAggregator::unhealthy_days(&daily, 2024);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2024, 1, 1));
        assert_eq!(days[1].date, date(2024, 1, 3));
    }

    // ── range_filter ──────────────────────────────────────────────────────────

    #[test]
    fn test_range_filter_invalid_order() {
        let err = SeriesAggregator::range_filter(&sample_series(), date(2024, 2, 1), date(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, AqiError::InvalidRange { start, end }
            if start == date(2024, 2, 1) && end == date(2024, 1, 1)));
    }

    #[test]
    fn test_range_filter_invalid_order_on_empty_series() {
        let result =
            SeriesAggregator::range_filter(&Series::default(), date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(AqiError::InvalidRange { .. })));
    }

    #[test]
    fn test_range_filter_valid_but_empty() {
        let filtered =
            SeriesAggregator::range_filter(&sample_series(), date(2099, 1, 1), date(2099, 1, 2))
                .unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_range_filter_is_inclusive_and_ignores_time_of_day() {
        let series = Series::new(vec![
            reading("2024-01-01T00:00", 1.0),
            reading("2024-01-01T23:59", 2.0),
            reading("2024-01-02T12:00", 3.0),
            reading("2024-01-03T00:00", 4.0),
        ]);
        let filtered =
            SeriesAggregator::range_filter(&series, date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        let values: Vec<f64> = filtered.iter().map(|r| r.pm25).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_range_filter_single_day() {
        let filtered =
            SeriesAggregator::range_filter(&sample_series(), date(2024, 1, 2), date(2024, 1, 2))
                .unwrap();
        assert_eq!(filtered.len(), 1);
    }

    // ── range_stats ───────────────────────────────────────────────────────────

    #[test]
    fn test_range_stats() {
        let stats = SeriesAggregator::range_stats(&sample_series()).unwrap();
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_range_stats_empty_series() {
        assert!(matches!(
            SeriesAggregator::range_stats(&Series::default()),
            Err(AqiError::EmptySeries)
        ));
    }

    // ── latest ────────────────────────────────────────────────────────────────

    #[test]
    fn test_latest_regardless_of_input_order() {
        let series = Series::new(vec![
            reading("2024-01-02T10:00", 2.0),
            reading("2024-01-03T10:00", 3.0),
            reading("2024-01-01T10:00", 1.0),
        ]);
        let latest = SeriesAggregator::latest(&series).unwrap();
        assert_eq!(latest, reading("2024-01-03T10:00", 3.0));
    }

    #[test]
    fn test_latest_empty_series() {
        assert!(matches!(
            SeriesAggregator::latest(&Series::default()),
            Err(AqiError::EmptySeries)
        ));
    }

    // ── mean_for_date ─────────────────────────────────────────────────────────

    #[test]
    fn test_mean_for_date() {
        let series = sample_series();
        let today = SeriesAggregator::mean_for_date(&series, date(2024, 1, 1)).unwrap();
        assert_eq!(today.mean, 15.0);
        assert!(SeriesAggregator::mean_for_date(&series, date(2024, 1, 5)).is_none());
    }

    // ── calendar_month ────────────────────────────────────────────────────────

    #[test]
    fn test_calendar_month_covers_every_day() {
        let daily = vec![day(2024, 2, 10, 20.0), day(2024, 3, 1, 99.0)];
        let cal = SeriesAggregator::calendar_month(&daily, 2024, 2).unwrap();
        assert_eq!(cal.days.len(), 29);
        assert_eq!(cal.days[9].aggregate.map(|a| a.mean), Some(20.0));
        assert!(cal.days.iter().filter(|d| d.aggregate.is_some()).count() == 1);
    }

    #[test]
    fn test_calendar_month_weeks_are_monday_first() {
        // 1 Feb 2024 is a Thursday.
        let cal = SeriesAggregator::calendar_month(&[], 2024, 2).unwrap();
        let weeks = cal.weeks();
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][..3].iter().all(Option::is_none));
        assert_eq!(weeks[0][3].map(|d| d.date), Some(date(2024, 2, 1)));
        assert_eq!(weeks[4][3].map(|d| d.date), Some(date(2024, 2, 29)));
        assert!(weeks[4][4].is_none());
    }

    #[test]
    fn test_calendar_month_invalid_month() {
        assert!(matches!(
            SeriesAggregator::calendar_month(&[], 2024, 13),
            Err(AqiError::Config(_))
        ));
    }
}
