//! Date-range view: statistics over a user-chosen window.
//!
//! An inverted range and an empty range are different outcomes and get
//! different messages.

use aqi_core::error::{AqiError, Result};
use aqi_core::formatting::{format_concentration, format_date};
use aqi_core::locale::{self, Locale, TextKey};
use aqi_core::models::{DailyAggregate, RangeStats, Series};
use aqi_core::tiers::classify;
use aqi_data::aggregator::SeriesAggregator;
use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::components::indicators::{pad_label, TierBadge};
use crate::table_view::{self, TableRowData, TableSummary};
use crate::themes::Theme;

/// Result of evaluating a date range against a series.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeOutcome {
    /// `start` falls after `end`.
    Invalid { start: NaiveDate, end: NaiveDate },
    /// Valid range without readings.
    Empty { start: NaiveDate, end: NaiveDate },
    Stats {
        start: NaiveDate,
        end: NaiveDate,
        stats: RangeStats,
        daily: Vec<DailyAggregate>,
    },
}

impl RangeOutcome {
    pub fn compute(series: &Series, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let filtered = match SeriesAggregator::range_filter(series, start, end) {
            Ok(filtered) => filtered,
            Err(AqiError::InvalidRange { start, end }) => {
                return Ok(Self::Invalid { start, end });
            }
            Err(e) => return Err(e),
        };
        if filtered.is_empty() {
            return Ok(Self::Empty { start, end });
        }
        Ok(Self::Stats {
            start,
            end,
            stats: SeriesAggregator::range_stats(&filtered)?,
            daily: SeriesAggregator::daily_means(&filtered),
        })
    }

    fn bounds(&self) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Invalid { start, end }
            | Self::Empty { start, end }
            | Self::Stats { start, end, .. } => (*start, *end),
        }
    }
}

fn range_title(outcome: &RangeOutcome, locale: Locale) -> String {
    let (start, end) = outcome.bounds();
    format!(
        "{}: {} - {}",
        locale::text(locale, TextKey::DateRange),
        format_date(start, locale),
        format_date(end, locale)
    )
}

fn stats_lines(stats: &RangeStats, locale: Locale, theme: &Theme) -> Vec<Line<'static>> {
    let rows = [
        (TextKey::Average, stats.mean),
        (TextKey::Maximum, stats.max),
        (TextKey::Minimum, stats.min),
    ];
    let mut lines: Vec<Line<'static>> = rows
        .into_iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(pad_label(locale::text(locale, key), 12), theme.label),
                Span::styled(format_concentration(value), theme.concentration_style(value)),
            ])
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled(pad_label(locale::text(locale, TextKey::Readings), 12), theme.label),
        Span::styled(stats.count.to_string(), theme.value),
    ]));
    if let Ok(c) = classify(stats.mean, locale) {
        lines.push(TierBadge::new(&c, theme).to_line());
    }
    lines
}

/// Render a range outcome into `area`.
pub fn render_range_view(
    frame: &mut Frame,
    area: Rect,
    outcome: &RangeOutcome,
    locale: Locale,
    theme: &Theme,
) {
    let title = range_title(outcome, locale);
    match outcome {
        RangeOutcome::Invalid { .. } => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    locale::text(locale, TextKey::InvalidRange),
                    theme.error,
                )),
                Line::from(""),
                Line::from(Span::styled(
                    locale::text(locale, TextKey::PressQuit),
                    theme.dim,
                )),
            ];
            frame.render_widget(
                Paragraph::new(Text::from(text)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", title)),
                ),
                area,
            );
        }
        RangeOutcome::Empty { .. } => {
            table_view::render_no_data(frame, area, &title, locale, theme);
        }
        RangeOutcome::Stats { stats, daily, .. } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(7), Constraint::Min(3)])
                .split(area);

            frame.render_widget(
                Paragraph::new(Text::from(stats_lines(stats, locale, theme))).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.table_border)
                        .title(format!(" {} ", title)),
                ),
                chunks[0],
            );

            let rows: Vec<TableRowData> = daily
                .iter()
                .map(|d| TableRowData::from_daily(d, locale))
                .collect();
            if let Some(summary) = TableSummary::from_rows(&rows) {
                table_view::render_table_view(
                    frame,
                    chunks[1],
                    locale::text(locale, TextKey::DailyHistory),
                    &rows,
                    &summary,
                    locale,
                    theme,
                );
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
