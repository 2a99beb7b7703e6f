//! Daily and monthly history tables for the PM2.5 monitor.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one tier-coloured row
//! per period plus a summary row (mean / max / min) at the bottom.

use aqi_core::formatting::{format_date, format_month, format_number};
use aqi_core::locale::{self, Locale, TextKey};
use aqi_core::models::{DailyAggregate, MonthlyAggregate};
use aqi_core::tiers::Tier;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::themes::Theme;

/// Data for a single row in the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    /// Localized period label, e.g. `"5/1/2567"` or `"2024-03"`.
    pub period: String,
    pub mean: f64,
    pub tier: Option<Tier>,
    /// Readings (daily table) or days with data (monthly table).
    pub count: usize,
}

impl TableRowData {
    pub fn from_daily(day: &DailyAggregate, locale: Locale) -> Self {
        Self {
            period: format_date(day.date, locale),
            mean: day.mean,
            tier: Tier::for_concentration(day.mean),
            count: day.samples,
        }
    }

    pub fn from_monthly(month: &MonthlyAggregate, locale: Locale) -> Self {
        Self {
            period: format_month(month.year, month.month, locale),
            mean: month.mean,
            tier: Tier::for_concentration(month.mean),
            count: month.days,
        }
    }
}

/// Mean, max and min across the rows of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSummary {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub periods: usize,
}

impl TableSummary {
    /// Summarize rows; `None` when there are none.
    pub fn from_rows(rows: &[TableRowData]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let sum: f64 = rows.iter().map(|r| r.mean).sum();
        let max = rows.iter().map(|r| r.mean).fold(f64::MIN, f64::max);
        let min = rows.iter().map(|r| r.mean).fold(f64::MAX, f64::min);
        Some(Self {
            mean: sum / rows.len() as f64,
            max,
            min,
            periods: rows.len(),
        })
    }
}

/// Render a history table into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[TableRowData],
    summary: &TableSummary,
    locale: Locale,
    theme: &Theme,
) {
    let header_cells = [
        locale::text(locale, TextKey::Period),
        locale::text(locale, TextKey::Average),
        locale::text(locale, TextKey::Level),
        locale::text(locale, TextKey::Readings),
    ]
    .into_iter()
    .map(|h| Cell::from(h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let base = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let (level, level_style) = match row.tier {
                Some(tier) => (
                    format!("{} {}", tier.emoji(), locale::tier_text(locale, tier).label),
                    theme.tier_style(tier),
                ),
                None => ("-".to_string(), base),
            };
            Row::new(vec![
                Cell::from(row.period.clone()),
                Cell::from(format_number(row.mean, 1)).style(level_style),
                Cell::from(level).style(level_style),
                Cell::from(row.count.to_string()),
            ])
            .style(base)
        })
        .collect();

    let summary_row = Row::new(vec![
        Cell::from(locale::text(locale, TextKey::Summary)),
        Cell::from(format_number(summary.mean, 1)),
        Cell::from(format!(
            "{} {} / {} {}",
            locale::text(locale, TextKey::Maximum),
            format_number(summary.max, 1),
            locale::text(locale, TextKey::Minimum),
            format_number(summary.min, 1),
        )),
        Cell::from(summary.periods.to_string()),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(summary_row);

    let widths = [
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Min(30),
        Constraint::Length(12),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} (µg/m³) ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a placeholder panel with a single localized message.
pub fn render_message(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    locale: Locale,
    theme: &Theme,
) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.warning)),
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

/// Render the "no data" placeholder.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, locale: Locale, theme: &Theme) {
    render_message(
        frame,
        area,
        title,
        locale::text(locale, TextKey::NoData),
        locale,
        theme,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_rows() -> Vec<TableRowData> {
        make_rows_in(Locale::Th)
    }

    fn make_rows_in(locale: Locale) -> Vec<TableRowData> {
        let days = [
            DailyAggregate {
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                mean: 12.0,
                samples: 24,
            },
            DailyAggregate {
                date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
                mean: 48.0,
                samples: 20,
            },
        ];
        days.iter()
            .map(|d| TableRowData::from_daily(d, locale))
            .collect()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_row_from_daily_uses_locale() {
        let rows = make_rows();
        assert_eq!(rows[0].period, "5/1/2567");
        assert_eq!(rows[0].tier, Some(Tier::Excellent));
        assert_eq!(rows[1].tier, Some(Tier::UnhealthySensitive));
        assert_eq!(rows[1].count, 20);
    }

    #[test]
    fn test_row_from_monthly() {
        let month = MonthlyAggregate {
            year: 2024,
            month: 3,
            mean: 30.0,
            days: 31,
        };
        let row = TableRowData::from_monthly(&month, Locale::En);
        assert_eq!(row.period, "2024-03");
        assert_eq!(row.tier, Some(Tier::Moderate));
        assert_eq!(row.count, 31);
    }

    #[test]
    fn test_summary_from_rows() {
        let summary = TableSummary::from_rows(&make_rows()).unwrap();
        assert_eq!(summary.mean, 30.0);
        assert_eq!(summary.max, 48.0);
        assert_eq!(summary.min, 12.0);
        assert_eq!(summary.periods, 2);
        assert!(TableSummary::from_rows(&[]).is_none());
    }

    #[test]
    fn test_render_table_view_shows_rows_and_summary() {
        let backend = TestBackend::new(90, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let rows = make_rows_in(Locale::En);
        let summary = TableSummary::from_rows(&rows).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, "Daily averages", &rows, &summary, Locale::En, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Daily averages"));
        assert!(text.contains("6 Jan 2024"));
        assert!(text.contains("48.0"));
        assert!(text.contains("SUMMARY"));
        assert!(text.contains("30.0"));
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, "Daily averages", Locale::En, &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No data for this period"));
    }
}
