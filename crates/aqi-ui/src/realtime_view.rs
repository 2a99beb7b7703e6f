//! Realtime dashboard for the PM2.5 monitor.
//!
//! Shows the latest reading with its tier, the gauge, the advisory bundle,
//! today's mean and the data freshness line.

use aqi_core::formatting::{format_concentration, format_number, format_timestamp};
use aqi_core::locale::{self, Locale, TextKey};
use aqi_core::models::{DailyAggregate, Reading};
use aqi_core::tiers::{cigarette_equivalent, classify};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::advice::indoor_guidance;
use crate::components::gauge::ConcentrationGauge;
use crate::components::header::Header;
use crate::components::indicators::{pad_label, FreshnessIndicator, TierBadge};
use crate::themes::Theme;

/// Display width of the advisory labels column.
const LABEL_WIDTH: usize = 20;

/// All data required to render the realtime view.
#[derive(Debug, Clone)]
pub struct RealtimeViewData {
    pub locale: Locale,
    pub timezone: String,
    pub latest: Option<Reading>,
    pub today: Option<DailyAggregate>,
    /// Error from the most recent refresh, if it failed.
    pub error: Option<String>,
}

/// Build the body lines of the realtime view.
pub fn realtime_lines<'a>(data: &'a RealtimeViewData, theme: &'a Theme) -> Vec<Line<'a>> {
    let locale = data.locale;
    let mut lines = Header::new(locale, &data.timezone, theme).to_lines();

    let Some(reading) = data.latest else {
        match &data.error {
            Some(err) => {
                lines.push(Line::from(Span::styled(
                    locale::text(locale, TextKey::FetchError),
                    theme.error,
                )));
                lines.push(Line::from(Span::styled(err.clone(), theme.dim)));
            }
            None => lines.push(Line::from(Span::styled(
                locale::text(locale, TextKey::Loading),
                theme.info,
            ))),
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            locale::text(locale, TextKey::PressQuit),
            theme.dim,
        )));
        return lines;
    };

    lines.push(Line::from(vec![
        Span::styled(
            format!("{}: ", locale::text(locale, TextKey::CurrentLevel)),
            theme.label,
        ),
        Span::styled(format_concentration(reading.pm25), theme.value),
    ]));

    match classify(reading.pm25, locale) {
        Ok(c) => {
            lines.push(TierBadge::new(&c, theme).to_line());
            lines.push(ConcentrationGauge::new(reading.pm25, theme).to_line());
            lines.push(Line::from(Span::styled(c.summary, theme.text)));
            lines.push(Line::from(""));

            let advisory = [
                (TextKey::Respirator, c.advisory.respirator),
                (TextKey::OutdoorActivity, c.advisory.outdoor),
                (TextKey::IndoorVentilation, indoor_guidance(&c, locale)),
                (TextKey::SensitiveGroups, c.advisory.sensitive_groups),
            ];
            for (key, guidance) in advisory {
                lines.push(Line::from(vec![
                    Span::styled(pad_label(locale::text(locale, key), LABEL_WIDTH), theme.label),
                    Span::styled(guidance, theme.text),
                ]));
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "latest reading cannot be classified");
            lines.push(Line::from(Span::styled(e.to_string(), theme.error)));
        }
    }
    lines.push(Line::from(""));

    if let Some(today) = data.today {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", locale::text(locale, TextKey::TodayAverage)),
                theme.label,
            ),
            Span::styled(
                format_concentration(today.mean),
                theme.concentration_style(today.mean),
            ),
            Span::styled(
                format!(
                    "  (🚬 {} {})",
                    format_number(cigarette_equivalent(today.mean), 1),
                    locale::text(locale, TextKey::CigaretteEquivalent)
                ),
                theme.dim,
            ),
        ]));
    }

    let updated = format_timestamp(reading.timestamp, locale);
    lines.extend(FreshnessIndicator::new(locale, updated, data.error.as_deref(), theme).to_lines());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        locale::text(locale, TextKey::PressQuit),
        theme.dim,
    )));
    lines
}

/// Render the realtime view into `area`.
pub fn render_realtime_view(frame: &mut Frame, area: Rect, data: &RealtimeViewData, theme: &Theme) {
    let lines = realtime_lines(data, theme);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).border_style(theme.table_border))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn reading(pm25: f64) -> Reading {
        let ts = NaiveDateTime::parse_from_str("2026-10-17 14:05", "%Y-%m-%d %H:%M").unwrap();
        Reading::new(ts, pm25)
    }

    fn data(locale: Locale, latest: Option<Reading>, error: Option<&str>) -> RealtimeViewData {
        RealtimeViewData {
            locale,
            timezone: "Asia/Bangkok".to_string(),
            latest,
            today: latest.map(|r| DailyAggregate {
                date: r.date(),
                mean: r.pm25,
                samples: 1,
            }),
            error: error.map(str::to_string),
        }
    }

    fn all_text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_realtime_lines_english() {
        let theme = Theme::dark();
        let d = data(Locale::En, Some(reading(44.0)), None);
        let text = all_text(&realtime_lines(&d, &theme));
        assert!(text.contains("Current PM2.5: 44.0 µg/m³"));
        assert!(text.contains("(4/5)"));
        assert!(text.contains("Last updated: 17 Oct 2026 14:05"));
        assert!(text.contains("2.0 Cigarette equivalent"));
        assert!(!text.contains("Could not refresh"));
    }

    #[test]
    fn test_realtime_lines_thai_uses_buddhist_year_and_override() {
        let theme = Theme::dark();
        let d = data(Locale::Th, Some(reading(30.0)), None);
        let lines = realtime_lines(&d, &theme);
        let text = all_text(&lines);
        assert!(text.contains("17/10/2569 14:05"));

        let c = classify(30.0, Locale::Th).unwrap();
        assert!(text.contains(indoor_guidance(&c, Locale::Th)));
    }

    #[test]
    fn test_realtime_lines_stale_shows_error() {
        let theme = Theme::dark();
        let d = data(Locale::En, Some(reading(10.0)), Some("connection refused"));
        let text = all_text(&realtime_lines(&d, &theme));
        assert!(text.contains("Current PM2.5"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_realtime_lines_loading_and_error_states() {
        let theme = Theme::dark();
        let loading = data(Locale::En, None, None);
        assert!(all_text(&realtime_lines(&loading, &theme)).contains("Loading sensor data"));

        let failed = data(Locale::En, None, Some("No CSV files found in /tmp"));
        let text = all_text(&realtime_lines(&failed, &theme));
        assert!(text.contains("Could not refresh data"));
        assert!(text.contains("No CSV files found"));
    }

    #[test]
    fn test_render_realtime_view_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let d = data(Locale::Th, Some(reading(80.0)), None);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_realtime_view(frame, area, &d, &theme);
            })
            .unwrap();
    }
}
