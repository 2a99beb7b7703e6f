//! Yearly health-impact panel: unhealthy days and cigarette equivalents.

use aqi_core::formatting::{display_year, format_date, format_number};
use aqi_core::locale::{self, Locale, TextKey};
use aqi_core::models::{DailyAggregate, HealthImpactSummary};
use aqi_core::tiers::{cigarette_equivalent, Tier};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::components::indicators::pad_label;
use crate::table_view;
use crate::themes::Theme;

const LABEL_WIDTH: usize = 30;

/// Data for the health-impact panel of one year.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactViewData {
    pub summary: HealthImpactSummary,
    /// Days of `summary.year` whose mean exceeded the unhealthy threshold.
    pub unhealthy_days: Vec<DailyAggregate>,
}

fn summary_line(label: &'static str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(pad_label(label, LABEL_WIDTH), theme.label),
        Span::styled(value, theme.value),
    ])
}

/// Body lines of the panel; assumes the summary has data.
pub fn impact_lines(data: &ImpactViewData, locale: Locale, theme: &Theme) -> Vec<Line<'static>> {
    let s = &data.summary;
    let mut lines = vec![
        summary_line(
            locale::text(locale, TextKey::DaysWithData),
            s.days_with_data.to_string(),
            theme,
        ),
        summary_line(
            locale::text(locale, TextKey::UnhealthyDays),
            s.unhealthy_day_count.to_string(),
            theme,
        ),
        Line::from(vec![
            Span::styled(
                pad_label(locale::text(locale, TextKey::CigaretteEquivalent), LABEL_WIDTH),
                theme.label,
            ),
            Span::styled(format!("🚬 {}", s.cumulative_cigarette_equivalent), theme.warning),
        ]),
        Line::from(""),
    ];

    if !data.unhealthy_days.is_empty() {
        lines.push(Line::from(Span::styled(
            locale::text(locale, TextKey::UnhealthyDays),
            theme.table_header,
        )));
    }
    for day in &data.unhealthy_days {
        let style = match Tier::for_concentration(day.mean) {
            Some(tier) => theme.tier_style(tier),
            None => theme.text,
        };
        lines.push(Line::from(vec![
            Span::styled(pad_label(&format_date(day.date, locale), 16), theme.text),
            Span::styled(format!("{:>8}", format_number(day.mean, 1)), style),
            Span::styled(
                format!("  🚬 {}", format_number(cigarette_equivalent(day.mean), 1)),
                theme.dim,
            ),
        ]));
    }
    lines
}

/// Render the health-impact panel into `area`.
pub fn render_impact_view(
    frame: &mut Frame,
    area: Rect,
    data: &ImpactViewData,
    locale: Locale,
    theme: &Theme,
) {
    let title = format!(
        "{} {}",
        locale::text(locale, TextKey::HealthImpact),
        display_year(data.summary.year, locale)
    );
    if !data.summary.has_data() {
        table_view::render_no_data(frame, area, &title, locale, theme);
        return;
    }

    let mut lines = impact_lines(data, locale, theme);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        locale::text(locale, TextKey::PressQuit),
        theme.dim,
    )));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
