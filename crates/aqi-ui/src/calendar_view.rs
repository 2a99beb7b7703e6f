//! Month calendar with each day coloured by its mean tier.

use aqi_core::formatting::{display_year, format_number};
use aqi_core::locale::{self, Locale, TextKey};
use aqi_data::aggregator::{CalendarDay, CalendarMonth};
use chrono::Datelike;
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::components::indicators::pad_label;
use crate::themes::Theme;

/// Columns per day cell: day number, mean and padding.
const CELL_WIDTH: usize = 10;

fn cell_spans(day: Option<CalendarDay>, theme: &Theme) -> (Span<'static>, Span<'static>) {
    match day {
        None => (
            Span::raw(" ".repeat(CELL_WIDTH)),
            Span::raw(" ".repeat(CELL_WIDTH)),
        ),
        Some(day) => {
            let number = Span::styled(
                format!("{:<width$}", day.date.day(), width = CELL_WIDTH),
                theme.label,
            );
            let mean = match day.aggregate {
                Some(agg) => Span::styled(
                    format!("{:<width$}", format_number(agg.mean, 1), width = CELL_WIDTH),
                    theme.concentration_style(agg.mean),
                ),
                None => Span::styled(
                    format!("{:<width$}", "·", width = CELL_WIDTH),
                    theme.calendar_empty,
                ),
            };
            (number, mean)
        }
    }
}

/// Build the calendar grid lines: weekday header then two lines per week.
pub fn calendar_lines(month: &CalendarMonth, locale: Locale, theme: &Theme) -> Vec<Line<'static>> {
    let header: Vec<Span<'static>> = CalendarMonth::weekday_order()
        .into_iter()
        .map(|wd| {
            Span::styled(
                pad_label(locale::weekday_short(locale, wd), CELL_WIDTH),
                theme.table_header,
            )
        })
        .collect();

    let mut lines = vec![Line::from(header), Line::from("")];
    for week in month.weeks() {
        let (numbers, means): (Vec<_>, Vec<_>) =
            week.into_iter().map(|day| cell_spans(day, theme)).unzip();
        lines.push(Line::from(numbers));
        lines.push(Line::from(means));
    }
    lines
}

/// Render the calendar for one month into `area`.
pub fn render_calendar_view(
    frame: &mut Frame,
    area: Rect,
    month: &CalendarMonth,
    locale: Locale,
    theme: &Theme,
) {
    let title = format!(
        " {}: {} {} (µg/m³) ",
        locale::text(locale, TextKey::Calendar),
        locale::month_name(locale, month.month),
        display_year(month.year, locale)
    );

    let mut lines = calendar_lines(month, locale, theme);
    if month.days.iter().all(|d| d.aggregate.is_none()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            locale::text(locale, TextKey::NoData),
            theme.warning,
        )));
    }
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
                .title(title),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi_core::models::DailyAggregate;
    use aqi_core::tiers::Tier;
    use aqi_data::aggregator::SeriesAggregator;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn february() -> CalendarMonth {
        let daily = vec![DailyAggregate {
            date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            mean: 80.0,
            samples: 3,
        }];
        SeriesAggregator::calendar_month(&daily, 2024, 2).unwrap()
    }

    #[test]
    fn test_calendar_lines_shape() {
        let theme = Theme::dark();
        let lines = calendar_lines(&february(), Locale::En, &theme);
        // Header, blank, then two lines for each of five weeks.
        assert_eq!(lines.len(), 2 + 5 * 2);
        assert_eq!(lines[0].spans.len(), 7);
        assert!(lines[2..].iter().all(|l| l.spans.len() == 7));
    }

    #[test]
    fn test_calendar_day_coloured_by_tier() {
        let theme = Theme::dark();
        let lines = calendar_lines(&february(), Locale::En, &theme);
        // 14 Feb 2024 is a Wednesday in the third week.
        let means = &lines[2 + 2 * 2 + 1];
        assert!(means.spans[2].content.starts_with("80.0"));
        assert_eq!(means.spans[2].style, theme.tier_style(Tier::Hazardous));
    }

    #[test]
    fn test_render_calendar_thai_title() {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let month = february();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_calendar_view(frame, area, &month, Locale::Th, &theme);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("2567"));
    }
}
