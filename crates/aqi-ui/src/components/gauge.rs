use crate::themes::Theme;
use aqi_core::formatting::format_concentration;
use aqi_core::tiers::Tier;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of the gauge.
pub struct GaugeConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    /// Concentration at the right edge of the bar; higher values are clamped.
    pub scale_max: f64,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            width: 50,
            scale_max: 100.0,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── ConcentrationGauge ───────────────────────────────────────────────────────

/// Horizontal bar showing a concentration against the tier bands.
///
/// Each filled cell takes the colour of the tier its position falls in, so
/// the bar reads as a blue-to-red scale up to the current value.
pub struct ConcentrationGauge<'a> {
    pub concentration: f64,
    pub theme: &'a Theme,
    pub config: GaugeConfig,
}

impl<'a> ConcentrationGauge<'a> {
    pub fn new(concentration: f64, theme: &'a Theme) -> Self {
        Self {
            concentration,
            theme,
            config: GaugeConfig::default(),
        }
    }

    /// Number of filled cells for the current concentration.
    pub fn filled_cells(&self) -> u16 {
        if self.concentration.is_nan() || self.concentration <= 0.0 || self.config.scale_max <= 0.0 {
            return 0;
        }
        let ratio = (self.concentration / self.config.scale_max).min(1.0);
        (ratio * self.config.width as f64).round() as u16
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_cells();
        let cell_span = self.config.scale_max / self.config.width.max(1) as f64;

        // Consecutive cells of the same tier share one span.
        let mut spans: Vec<Span<'a>> = Vec::new();
        let mut run = String::new();
        let mut run_style: Option<Style> = None;
        for i in 0..filled {
            let midpoint = (i as f64 + 0.5) * cell_span;
            let style = Tier::for_concentration(midpoint)
                .map(|tier| self.theme.tier_style(tier))
                .unwrap_or(self.theme.text);
            if run_style.is_some_and(|s| s != style) {
                spans.push(Span::styled(std::mem::take(&mut run), run_style.unwrap_or_default()));
            }
            run.push(self.config.filled_char);
            run_style = Some(style);
        }
        if let Some(style) = run_style {
            spans.push(Span::styled(run, style));
        }

        let empty = self.config.width.saturating_sub(filled);
        let empty_str: String = std::iter::repeat(self.config.empty_char)
            .take(empty as usize)
            .collect();
        spans.push(Span::styled(empty_str, self.theme.gauge_empty));
        spans.push(Span::styled(
            format!(" {}", format_concentration(self.concentration)),
            self.theme.gauge_label,
        ));

        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_filled_cells() {
        let theme = Theme::dark();
        assert_eq!(ConcentrationGauge::new(0.0, &theme).filled_cells(), 0);
        assert_eq!(ConcentrationGauge::new(50.0, &theme).filled_cells(), 25);
        assert_eq!(ConcentrationGauge::new(100.0, &theme).filled_cells(), 50);
        assert_eq!(ConcentrationGauge::new(400.0, &theme).filled_cells(), 50);
        assert_eq!(ConcentrationGauge::new(f64::NAN, &theme).filled_cells(), 0);
    }

    #[test]
    fn test_bar_width_is_constant() {
        let theme = Theme::dark();
        for x in [0.0, 12.0, 37.5, 80.0, 250.0] {
            let line = ConcentrationGauge::new(x, &theme).to_line();
            let bar: String = bar_text(&line).chars().take_while(|c| *c != ' ').collect();
            assert_eq!(bar.chars().count(), 50, "concentration {x}");
        }
    }

    #[test]
    fn test_segments_follow_tiers() {
        let theme = Theme::dark();
        let line = ConcentrationGauge::new(100.0, &theme).to_line();
        // Five tier segments, the empty remainder and the label.
        assert_eq!(line.spans.len(), 7);
        assert_eq!(line.spans[0].style, theme.tier_style(Tier::Excellent));
        assert_eq!(line.spans[4].style, theme.tier_style(Tier::Hazardous));
    }

    #[test]
    fn test_label_shows_concentration() {
        let theme = Theme::dark();
        let line = ConcentrationGauge::new(27.4, &theme).to_line();
        assert!(bar_text(&line).ends_with(" 27.4 µg/m³"));
    }
}
