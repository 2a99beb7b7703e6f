use crate::themes::Theme;
use aqi_core::locale::{self, Locale, TextKey};
use aqi_core::tiers::Classification;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Pad `label` with trailing spaces to `width` terminal columns.
///
/// Thai combining marks take no column and emoji take two, so padding goes by
/// display width rather than `char` count.
pub fn pad_label(label: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(label);
    format!("{}{}", label, " ".repeat(width.saturating_sub(used)))
}

// ── TierBadge ────────────────────────────────────────────────────────────────

/// Emoji, localized label and level number of a classified reading.
pub struct TierBadge<'a> {
    pub classification: &'a Classification,
    pub theme: &'a Theme,
}

impl<'a> TierBadge<'a> {
    pub fn new(classification: &'a Classification, theme: &'a Theme) -> Self {
        Self {
            classification,
            theme,
        }
    }

    /// Format: `"😷 Unhealthy for sensitive groups (4/5)"`
    pub fn to_line(&self) -> Line<'static> {
        let style = self
            .theme
            .tier_style(self.classification.tier)
            .add_modifier(Modifier::BOLD);
        Line::from(vec![
            Span::raw(self.classification.emoji),
            Span::raw(" "),
            Span::styled(self.classification.label, style),
            Span::styled(
                format!(" ({}/5)", self.classification.tier.level()),
                self.theme.dim,
            ),
        ])
    }
}

// ── FreshnessIndicator ───────────────────────────────────────────────────────

/// Last-update line, with the fetch error appended when the data is stale.
pub struct FreshnessIndicator<'a> {
    pub locale: Locale,
    /// Formatted timestamp of the latest reading.
    pub updated: String,
    pub error: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> FreshnessIndicator<'a> {
    pub fn new(locale: Locale, updated: String, error: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            locale,
            updated,
            error,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("🕒 {}: ", locale::text(self.locale, TextKey::LastUpdated)),
                self.theme.label,
            ),
            Span::styled(self.updated.clone(), self.theme.value),
        ])];

        if let Some(err) = self.error {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("⚠ {}: ", locale::text(self.locale, TextKey::FetchError)),
                    self.theme.warning,
                ),
                Span::styled(err.to_string(), self.theme.dim),
            ]));
        }
        lines
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
