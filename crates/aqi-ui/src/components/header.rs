use crate::themes::Theme;
use aqi_core::locale::{self, Locale, TextKey};
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the application title.
pub const ACCENTS: &str = "· ∘ ·";

/// Dashboard header rendering four lines:
///
/// 1. Localized application title between accent marks.
/// 2. A 60-column `=` separator.
/// 3. Locale and timezone in `[ th | asia/bangkok ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    pub locale: Locale,
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(locale: Locale, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            locale,
            timezone,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ACCENTS, self.theme.header_accent),
                Span::styled(
                    format!(" {} ", locale::text(self.locale, TextKey::AppTitle)),
                    self.theme.header,
                ),
                Span::styled(ACCENTS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.locale.as_str(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone.to_lowercase(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
