use aqi_core::tiers::Tier;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark; 7–15 are light. Absent or unparseable values count as dark.
pub fn detect_background() -> BackgroundType {
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(value: Option<&str>) -> BackgroundType {
    if let Some(bg) = value.and_then(|v| v.split(';').next_back()) {
        if let Ok(bg_num) = bg.parse::<u8>() {
            return if bg_num <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            };
        }
    }
    BackgroundType::Dark
}

/// Styles used by the dashboard views and components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Gauge ────────────────────────────────────────────────────────────────
    pub gauge_empty: Style,
    pub gauge_label: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,

    // ── Calendar ─────────────────────────────────────────────────────────────
    /// Day cell without readings.
    pub calendar_empty: Style,

    /// Use the 8-colour ANSI palette for tiers instead of true colour.
    pub ansi_tiers: bool,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::LightBlue),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            gauge_empty: Style::default().fg(Color::DarkGray),
            gauge_label: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            calendar_empty: Style::default().fg(Color::DarkGray),
            ansi_tiers: false,
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            gauge_empty: Style::default().fg(Color::Gray),
            gauge_label: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            calendar_empty: Style::default().fg(Color::Gray),
            ansi_tiers: false,
        }
    }

    /// Classic theme using only the basic 8-colour ANSI palette, without bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Green),
            header_accent: Style::default().fg(Color::Blue),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            gauge_empty: Style::default().fg(Color::DarkGray),
            gauge_label: Style::default().fg(Color::White),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),

            calendar_empty: Style::default().fg(Color::DarkGray),
            ansi_tiers: true,
        }
    }

    /// Dark or light, following `COLORFGBG`.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names fall back to `auto_detect`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Foreground colour of a tier.
    pub fn tier_color(&self, tier: Tier) -> Color {
        if self.ansi_tiers {
            return match tier {
                Tier::Excellent => Color::Blue,
                Tier::Good => Color::Green,
                Tier::Moderate => Color::Yellow,
                Tier::UnhealthySensitive => Color::LightRed,
                Tier::Hazardous => Color::Red,
            };
        }
        let (r, g, b) = tier.rgb();
        Color::Rgb(r, g, b)
    }

    pub fn tier_style(&self, tier: Tier) -> Style {
        Style::default().fg(self.tier_color(tier))
    }

    /// Tier style for a mean concentration, or `text` when it cannot be classified.
    pub fn concentration_style(&self, concentration: f64) -> Style {
        Tier::for_concentration(concentration)
            .map(|tier| self.tier_style(tier))
            .unwrap_or(self.text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
