//! PM2.5 risk tiers and the classifier.
//!
//! Numeric policy lives in [`TIER_BANDS`]; all text is looked up through
//! [`crate::locale`], so the chosen tier never depends on the locale.

use serde::{Deserialize, Serialize};

use crate::error::{AqiError, Result};
use crate::locale::{self, Locale};

/// Daily means above this value count as unhealthy days (µg/m³).
pub const UNHEALTHY_THRESHOLD: f64 = 37.5;

/// PM2.5 exposure equivalent to smoking one cigarette (µg/m³ over a day).
pub const CIGARETTE_PM25_EQUIVALENT: f64 = 22.0;

/// One of the five ordinal risk levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Good,
    Moderate,
    UnhealthySensitive,
    Hazardous,
}

impl Tier {
    /// All tiers, lowest risk first.
    pub const ALL: [Tier; 5] = [
        Tier::Excellent,
        Tier::Good,
        Tier::Moderate,
        Tier::UnhealthySensitive,
        Tier::Hazardous,
    ];

    /// 1-based ordinal of the tier.
    pub fn level(&self) -> u8 {
        match self {
            Tier::Excellent => 1,
            Tier::Good => 2,
            Tier::Moderate => 3,
            Tier::UnhealthySensitive => 4,
            Tier::Hazardous => 5,
        }
    }

    /// Display color as `#RRGGBB`.
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Excellent => "#0099FF",
            Tier::Good => "#2ECC71",
            Tier::Moderate => "#F1C40F",
            Tier::UnhealthySensitive => "#E67E22",
            Tier::Hazardous => "#E74C3C",
        }
    }

    /// Display color as an `(r, g, b)` triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(self.color()).unwrap_or((255, 255, 255))
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Tier::Excellent => "😄",
            Tier::Good => "🙂",
            Tier::Moderate => "😐",
            Tier::UnhealthySensitive => "😷",
            Tier::Hazardous => "🤢",
        }
    }

    /// Look up the tier for a concentration.
    ///
    /// Returns `None` for NaN or negative input.
    pub fn for_concentration(concentration: f64) -> Option<Tier> {
        if concentration.is_nan() || concentration < 0.0 {
            return None;
        }
        TIER_BANDS
            .iter()
            .find(|band| band.contains(concentration))
            .map(|band| band.tier)
    }
}

/// Concentration interval `(lower_exclusive, upper_inclusive]` of one tier.
///
/// `None` bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierBand {
    pub lower_exclusive: Option<f64>,
    pub upper_inclusive: Option<f64>,
    pub tier: Tier,
}

impl TierBand {
    pub fn contains(&self, concentration: f64) -> bool {
        let above_lower = self.lower_exclusive.map_or(true, |lo| concentration > lo);
        let within_upper = self.upper_inclusive.map_or(true, |hi| concentration <= hi);
        above_lower && within_upper
    }
}

/// Tier boundaries in µg/m³, ascending and contiguous.
pub const TIER_BANDS: [TierBand; 5] = [
    TierBand {
        lower_exclusive: None,
        upper_inclusive: Some(15.0),
        tier: Tier::Excellent,
    },
    TierBand {
        lower_exclusive: Some(15.0),
        upper_inclusive: Some(25.0),
        tier: Tier::Good,
    },
    TierBand {
        lower_exclusive: Some(25.0),
        upper_inclusive: Some(37.5),
        tier: Tier::Moderate,
    },
    TierBand {
        lower_exclusive: Some(37.5),
        upper_inclusive: Some(75.0),
        tier: Tier::UnhealthySensitive,
    },
    TierBand {
        lower_exclusive: Some(75.0),
        upper_inclusive: None,
        tier: Tier::Hazardous,
    },
];

/// Behavioural guidance attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub respirator: &'static str,
    pub outdoor: &'static str,
    pub indoor: &'static str,
    pub sensitive_groups: &'static str,
}

/// Result of classifying one concentration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub tier: Tier,
    pub label: &'static str,
    pub color: &'static str,
    pub emoji: &'static str,
    pub summary: &'static str,
    pub advisory: Advisory,
}

/// Classify a PM2.5 concentration into its tier with localized text.
///
/// Fails with [`AqiError::InvalidConcentration`] for NaN or negative input.
pub fn classify(concentration: f64, locale: Locale) -> Result<Classification> {
    let tier = Tier::for_concentration(concentration)
        .ok_or(AqiError::InvalidConcentration(concentration))?;
    let text = locale::tier_text(locale, tier);
    Ok(Classification {
        tier,
        label: text.label,
        color: tier.color(),
        emoji: tier.emoji(),
        summary: text.summary,
        advisory: text.advisory,
    })
}

/// Convert a concentration to its cigarette equivalent.
pub fn cigarette_equivalent(concentration: f64) -> f64 {
    concentration / CIGARETTE_PM25_EQUIVALENT
}

/// Parse `#RRGGBB` into an `(r, g, b)` triple.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
