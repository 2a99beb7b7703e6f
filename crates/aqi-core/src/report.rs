//! Payload handed to the external report-card image renderer.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::Result;
use crate::formatting::{format_concentration, format_timestamp};
use crate::locale::Locale;
use crate::models::Reading;
use crate::tiers::{classify, Advisory, Tier};

/// Everything needed to lay out a shareable report card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCard {
    pub locale: Locale,
    pub tier: Tier,
    pub label: &'static str,
    pub color: &'static str,
    pub emoji: &'static str,
    pub summary: &'static str,
    pub advisory: Advisory,
    pub concentration: f64,
    /// Concentration formatted with its unit.
    pub concentration_text: String,
    pub recorded_at: NaiveDateTime,
    /// Localized timestamp string printed on the card.
    pub timestamp_text: String,
}

impl ReportCard {
    /// Build the card for a single reading.
    pub fn for_reading(reading: &Reading, locale: Locale) -> Result<Self> {
        let c = classify(reading.pm25, locale)?;
        Ok(Self {
            locale,
            tier: c.tier,
            label: c.label,
            color: c.color,
            emoji: c.emoji,
            summary: c.summary,
            advisory: c.advisory,
            concentration: reading.pm25,
            concentration_text: format_concentration(reading.pm25),
            recorded_at: reading.timestamp,
            timestamp_text: format_timestamp(reading.timestamp, locale),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
