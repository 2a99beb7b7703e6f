//! Indoor guidance shown on the dashboard.
//!
//! The classifier always returns a tier's canonical advisory. For the Thai
//! locale the dashboard swaps the indoor line in the two middle bands for
//! more concrete ventilation advice.

use aqi_core::locale::Locale;
use aqi_core::tiers::{Classification, Tier};

const TH_INDOOR_MODERATE: &str =
    "ปิดประตูหน้าต่างเมื่อค่าฝุ่นสูงขึ้น และเปิดเครื่องฟอกอากาศหากมี";
const TH_INDOOR_UNHEALTHY: &str =
    "ปิดประตูหน้าต่างให้สนิท เปิดเครื่องฟอกอากาศตลอดเวลา และงดเปิดพัดลมดูดอากาศจากภายนอก";

/// Indoor line to display for a classified reading.
///
/// The Thai overrides cover exactly the Moderate band (25, 37.5] and the
/// sensitive-groups band (37.5, 75]; other tiers use the catalogue text.
pub fn indoor_guidance(classification: &Classification, locale: Locale) -> &'static str {
    match (locale, classification.tier) {
        (Locale::Th, Tier::Moderate) => TH_INDOOR_MODERATE,
        (Locale::Th, Tier::UnhealthySensitive) => TH_INDOOR_UNHEALTHY,
        _ => classification.advisory.indoor,
    }
}
