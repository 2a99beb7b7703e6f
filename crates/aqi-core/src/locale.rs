//! Typed text tables for the two supported locales.
//!
//! Every lookup is an exhaustive `match`, so adding a [`TextKey`] or a
//! [`Tier`] without translating it for both locales does not compile.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AqiError;
use crate::tiers::{Advisory, Tier};

/// Supported display locales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Thai (default).
    #[default]
    Th,
    /// English.
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Th => "th",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = AqiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "th" => Ok(Locale::Th),
            "en" => Ok(Locale::En),
            other => Err(AqiError::InvalidLocale(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic keys for user-facing strings outside the tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    AppTitle,
    CurrentLevel,
    LastUpdated,
    TodayAverage,
    Respirator,
    OutdoorActivity,
    IndoorVentilation,
    SensitiveGroups,
    DailyHistory,
    MonthlyHistory,
    DateRange,
    Calendar,
    HealthImpact,
    UnhealthyDays,
    CigaretteEquivalent,
    DaysWithData,
    Period,
    Average,
    Maximum,
    Minimum,
    Level,
    Readings,
    Summary,
    NoData,
    InvalidRange,
    Loading,
    FetchError,
    PressQuit,
}

/// Localized label, summary and advisory for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierText {
    pub label: &'static str,
    pub summary: &'static str,
    pub advisory: Advisory,
}

/// Look up a UI string.
pub fn text(locale: Locale, key: TextKey) -> &'static str {
    match locale {
        Locale::Th => text_th(key),
        Locale::En => text_en(key),
    }
}

/// Look up the text bundle of a tier.
pub fn tier_text(locale: Locale, tier: Tier) -> TierText {
    match locale {
        Locale::Th => tier_text_th(tier),
        Locale::En => tier_text_en(tier),
    }
}

/// Full month name for `month` in `1..=12`; empty for anything else.
pub fn month_name(locale: Locale, month: u32) -> &'static str {
    const TH: [&str; 12] = [
        "มกราคม",
        "กุมภาพันธ์",
        "มีนาคม",
        "เมษายน",
        "พฤษภาคม",
        "มิถุนายน",
        "กรกฎาคม",
        "สิงหาคม",
        "กันยายน",
        "ตุลาคม",
        "พฤศจิกายน",
        "ธันวาคม",
    ];
    const EN: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    let names = match locale {
        Locale::Th => &TH,
        Locale::En => &EN,
    };
    month
        .checked_sub(1)
        .and_then(|i| names.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Short weekday name used as a calendar column header.
pub fn weekday_short(locale: Locale, day: Weekday) -> &'static str {
    match (locale, day) {
        (Locale::Th, Weekday::Mon) => "จ",
        (Locale::Th, Weekday::Tue) => "อ",
        (Locale::Th, Weekday::Wed) => "พ",
        (Locale::Th, Weekday::Thu) => "พฤ",
        (Locale::Th, Weekday::Fri) => "ศ",
        (Locale::Th, Weekday::Sat) => "ส",
        (Locale::Th, Weekday::Sun) => "อา",
        (Locale::En, Weekday::Mon) => "Mo",
        (Locale::En, Weekday::Tue) => "Tu",
        (Locale::En, Weekday::Wed) => "We",
        (Locale::En, Weekday::Thu) => "Th",
        (Locale::En, Weekday::Fri) => "Fr",
        (Locale::En, Weekday::Sat) => "Sa",
        (Locale::En, Weekday::Sun) => "Su",
    }
}

fn text_en(key: TextKey) -> &'static str {
    match key {
        TextKey::AppTitle => "PM2.5 AIR QUALITY MONITOR",
        TextKey::CurrentLevel => "Current PM2.5",
        TextKey::LastUpdated => "Last updated",
        TextKey::TodayAverage => "Today's average",
        TextKey::Respirator => "Mask",
        TextKey::OutdoorActivity => "Outdoor activity",
        TextKey::IndoorVentilation => "Indoors",
        TextKey::SensitiveGroups => "Sensitive groups",
        TextKey::DailyHistory => "Daily averages",
        TextKey::MonthlyHistory => "Monthly averages",
        TextKey::DateRange => "Selected range",
        TextKey::Calendar => "Calendar",
        TextKey::HealthImpact => "Health impact",
        TextKey::UnhealthyDays => "Unhealthy days",
        TextKey::CigaretteEquivalent => "Cigarette equivalent",
        TextKey::DaysWithData => "Days with data",
        TextKey::Period => "Period",
        TextKey::Average => "Average",
        TextKey::Maximum => "Max",
        TextKey::Minimum => "Min",
        TextKey::Level => "Level",
        TextKey::Readings => "Readings",
        TextKey::Summary => "SUMMARY",
        TextKey::NoData => "No data for this period",
        TextKey::InvalidRange => "Start date must not be after end date",
        TextKey::Loading => "Loading sensor data...",
        TextKey::FetchError => "Could not refresh data",
        TextKey::PressQuit => "Press 'q' or Ctrl+C to exit",
    }
}

fn text_th(key: TextKey) -> &'static str {
    match key {
        TextKey::AppTitle => "ระบบติดตามฝุ่น PM2.5",
        TextKey::CurrentLevel => "ค่า PM2.5 ปัจจุบัน",
        TextKey::LastUpdated => "อัปเดตล่าสุด",
        TextKey::TodayAverage => "ค่าเฉลี่ยวันนี้",
        TextKey::Respirator => "หน้ากาก",
        TextKey::OutdoorActivity => "กิจกรรมกลางแจ้ง",
        TextKey::IndoorVentilation => "ภายในอาคาร",
        TextKey::SensitiveGroups => "กลุ่มเสี่ยง",
        TextKey::DailyHistory => "ค่าเฉลี่ยรายวัน",
        TextKey::MonthlyHistory => "ค่าเฉลี่ยรายเดือน",
        TextKey::DateRange => "ช่วงวันที่เลือก",
        TextKey::Calendar => "ปฏิทิน",
        TextKey::HealthImpact => "ผลกระทบต่อสุขภาพ",
        TextKey::UnhealthyDays => "จำนวนวันที่มีผลต่อสุขภาพ",
        TextKey::CigaretteEquivalent => "เทียบเท่าการสูบบุหรี่ (มวน)",
        TextKey::DaysWithData => "จำนวนวันที่มีข้อมูล",
        TextKey::Period => "ช่วงเวลา",
        TextKey::Average => "ค่าเฉลี่ย",
        TextKey::Maximum => "สูงสุด",
        TextKey::Minimum => "ต่ำสุด",
        TextKey::Level => "ระดับ",
        TextKey::Readings => "จำนวนค่าที่วัด",
        TextKey::Summary => "สรุป",
        TextKey::NoData => "ไม่มีข้อมูลในช่วงเวลานี้",
        TextKey::InvalidRange => "วันที่เริ่มต้นต้องไม่อยู่หลังวันที่สิ้นสุด",
        TextKey::Loading => "กำลังโหลดข้อมูล...",
        TextKey::FetchError => "ไม่สามารถอัปเดตข้อมูลได้",
        TextKey::PressQuit => "กด 'q' หรือ Ctrl+C เพื่อออก",
    }
}

fn tier_text_en(tier: Tier) -> TierText {
    match tier {
        Tier::Excellent => TierText {
            label: "Excellent",
            summary: "Air quality is excellent. Enjoy your time outdoors.",
            advisory: Advisory {
                respirator: "No mask needed.",
                outdoor: "Outdoor activities and exercise are fine.",
                indoor: "Open the windows and let fresh air in.",
                sensitive_groups: "No special precautions needed.",
            },
        },
        Tier::Good => TierText {
            label: "Good",
            summary: "Air quality is good.",
            advisory: Advisory {
                respirator: "No mask needed.",
                outdoor: "Outdoor activities are fine as usual.",
                indoor: "Ventilate as usual.",
                sensitive_groups: "Unusually sensitive people should watch for symptoms.",
            },
        },
        Tier::Moderate => TierText {
            label: "Moderate",
            summary: "Air quality is acceptable, but sensitive people should take care.",
            advisory: Advisory {
                respirator: "Sensitive people should wear an N95 mask outdoors.",
                outdoor: "Cut down on long or strenuous outdoor exertion.",
                indoor: "Keep windows closed at peak hours and run an air purifier if you have one.",
                sensitive_groups: "Children, older adults and people with heart or lung conditions should limit time outdoors.",
            },
        },
        Tier::UnhealthySensitive => TierText {
            label: "Unhealthy for sensitive groups",
            summary: "Air quality is starting to affect health.",
            advisory: Advisory {
                respirator: "Wear an N95 mask whenever you are outdoors.",
                outdoor: "Avoid outdoor exercise and shorten time outside.",
                indoor: "Close doors and windows and run an air purifier.",
                sensitive_groups: "Stay indoors and see a doctor if symptoms appear.",
            },
        },
        Tier::Hazardous => TierText {
            label: "Hazardous",
            summary: "Air quality is hazardous to health.",
            advisory: Advisory {
                respirator: "Wear an N95 mask at all times outdoors.",
                outdoor: "Avoid all outdoor activity.",
                indoor: "Seal the room and keep an air purifier running continuously.",
                sensitive_groups: "Stay indoors and seek medical help for any breathing difficulty.",
            },
        },
    }
}

fn tier_text_th(tier: Tier) -> TierText {
    match tier {
        Tier::Excellent => TierText {
            label: "ดีมาก",
            summary: "คุณภาพอากาศดีมาก เหมาะสำหรับกิจกรรมกลางแจ้ง",
            advisory: Advisory {
                respirator: "ไม่จำเป็นต้องสวมหน้ากาก",
                outdoor: "ทำกิจกรรมกลางแจ้งและออกกำลังกายได้ตามปกติ",
                indoor: "เปิดหน้าต่างระบายอากาศได้",
                sensitive_groups: "ไม่ต้องระวังเป็นพิเศษ",
            },
        },
        Tier::Good => TierText {
            label: "ดี",
            summary: "คุณภาพอากาศดี",
            advisory: Advisory {
                respirator: "ไม่จำเป็นต้องสวมหน้ากาก",
                outdoor: "ทำกิจกรรมกลางแจ้งได้ตามปกติ",
                indoor: "ระบายอากาศได้ตามปกติ",
                sensitive_groups: "ผู้ที่ไวต่อมลพิษควรสังเกตอาการ",
            },
        },
        Tier::Moderate => TierText {
            label: "ปานกลาง",
            summary: "คุณภาพอากาศปานกลาง กลุ่มเสี่ยงควรระวัง",
            advisory: Advisory {
                respirator: "กลุ่มเสี่ยงควรสวมหน้ากาก N95 เมื่ออยู่กลางแจ้ง",
                outdoor: "ลดกิจกรรมกลางแจ้งที่ใช้แรงมาก",
                indoor: "ปิดหน้าต่างในช่วงค่าฝุ่นสูง และเปิดเครื่องฟอกอากาศหากมี",
                sensitive_groups: "เด็ก ผู้สูงอายุ และผู้มีโรคประจำตัวควรลดเวลาอยู่กลางแจ้ง",
            },
        },
        Tier::UnhealthySensitive => TierText {
            label: "เริ่มมีผลกระทบต่อสุขภาพ",
            summary: "คุณภาพอากาศเริ่มมีผลกระทบต่อสุขภาพ",
            advisory: Advisory {
                respirator: "สวมหน้ากาก N95 ทุกครั้งเมื่ออยู่กลางแจ้ง",
                outdoor: "หลีกเลี่ยงการออกกำลังกายกลางแจ้ง",
                indoor: "ปิดประตูหน้าต่างและเปิดเครื่องฟอกอากาศ",
                sensitive_groups: "กลุ่มเสี่ยงควรอยู่ในอาคาร หากมีอาการผิดปกติให้พบแพทย์",
            },
        },
        Tier::Hazardous => TierText {
            label: "มีผลกระทบต่อสุขภาพ",
            summary: "คุณภาพอากาศมีผลกระทบต่อสุขภาพ",
            advisory: Advisory {
                respirator: "สวมหน้ากาก N95 ตลอดเวลาเมื่ออยู่กลางแจ้ง",
                outdoor: "งดกิจกรรมกลางแจ้งทุกชนิด",
                indoor: "ปิดห้องให้มิดชิดและเปิดเครื่องฟอกอากาศตลอดเวลา",
                sensitive_groups: "กลุ่มเสี่ยงต้องอยู่ในอาคาร หากหายใจลำบากให้รีบพบแพทย์",
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_str() {
        assert_eq!("th".parse::<Locale>().unwrap(), Locale::Th);
        assert_eq!(" EN ".parse::<Locale>().unwrap(), Locale::En);
        assert!(matches!(
            "fr".parse::<Locale>(),
            Err(AqiError::InvalidLocale(s)) if s == "fr"
        ));
    }

    #[test]
    fn test_locale_default_is_thai() {
        assert_eq!(Locale::default(), Locale::Th);
        assert_eq!(Locale::default().to_string(), "th");
    }

    #[test]
    fn test_every_tier_has_text_in_both_locales() {
        for locale in [Locale::Th, Locale::En] {
            for tier in Tier::ALL {
                let t = tier_text(locale, tier);
                assert!(!t.label.is_empty());
                assert!(!t.summary.is_empty());
                assert!(!t.advisory.respirator.is_empty());
                assert!(!t.advisory.outdoor.is_empty());
                assert!(!t.advisory.indoor.is_empty());
                assert!(!t.advisory.sensitive_groups.is_empty());
            }
        }
    }

    #[test]
    fn test_no_data_and_invalid_range_are_distinct() {
        for locale in [Locale::Th, Locale::En] {
            assert_ne!(
                text(locale, TextKey::NoData),
                text(locale, TextKey::InvalidRange)
            );
        }
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(Locale::En, 1), "January");
        assert_eq!(month_name(Locale::Th, 12), "ธันวาคม");
        assert_eq!(month_name(Locale::En, 0), "");
        assert_eq!(month_name(Locale::En, 13), "");
    }

    #[test]
    fn test_weekday_short() {
        assert_eq!(weekday_short(Locale::En, Weekday::Mon), "Mo");
        assert_eq!(weekday_short(Locale::Th, Weekday::Sun), "อา");
    }
}
