use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::locale::Locale;

/// Offset between the Gregorian and the Thai Buddhist-era year.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use aqi_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` looks like "0.50"; keep ".50".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a PM2.5 concentration with one decimal and its unit.
///
/// ```
/// use aqi_core::formatting::format_concentration;
///
/// assert_eq!(format_concentration(27.44), "27.4 µg/m³");
/// ```
pub fn format_concentration(value: f64) -> String {
    format!("{} µg/m³", format_number(value, 1))
}

/// Locale-aware calendar year: Buddhist era for Thai, Gregorian otherwise.
pub fn display_year(year: i32, locale: Locale) -> i32 {
    match locale {
        Locale::Th => year + BUDDHIST_ERA_OFFSET,
        Locale::En => year,
    }
}

/// Format a date for display.
///
/// * English: `"17 Oct 2026"`
/// * Thai: `"17/10/2569"`
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::En => date.format("%-d %b %Y").to_string(),
        Locale::Th => format!(
            "{}/{}/{}",
            date.day(),
            date.month(),
            display_year(date.year(), locale)
        ),
    }
}

/// Format a reading timestamp for display (24-hour clock).
///
/// ```
/// use aqi_core::formatting::format_timestamp;
/// use aqi_core::locale::Locale;
/// use chrono::NaiveDate;
///
/// let ts = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap().and_hms_opt(14, 5, 0).unwrap();
/// assert_eq!(format_timestamp(ts, Locale::En), "17 Oct 2026 14:05");
/// assert_eq!(format_timestamp(ts, Locale::Th), "17/10/2569 14:05");
/// ```
pub fn format_timestamp(ts: NaiveDateTime, locale: Locale) -> String {
    format!("{} {}", format_date(ts.date(), locale), ts.format("%H:%M"))
}

/// Format a `(year, month)` period for table rows, e.g. `"2024-03"` or `"03/2567"`.
pub fn format_month(year: i32, month: u32, locale: Locale) -> String {
    match locale {
        Locale::En => format!("{:04}-{:02}", year, month),
        Locale::Th => format!("{:02}/{}", month, display_year(year, locale)),
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
