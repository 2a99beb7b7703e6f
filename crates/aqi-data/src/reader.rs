//! CSV discovery and parsing for spreadsheet exports.
//!
//! The sensor sheet is published as CSV with a header row. The reader picks
//! the timestamp and PM2.5 columns by header name and turns every usable row
//! into a [`Reading`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use aqi_core::error::{AqiError, Result};
use aqi_core::models::{Reading, Series};
use aqi_core::time_utils::TimezoneHandler;
use regex::Regex;
use tracing::{debug, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// A parsed series together with ingestion counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSeries {
    pub series: Series,
    /// Data rows seen, including skipped ones.
    pub rows_read: usize,
    /// Rows dropped for an empty, unparseable, NaN or negative value.
    pub rows_skipped: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Parse one CSV document into a series.
pub fn parse_csv(text: &str, tz: &TimezoneHandler) -> Result<LoadedSeries> {
    let mut seen = HashSet::new();
    let (readings, rows_read, rows_skipped) = parse_rows(text, tz, &mut seen)?;
    Ok(LoadedSeries {
        series: Series::new(readings),
        rows_read,
        rows_skipped,
    })
}

/// Load a CSV file, or every CSV file under a directory.
///
/// Files that fail to parse inside a directory are skipped with a warning;
/// the last failure is returned only if no file could be read at all.
pub fn load_series_from_path(path: &Path, tz: &TimezoneHandler) -> Result<LoadedSeries> {
    if !path.exists() {
        return Err(AqiError::DataPathNotFound(path.to_path_buf()));
    }

    let files = if path.is_dir() {
        let files = find_csv_files(path);
        if files.is_empty() {
            return Err(AqiError::NoDataFiles(path.to_path_buf()));
        }
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut seen = HashSet::new();
    let mut readings = Vec::new();
    let mut rows_read = 0;
    let mut rows_skipped = 0;
    let mut loaded_any = false;
    let mut last_error = None;

    for file in &files {
        match read_file(file).and_then(|text| parse_rows(&text, tz, &mut seen)) {
            Ok((rows, read, skipped)) => {
                readings.extend(rows);
                rows_read += read;
                rows_skipped += skipped;
                loaded_any = true;
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                last_error = Some(e);
            }
        }
    }

    if !loaded_any {
        if let Some(e) = last_error {
            return Err(e);
        }
    }

    debug!(
        "Loaded {} readings from {} files ({} rows skipped)",
        readings.len(),
        files.len(),
        rows_skipped
    );

    Ok(LoadedSeries {
        series: Series::new(readings),
        rows_read,
        rows_skipped,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn pm25_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)pm\s*2[._,]?5").expect("regex is valid"))
}

/// Header names taken as the timestamp column when they match exactly.
const TIME_HEADERS: [&str; 5] = ["timestamp", "time", "date", "เวลา", "วันที่"];

fn time_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(time|date)|เวลา|วันที่").expect("regex is valid"))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| AqiError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Locate the `(timestamp, pm25)` column indices in a header row.
fn locate_columns(headers: &csv::StringRecord) -> Result<(usize, usize)> {
    let pm_idx = headers
        .iter()
        .position(|h| pm25_header().is_match(h))
        .ok_or_else(|| AqiError::MissingColumn("PM2.5".to_string()))?;
    let candidates = || headers.iter().enumerate().filter(move |(i, _)| *i != pm_idx);
    let time_idx = candidates()
        .find(|(_, h)| {
            let h = h.trim().to_lowercase();
            TIME_HEADERS.contains(&h.as_str())
        })
        .or_else(|| candidates().find(|(_, h)| time_header().is_match(h)))
        .map(|(i, _)| i)
        .ok_or_else(|| AqiError::MissingColumn("timestamp".to_string()))?;
    Ok((time_idx, pm_idx))
}

/// Parse a concentration cell; `None` for anything the classifier would reject.
///
/// A single comma with no dot is read as a decimal comma (`"27,4"`). Any
/// other comma makes the cell unusable.
fn parse_concentration(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    let value: f64 = match cell.matches(',').count() {
        0 => cell.parse().ok()?,
        1 if !cell.contains('.') => cell.replace(',', ".").parse().ok()?,
        _ => return None,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse rows into readings, dropping exact duplicates already in `seen`.
///
/// Returns `(readings, rows_read, rows_skipped)`.
fn parse_rows(
    text: &str,
    tz: &TimezoneHandler,
    seen: &mut HashSet<(chrono::NaiveDateTime, u64)>,
) -> Result<(Vec<Reading>, usize, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AqiError::CsvParse(e.to_string()))?
        .clone();
    let (time_idx, pm_idx) = locate_columns(&headers)?;

    let mut readings = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_skipped = 0usize;
    let mut duplicates = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| AqiError::CsvParse(e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows_read += 1;

        let Some(timestamp) = record.get(time_idx).and_then(|s| tz.parse_local(s)) else {
            debug!("Row {}: unparseable timestamp {:?}", line + 2, record.get(time_idx));
            rows_skipped += 1;
            continue;
        };
        let Some(pm25) = record.get(pm_idx).and_then(parse_concentration) else {
            debug!("Row {}: unusable PM2.5 value {:?}", line + 2, record.get(pm_idx));
            rows_skipped += 1;
            continue;
        };

        if !seen.insert((timestamp, pm25.to_bits())) {
            duplicates += 1;
            continue;
        }
        readings.push(Reading::new(timestamp, pm25));
    }

    if rows_skipped > 0 {
        warn!("Skipped {} of {} CSV rows", rows_skipped, rows_read);
    }
    if duplicates > 0 {
        debug!("Dropped {} duplicate readings", duplicates);
    }

    Ok((readings, rows_read, rows_skipped))
}
