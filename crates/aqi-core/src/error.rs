use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the PM2.5 monitor.
#[derive(Error, Debug)]
pub enum AqiError {
    /// A date range whose start falls after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// An operation that needs at least one reading was given none.
    #[error("Series is empty")]
    EmptySeries,

    /// A concentration that is NaN or negative reached the classifier.
    #[error("Invalid PM2.5 concentration: {0}")]
    InvalidConcentration(f64),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote spreadsheet could not be downloaded.
    #[error("Failed to fetch data source: {0}")]
    SourceFetch(String),

    /// The spreadsheet export is not valid CSV.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(String),

    /// A required column is absent from the CSV header row.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// A locale token is not one of the supported locales.
    #[error("Unsupported locale: {0}")]
    InvalidLocale(String),

    /// The configured data path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No CSV exports were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, AqiError>;
