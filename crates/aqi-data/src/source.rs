//! Where readings come from: a local CSV path or a published sheet URL.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use aqi_core::error::{AqiError, Result};
use aqi_core::time_utils::TimezoneHandler;
use reqwest::Client;
use tracing::{debug, info};

use crate::reader::{load_series_from_path, parse_csv, LoadedSeries};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A configured data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A CSV file, or a directory scanned recursively for CSV files.
    Path(PathBuf),
    /// An `http(s)` URL serving a CSV export.
    Url(String),
}

impl DataSource {
    /// Interpret a `--source` value.
    ///
    /// `sheet:<id>` names a published spreadsheet, `http(s)://` is fetched as
    /// is, and anything else is a local path.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AqiError::Config("data source is empty".to_string()));
        }
        if let Some(sheet_id) = raw.strip_prefix("sheet:") {
            if sheet_id.trim().is_empty() {
                return Err(AqiError::Config("sheet id is empty".to_string()));
            }
            return Ok(Self::google_sheet(sheet_id));
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Url(raw.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(raw)))
        }
    }

    /// CSV export URL for a published spreadsheet id.
    pub fn google_sheet(sheet_id: &str) -> Self {
        Self::Url(format!(
            "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
            sheet_id.trim()
        ))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    /// Fetch and parse the source.
    ///
    /// Local reads run on the blocking pool so the refresh loop never stalls
    /// the UI task.
    pub async fn load(&self, client: &Client, tz: TimezoneHandler) -> Result<LoadedSeries> {
        match self {
            Self::Path(path) => {
                let path = path.clone();
                tokio::task::spawn_blocking(move || load_series_from_path(&path, &tz))
                    .await
                    .map_err(|e| AqiError::Other(e.into()))?
            }
            Self::Url(url) => {
                debug!("Fetching {}", url);
                let response = client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| AqiError::SourceFetch(e.to_string()))?;
                let body = response
                    .text()
                    .await
                    .map_err(|e| AqiError::SourceFetch(e.to_string()))?;
                let loaded = parse_csv(&body, &tz)?;
                info!(
                    "Fetched {} readings ({} bytes) from {}",
                    loaded.series.len(),
                    body.len(),
                    url
                );
                Ok(loaded)
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => f.write_str(u),
        }
    }
}

/// HTTP client shared by every remote fetch.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| AqiError::SourceFetch(e.to_string()))
}
