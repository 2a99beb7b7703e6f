use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use aqi_core::settings::APP_DIR_NAME;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_NAME: &str = "pm25-monitor.log";

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.pm25-monitor/` and its `logs/` and `cache/` subdirectories exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&home_dir())
}

pub fn ensure_directories_in(home: &Path) -> anyhow::Result<()> {
    let app_dir = home.join(APP_DIR_NAME);
    std::fs::create_dir_all(app_dir.join("logs"))?;
    std::fs::create_dir_all(app_dir.join("cache"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Where log output should go for a run.
///
/// An explicit `--log-file` always wins. Terminal views otherwise log to
/// `~/.pm25-monitor/logs/pm25-monitor.log` so output never lands on the
/// dashboard; the `report` view keeps stderr since it prints to stdout.
pub fn resolve_log_file(explicit: Option<PathBuf>, view: &str, home: &Path) -> Option<PathBuf> {
    explicit.or_else(|| {
        (view != "report").then(|| home.join(APP_DIR_NAME).join("logs").join(LOG_FILE_NAME))
    })
}

/// Default log file resolution against the user's home directory.
pub fn default_log_file(explicit: Option<PathBuf>, view: &str) -> Option<PathBuf> {
    resolve_log_file(explicit, view, &home_dir())
}

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set. With a log file
/// the output is appended there without ANSI colours; otherwise it goes to
/// stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_directive(log_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

// ── Source discovery ───────────────────────────────────────────────────────────

/// Pick the data source for this run.
///
/// An explicit `--source` (or `PM25_MONITOR_SOURCE`) is used as-is.
/// Otherwise the first existing directory among `~/.pm25-monitor/data/` and
/// `./data/` is used. Returns `None` when nothing is configured or found.
pub fn discover_source(explicit: Option<&str>, home: &Path, cwd: &Path) -> Option<String> {
    if let Some(source) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return Some(source.to_string());
    }
    let candidates = [home.join(APP_DIR_NAME).join("data"), cwd.join("data")];
    candidates
        .into_iter()
        .find(|p| p.is_dir())
        .map(|p| p.to_string_lossy().into_owned())
}

/// [`discover_source`] against the user's home and current directory.
pub fn discover_default_source(explicit: Option<&str>) -> Option<String> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover_source(explicit, &home_dir(), &cwd)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
