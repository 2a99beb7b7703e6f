use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AqiError, Result};
use crate::locale::Locale;

/// Directory under the home directory that holds config, logs and cache.
pub const APP_DIR_NAME: &str = ".pm25-monitor";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// PM2.5 air-quality dashboard for the terminal
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pm25-monitor",
    about = "PM2.5 air-quality dashboard for the terminal",
    version
)]
pub struct Settings {
    /// Spreadsheet CSV export: a file, a directory of exports, an http(s) URL, or sheet:<id>
    #[arg(long, env = "PM25_MONITOR_SOURCE")]
    pub source: Option<String>,

    /// View mode
    #[arg(long, default_value = "realtime", value_parser = ["realtime", "daily", "monthly", "calendar", "range", "impact", "report"])]
    pub view: String,

    /// Display language
    #[arg(long, default_value = "th", value_parser = ["th", "en"])]
    pub locale: String,

    /// Timezone used to localise offset timestamps (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Refresh rate in seconds; also the maximum age of cached data (10-3600)
    #[arg(long, default_value = "600", value_parser = clap::value_parser!(u32).range(10..=3600))]
    pub refresh_rate: u32,

    /// Year for the monthly and health-impact views (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month for the daily and calendar views, as YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub month: Option<String>,

    /// First day of the range view (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the range view (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.pm25-monitor/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_rate: Option<u32>,
}

impl LastUsedParams {
    /// Default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    ///
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, resolve `"auto"` values, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit args and
    /// config path.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "could not clear saved configuration");
            }
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. Range / year / month are per-run and never persisted.
        if settings.source.is_none() {
            settings.source = last.source;
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "locale") {
            if let Some(v) = last.locale {
                settings.locale = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "refresh_rate") {
            if let Some(v) = last.refresh_rate {
                settings.refresh_rate = v;
            }
        }

        settings = Self::resolve_auto_values(settings);

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::warn!(error = %e, "could not persist last-used settings");
        }

        settings
    }

    /// Resolved display locale. Unknown persisted values fall back to Thai.
    pub fn locale(&self) -> Locale {
        self.locale.parse().unwrap_or_default()
    }

    /// Parsed `--month`, if given.
    pub fn month(&self) -> Result<Option<(i32, u32)>> {
        self.month.as_deref().map(parse_year_month).transpose()
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            source: s.source.clone(),
            view: Some(s.view.clone()),
            locale: Some(s.locale.clone()),
            theme: Some(s.theme.clone()),
            timezone: Some(s.timezone.clone()),
            refresh_rate: Some(s.refresh_rate),
        }
    }
}

/// Parse `"YYYY-MM"` into `(year, month)`.
pub fn parse_year_month(s: &str) -> Result<(i32, u32)> {
    let invalid = || AqiError::Config(format!("invalid month \"{}\", expected YYYY-MM", s));
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// `true` when `name` was supplied on the command line (not a default or env).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            source: Some("/data/pm25.csv".to_string()),
            view: Some("daily".to_string()),
            locale: Some("en".to_string()),
            theme: Some("dark".to_string()),
            timezone: Some("Asia/Bangkok".to_string()),
            refresh_rate: Some(300),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.source, Some("/data/pm25.csv".to_string()));
        assert_eq!(loaded.view, Some("daily".to_string()));
        assert_eq!(loaded.locale, Some("en".to_string()));
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.timezone, Some("Asia/Bangkok".to_string()));
        assert_eq!(loaded.refresh_rate, Some(300));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).view.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(LastUsedParams::load_from(&path).theme.is_none());
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["pm25-monitor"]);
        assert_eq!(settings.view, "realtime");
        assert_eq!(settings.locale, "th");
        assert_eq!(settings.timezone, "auto");
        assert_eq!(settings.refresh_rate, 600);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.year.is_none());
        assert!(settings.start.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
        assert_eq!(settings.locale(), Locale::Th);
    }

    #[test]
    fn test_settings_cli_range_dates() {
        let settings = Settings::parse_from([
            "pm25-monitor",
            "--view",
            "range",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
        ]);
        assert_eq!(settings.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(settings.end, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn test_settings_refresh_rate_out_of_range_is_rejected() {
        let result = Settings::try_parse_from(["pm25-monitor", "--refresh-rate", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_month_parsing() {
        let settings = Settings::parse_from(["pm25-monitor", "--month", "2024-02"]);
        assert_eq!(settings.month().unwrap(), Some((2024, 2)));

        let bad = Settings::parse_from(["pm25-monitor", "--month", "2024-13"]);
        assert!(matches!(bad.month(), Err(AqiError::Config(_))));
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_year_month("2023-11").unwrap(), (2023, 11));
        assert!(parse_year_month("2023/11").is_err());
        assert!(parse_year_month("2023-0").is_err());
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            source: Some("/data/export.csv".to_string()),
            locale: Some("en".to_string()),
            theme: Some("dark".to_string()),
            timezone: Some("UTC".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["pm25-monitor".into()], &config_path);
        assert_eq!(settings.source.as_deref(), Some("/data/export.csv"));
        assert_eq!(settings.locale(), Locale::En);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.timezone, "UTC");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            locale: Some("en".to_string()),
            timezone: Some("UTC".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["pm25-monitor".into(), "--locale".into(), "th".into()],
            &config_path,
        );
        assert_eq!(settings.locale(), Locale::Th);
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        Settings::load_with_last_used_impl(
            vec!["pm25-monitor".into(), "--clear".into()],
            &config_path,
        );
        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        let settings = Settings::load_with_last_used_impl(
            vec![
                "pm25-monitor".into(),
                "--debug".into(),
                "--timezone".into(),
                "UTC".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        Settings::load_with_last_used_impl(
            vec![
                "pm25-monitor".into(),
                "--theme".into(),
                "classic".into(),
                "--timezone".into(),
                "UTC".into(),
            ],
            &config_path,
        );
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.theme, Some("classic".to_string()));
        assert_eq!(loaded.timezone, Some("UTC".to_string()));
    }
}
