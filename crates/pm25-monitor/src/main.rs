mod bootstrap;

use anyhow::{Context, Result};
use aqi_core::error::AqiError;
use aqi_core::report::ReportCard;
use aqi_core::settings::Settings;
use aqi_core::time_utils::TimezoneHandler;
use aqi_data::source::DataSource;
use aqi_runtime::data_manager::DataManager;
use aqi_runtime::orchestrator::MonitoringOrchestrator;
use aqi_ui::app::{App, ViewMode, ViewRequest};
use chrono::NaiveDate;
use clap::{error::ErrorKind, CommandFactory};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = bootstrap::default_log_file(settings.log_file.clone(), &settings.view);
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("PM2.5 Monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Locale: {}, Theme: {}, Timezone: {}",
        settings.view,
        settings.locale,
        settings.theme,
        settings.timezone
    );

    let month = match settings.month() {
        Ok(month) => month,
        Err(e) => Settings::command()
            .error(ErrorKind::ValueValidation, e.to_string())
            .exit(),
    };

    if !TimezoneHandler::validate_timezone(&settings.timezone) {
        Settings::command()
            .error(
                ErrorKind::ValueValidation,
                format!(
                    "unknown timezone '{}'; expected an IANA name such as Asia/Bangkok",
                    settings.timezone
                ),
            )
            .exit();
    }

    let source = bootstrap::discover_default_source(settings.source.as_deref()).context(
        "No data source configured; pass --source <file|directory|url|sheet:id> or set PM25_MONITOR_SOURCE",
    )?;
    let source = DataSource::parse(&source)?;
    tracing::info!(%source, remote = source.is_remote(), "using data source");

    let locale = settings.locale();
    let tz = TimezoneHandler::new(&settings.timezone);
    let refresh_secs = u64::from(settings.refresh_rate);

    match settings.view.as_str() {
        "realtime" => {
            tracing::info!("Starting real-time monitoring...");

            let orchestrator = MonitoringOrchestrator::new(refresh_secs, source, tz);
            let (rx, handle) = orchestrator.start();

            let app = App::new(
                &settings.theme,
                ViewMode::Realtime,
                locale,
                settings.timezone.clone(),
            );

            tokio::select! {
                result = app.run_realtime(rx) => {
                    handle.abort();
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down monitoring task");
                    handle.abort();
                }
            }
        }

        "report" => {
            let snapshot = DataManager::new(source, tz, refresh_secs)?.fetch().await?;
            let latest = snapshot.latest.ok_or(AqiError::EmptySeries)?;
            let card = ReportCard::for_reading(&latest, locale)?;
            println!("{}", card.to_json()?);
        }

        view => {
            let Some(view_mode) = ViewMode::from_name(view) else {
                anyhow::bail!("Unknown view mode: {view}");
            };
            tracing::info!("Running {} view...", view);

            let snapshot = DataManager::new(source, tz, refresh_secs)?.fetch().await?;
            tracing::info!(
                readings = snapshot.series.len(),
                skipped = snapshot.rows_skipped,
                "data loaded"
            );

            let today: NaiveDate = tz.now_local().date();
            let request = ViewRequest::resolve(today, settings.year, month, settings.start, settings.end);

            let app = App::new(&settings.theme, view_mode, locale, settings.timezone.clone());
            app.run_static(snapshot, request).await?;
        }
    }

    Ok(())
}
