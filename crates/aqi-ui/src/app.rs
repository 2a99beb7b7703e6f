//! Application state and TUI event loops for the PM2.5 monitor.
//!
//! [`App`] owns the theme, view mode, locale and the last dashboard update
//! received from the runtime. It drives the realtime loop and the static
//! history views.

use std::io;
use std::time::Duration;

use aqi_core::formatting::display_year;
use aqi_core::locale::{self, Locale, TextKey};
use aqi_data::aggregator::SeriesAggregator;
use aqi_data::analysis::DashboardSnapshot;
use aqi_runtime::orchestrator::DashboardData;
use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use crate::calendar_view;
use crate::impact_view::{self, ImpactViewData};
use crate::range_view::{self, RangeOutcome};
use crate::realtime_view::{self, RealtimeViewData};
use crate::table_view::{self, TableRowData, TableSummary};
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Live dashboard refreshed by the orchestrator.
    Realtime,
    /// Daily means of one month.
    Daily,
    /// Monthly means of one year.
    Monthly,
    Calendar,
    /// Statistics over a date range.
    Range,
    /// Unhealthy days and cigarette equivalent of one year.
    Impact,
}

impl ViewMode {
    /// Parse a `--view` name; `None` for names the TUI does not render.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "realtime" => Some(Self::Realtime),
            "daily" => Some(Self::Daily),
            "monthly" => Some(Self::Monthly),
            "calendar" => Some(Self::Calendar),
            "range" => Some(Self::Range),
            "impact" => Some(Self::Impact),
            _ => None,
        }
    }
}

/// Parameters for the static views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRequest {
    /// Year of the monthly table and health-impact panel.
    pub year: i32,
    /// `(year, month)` of the daily table and calendar.
    pub month: (i32, u32),
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ViewRequest {
    /// Fill unset parameters relative to `today`: the current year and
    /// month, and a range covering the last seven days.
    pub fn resolve(
        today: NaiveDate,
        year: Option<i32>,
        month: Option<(i32, u32)>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        let end = end.unwrap_or(today);
        let start = start.unwrap_or_else(|| end - chrono::Duration::days(6));
        Self {
            year: year.unwrap_or(today.year()),
            month: month.unwrap_or((today.year(), today.month())),
            start,
            end,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the PM2.5 monitor TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub locale: Locale,
    /// Timezone name shown in the header.
    pub timezone: String,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Most recent dashboard update, `None` until the first one arrives.
    pub last_data: Option<DashboardData>,
}

impl App {
    pub fn new(theme_name: &str, view_mode: ViewMode, locale: Locale, timezone: String) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            locale,
            timezone,
            should_quit: false,
            last_data: None,
        }
    }

    // ── Public event loops ────────────────────────────────────────────────────

    /// Run the realtime dashboard, receiving updates from `rx`.
    ///
    /// Key events are polled with a 250 ms timeout and pending updates are
    /// drained with `try_recv` between frames. Exits on `q`, `Q` or `Ctrl+C`,
    /// or when the sender goes away.
    pub async fn run_realtime(mut self, mut rx: mpsc::Receiver<DashboardData>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match poll_quit(tick_rate) {
                Ok(true) => break Ok(()),
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            loop {
                match rx.try_recv() {
                    Ok(data) => self.update_from_dashboard(data),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Run one of the static views over `snapshot`, then wait for `q` / `Ctrl+C`.
    pub async fn run_static(self, snapshot: DashboardSnapshot, request: ViewRequest) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render_static(frame, &snapshot, &request)) {
                break Err(e);
            }
            match poll_quit(tick_rate) {
                Ok(true) => break Ok(()),
                Ok(false) => {}
                Err(e) => break Err(e),
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the realtime dashboard from the last update.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        realtime_view::render_realtime_view(frame, area, &self.realtime_data(), &self.theme);
    }

    /// Render the static view selected by `view_mode`.
    pub fn render_static(&self, frame: &mut Frame, snapshot: &DashboardSnapshot, request: &ViewRequest) {
        let area = frame.area();
        let locale = self.locale;
        let theme = &self.theme;

        match self.view_mode {
            ViewMode::Realtime => self.render(frame),
            ViewMode::Daily => {
                let (year, month) = request.month;
                let title = format!(
                    "{}: {} {}",
                    locale::text(locale, TextKey::DailyHistory),
                    locale::month_name(locale, month),
                    display_year(year, locale)
                );
                let rows: Vec<TableRowData> = snapshot
                    .daily
                    .iter()
                    .filter(|d| d.date.year() == year && d.date.month() == month)
                    .map(|d| TableRowData::from_daily(d, locale))
                    .collect();
                render_rows(frame, &title, &rows, locale, theme);
            }
            ViewMode::Monthly => {
                let title = format!(
                    "{}: {}",
                    locale::text(locale, TextKey::MonthlyHistory),
                    display_year(request.year, locale)
                );
                let rows: Vec<TableRowData> = snapshot
                    .monthly
                    .iter()
                    .filter(|m| m.year == request.year)
                    .map(|m| TableRowData::from_monthly(m, locale))
                    .collect();
                render_rows(frame, &title, &rows, locale, theme);
            }
            ViewMode::Calendar => {
                let (year, month) = request.month;
                match SeriesAggregator::calendar_month(&snapshot.daily, year, month) {
                    Ok(cal) => calendar_view::render_calendar_view(frame, area, &cal, locale, theme),
                    Err(e) => table_view::render_message(
                        frame,
                        area,
                        locale::text(locale, TextKey::Calendar),
                        &e.to_string(),
                        locale,
                        theme,
                    ),
                }
            }
            ViewMode::Range => {
                match RangeOutcome::compute(&snapshot.series, request.start, request.end) {
                    Ok(outcome) => range_view::render_range_view(frame, area, &outcome, locale, theme),
                    Err(e) => table_view::render_message(
                        frame,
                        area,
                        locale::text(locale, TextKey::DateRange),
                        &e.to_string(),
                        locale,
                        theme,
                    ),
                }
            }
            ViewMode::Impact => {
                let data = ImpactViewData {
                    summary: SeriesAggregator::health_impact(&snapshot.daily, request.year),
                    unhealthy_days: SeriesAggregator::unhealthy_days(&snapshot.daily, request.year),
                };
                impact_view::render_impact_view(frame, area, &data, locale, theme);
            }
        }
    }

    // ── State ─────────────────────────────────────────────────────────────────

    /// Store an update from the orchestrator.
    pub fn update_from_dashboard(&mut self, data: DashboardData) {
        if let Some(err) = &data.last_error {
            tracing::debug!(error = %err, stale = data.is_stale(), "dashboard update carries an error");
        }
        self.last_data = Some(data);
    }

    /// Realtime view data derived from the last update.
    pub fn realtime_data(&self) -> RealtimeViewData {
        let snapshot = self.last_data.as_ref().and_then(|d| d.snapshot.as_ref());
        RealtimeViewData {
            locale: self.locale,
            timezone: self.timezone.clone(),
            latest: snapshot.and_then(|s| s.latest),
            today: snapshot.and_then(|s| s.today),
            error: self.last_data.as_ref().and_then(|d| d.last_error.clone()),
        }
    }
}

fn render_rows(frame: &mut Frame, title: &str, rows: &[TableRowData], locale: Locale, theme: &Theme) {
    let area = frame.area();
    match TableSummary::from_rows(rows) {
        Some(summary) => {
            table_view::render_table_view(frame, area, title, rows, &summary, locale, theme)
        }
        None => table_view::render_no_data(frame, area, title, locale, theme),
    }
}

/// Poll for a key event; `true` when the user asked to quit.
fn poll_quit(timeout: Duration) -> io::Result<bool> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            return Ok(match key.code {
                KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
                KeyCode::Char('q') | KeyCode::Char('Q') => true,
                _ => false,
            });
        }
    }
    Ok(false)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
