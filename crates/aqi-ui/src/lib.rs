//! Terminal UI layer for the PM2.5 monitor.
//!
//! Provides themes, the concentration gauge, header and tier indicators, the
//! realtime dashboard, history tables, the date-range, calendar and
//! health-impact views, and the application event loop built on top of
//! [`ratatui`].

pub mod advice;
pub mod app;
pub mod calendar_view;
pub mod components;
pub mod impact_view;
pub mod range_view;
pub mod realtime_view;
pub mod table_view;
pub mod themes;

pub use aqi_core as core;
