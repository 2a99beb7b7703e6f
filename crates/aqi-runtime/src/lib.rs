//! Runtime orchestration layer for the PM2.5 monitor.
//!
//! Owns the cached data source and the background refresh loop that feeds
//! dashboard snapshots to the terminal UI.

pub mod data_manager;
pub mod orchestrator;

pub use aqi_core as core;
pub use aqi_data as data;
