//! Data ingestion layer for the PM2.5 monitor.
//!
//! Responsible for discovering and parsing spreadsheet CSV exports, fetching
//! them from a path or URL, aggregating readings and running the top-level
//! analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod source;

pub use aqi_core as core;
