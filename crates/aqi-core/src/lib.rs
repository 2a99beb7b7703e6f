//! Core types for the PM2.5 monitor.
//!
//! Holds the value types, the tier table and classifier, the typed locale
//! tables, settings, formatting and time helpers shared by every other crate.

pub mod error;
pub mod formatting;
pub mod locale;
pub mod models;
pub mod report;
pub mod settings;
pub mod tiers;
pub mod time_utils;

pub use error::{AqiError, Result};
pub use locale::Locale;
pub use models::{DailyAggregate, HealthImpactSummary, MonthlyAggregate, RangeStats, Reading, Series};
pub use tiers::{classify, Classification, Tier};
