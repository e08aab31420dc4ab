//! Third-party types that appear in this crate's public API, re-exported so
//! callers can name them without depending on `chrono` or `serde_json`.

/// Date types for stats windows and day-bounded match filters.
pub use chrono::{NaiveDate, Utc};
/// Untyped JSON payload returned by every query.
pub use serde_json::Value;
