//! Run identifiers and timestamps.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Returns the current UTC time as an RFC 3339 string with microseconds.
///
/// ```
/// use decisionflow::utils::iso_timestamp;
///
/// let ts = iso_timestamp();
/// assert!(ts.contains('T'));
/// assert!(ts.ends_with("+00:00"));
/// ```
#[must_use]
pub fn iso_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Formats a UTC time the way [`iso_timestamp`] does.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

/// Generates a fresh run identifier (UUID v4, hyphenated).
#[must_use]
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}
