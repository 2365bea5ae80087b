//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// ISO-8601 UTC text with millisecond precision, e.g. `2026-10-18T09:30:00.123Z`
pub fn to_iso8601(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Submission timestamp for a response being stored now
pub fn submission_timestamp() -> String {
    to_iso8601(now())
}
