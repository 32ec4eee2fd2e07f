//! Date/time utilities for Filedock.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Convert a stored timestamp (UTC) to an RFC3339 string for API responses.
///
/// Accepts both RFC3339 input and the SQLite `datetime('now')` format
/// (`YYYY-MM-DD HH:MM:SS`). Returns the original string if parsing fails.
pub fn to_rfc3339(datetime_str: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return dt.with_timezone(&Utc).to_rfc3339();
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc().to_rfc3339();
    }

    datetime_str.to_string()
}

/// Parse a stored timestamp (UTC) into a `DateTime<Utc>`.
///
/// Returns the current time if the input cannot be parsed; stored
/// timestamps are always written by the database, so this only happens for
/// hand-edited data.
pub fn parse_stored(datetime_str: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return dt.with_timezone(&Utc);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }

    Utc::now()
}
