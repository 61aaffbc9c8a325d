use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::record::Value;

/// Parses a date string into epoch milliseconds.
///
/// Accepts RFC 3339, ISO date-times without an offset (read as UTC), bare ISO
/// dates (UTC midnight) and RFC 2822.
pub fn parse_millis(s: &str) -> Option<i64> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc().timestamp_millis());
    }

    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Reads a record value as epoch milliseconds. Only timestamps and parseable
/// strings qualify.
pub fn value_millis(v: &Value) -> Option<i64> {
    match v {
        Value::Timestamp(ts) => Some(ts.timestamp_millis()),
        Value::String(s) => parse_millis(s),
        _ => None,
    }
}
