//! Lenient field extraction for feed payloads
//!
//! The upstream schema is observed, not contractually guaranteed: numeric
//! values arrive as strings, fields appear and disappear between payload
//! shapes, and timestamps carry seven-digit fractional seconds. These helpers
//! treat absent or malformed values as defaults so a single odd field never
//! fails a whole decode.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::time::Duration;

/// Extract a float from a JSON value that may be a number or a numeric string
/// (e.g. `"28.5"`). Returns `0.0` for anything else.
pub fn lenient_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Extract an unsigned integer from a number or numeric string. Returns `0`
/// for anything else.
pub fn lenient_u32(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().map(|v| v as u32).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Extract a string, stringifying bare numbers. Returns `""` for anything else.
pub fn lenient_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Extract a boolean, accepting the string forms `"true"`, `"1"` and `"yes"`
/// the feed uses interchangeably with real booleans.
pub fn lenient_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
        }
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Parse an ISO-8601 timestamp such as `2025-10-03T15:37:14.4783763Z`.
/// Some fields (race control messages, the session schedule) arrive without
/// an offset; those are taken as UTC. Returns `None` on missing or invalid
/// input.
pub fn parse_utc(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Parse a `HH:MM:SS` duration string (the session clock format). Returns
/// `Duration::ZERO` on invalid or missing input.
pub fn parse_hms(value: Option<&Value>) -> Duration {
    let Some(raw) = value.and_then(Value::as_str) else {
        return Duration::ZERO;
    };
    let mut parts = raw.split(':');
    let (Some(h), Some(m), Some(s)) = (parts.next(), parts.next(), parts.next()) else {
        return Duration::ZERO;
    };
    if parts.next().is_some() {
        return Duration::ZERO;
    }
    match (h.parse::<u64>(), m.parse::<u64>(), s.parse::<u64>()) {
        (Ok(h), Ok(m), Ok(s)) => Duration::from_secs(h * 3600 + m * 60 + s),
        _ => Duration::ZERO,
    }
}
