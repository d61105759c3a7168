//! Timestamp display normalization.
//!
//! Feed timestamps arrive as RFC 3339 strings (usually with a trailing `Z`),
//! but the snapshot generator makes no hard guarantees. Parse failures
//! degrade to passing the original string through, never to an error.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Shown when an item or the snapshot has no usable timestamp.
pub const TIME_PLACEHOLDER: &str = "--:--";

const BEIJING_UTC_OFFSET_SECS: i32 = 8 * 3600;

// Offset-less inputs the generator has been seen emitting. These are taken
// as Beijing wall time already.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Render a timestamp as `MM-DD HH:MM` Beijing time (UTC+8).
///
/// Missing or empty input yields [`TIME_PLACEHOLDER`]; unparseable input is
/// returned unchanged.
pub fn beijing_time(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|s| !s.is_empty()) else {
        return TIME_PLACEHOLDER.to_string();
    };

    let tz = FixedOffset::east_opt(BEIJING_UTC_OFFSET_SECS).expect("valid fixed offset");

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&tz).format("%m-%d %H:%M").to_string();
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return naive.format("%m-%d %H:%M").to_string();
        }
    }

    raw.to_string()
}
