//! Mission log timestamp parsing.

use chrono::NaiveDateTime;

/// 12-hour clock format, e.g. `2024-01-01 02:00:00 PM`.
const TWELVE_HOUR: &str = "%Y-%m-%d %I:%M:%S %p";
/// 24-hour clock format, e.g. `2024-01-01 14:00:00`.
const TWENTY_FOUR_HOUR: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a mission log timestamp.
///
/// Accepts `YYYY-MM-DD hh:mm:ss AM/PM` and `YYYY-MM-DD HH:MM:SS`; for the
/// latter, fractional seconds are truncated first. Returns `None` for
/// anything else so callers can skip the record.
#[must_use]
pub fn parse_log_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, TWELVE_HOUR) {
        return Some(parsed);
    }
    let whole_seconds = raw.split('.').next().unwrap_or(raw);
    NaiveDateTime::parse_from_str(whole_seconds, TWENTY_FOUR_HOUR).ok()
}
