//! Timestamp handling for flight schedules.
//!
//! Schedules use naive local timestamps (no time zone), stored and exchanged
//! as `YYYY-MM-DD HH:MM:SS`. Calendar days are half-open windows
//! `[00:00, next 00:00)`.

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Storage format for timestamps. Sorts lexicographically in time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format for calendar dates in requests.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error returned when parsing an invalid timestamp or date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD HH:MM`.
///
/// # Examples
///
/// ```
/// use flight_server::domain::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-01 08:30:00").is_ok());
/// assert!(parse_timestamp("2024-01-01T08:30:00").is_ok());
/// assert!(parse_timestamp("2024-01-01 08:30").is_ok());
/// assert!(parse_timestamp("08:30").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimeError> {
    let s = s.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| TimeError::new("expected YYYY-MM-DD HH:MM[:SS]"))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| TimeError::new("expected YYYY-MM-DD"))
}

/// Format a timestamp in storage format.
pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// Midnight at the start of `date`.
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The half-open window `[start, end)` covering `date`.
///
/// The end saturates at `NaiveDateTime::MAX` for the last representable day.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day_start(date);
    let end = date
        .checked_add_days(Days::new(1))
        .map(day_start)
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// Human-readable duration, e.g. `2h 05m` or `1d 3h 00m`.
pub fn format_duration(d: Duration) -> String {
    let sign = if d < Duration::zero() { "-" } else { "" };
    let total_mins = d.num_minutes().abs();
    let days = total_mins / (24 * 60);
    let hours = (total_mins / 60) % 24;
    let mins = total_mins % 60;

    if days > 0 {
        format!("{sign}{days}d {hours}h {mins:02}m")
    } else {
        format!("{sign}{hours}h {mins:02}m")
    }
}
