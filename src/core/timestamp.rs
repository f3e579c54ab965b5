//! Conversions for nanosecond event timestamps.
//!
//! Event timestamps are signed 64-bit nanoseconds since the Unix epoch. These
//! helpers map them to and from calendar values and render them in a fixed
//! layout for diagnostics.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Layout used when rendering timestamps, e.g.
/// `2024-03-01T12:30:45.000000123+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f%z";

/// Current wall-clock time as nanoseconds since the epoch.
///
/// Saturates at `i64::MAX` past the year 2262.
pub fn now() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Convert a nanosecond timestamp into a UTC calendar value.
pub fn to_datetime(timestamp: i64) -> DateTime<Utc> {
    Utc.timestamp_nanos(timestamp)
}

/// Convert a calendar value back into nanoseconds since the epoch.
///
/// Returns `None` when the value does not fit in an `i64` nanosecond count
/// (roughly before 1677 or after 2262).
pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Option<i64> {
    datetime.timestamp_nanos_opt()
}

/// Render a timestamp in UTC using [`TIMESTAMP_FORMAT`].
pub fn to_string(timestamp: i64) -> String {
    to_datetime(timestamp).format(TIMESTAMP_FORMAT).to_string()
}

/// Render a timestamp at the given UTC offset using [`TIMESTAMP_FORMAT`].
pub fn to_string_in(timestamp: i64, offset: &FixedOffset) -> String {
    offset
        .timestamp_nanos(timestamp)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
