//! Windows file-time conversion
//!
//! A file-time counts 100ns ticks since 1601-01-01 00:00:00 UTC.

use chrono::{DateTime, Utc};

/// Ticks per second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Seconds between 1601-01-01 and 1970-01-01
pub const UNIX_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// Convert a file-time to a UTC timestamp, exact to the tick.
///
/// Returns `None` for negative values, which the OS never writes.
pub fn filetime_to_datetime(filetime: i64) -> Option<DateTime<Utc>> {
    if filetime < 0 {
        return None;
    }

    let secs = filetime / TICKS_PER_SECOND - UNIX_EPOCH_OFFSET_SECS;
    let nanos = (filetime % TICKS_PER_SECOND) as u32 * 100;
    DateTime::from_timestamp(secs, nanos)
}

/// Convert a UTC timestamp to a file-time. Sub-tick precision is truncated.
pub fn datetime_to_filetime(timestamp: DateTime<Utc>) -> Option<i64> {
    let secs = timestamp.timestamp().checked_add(UNIX_EPOCH_OFFSET_SECS)?;
    if secs < 0 {
        return None;
    }

    let ticks = i64::from(timestamp.timestamp_subsec_nanos() / 100);
    secs.checked_mul(TICKS_PER_SECOND)?.checked_add(ticks)
}
