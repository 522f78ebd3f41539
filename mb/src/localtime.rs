//! Wall-clock conversion for roster time zone offsets
//!
//! Offsets are plain hour counts relative to UTC (fractional values
//! like 5.5 are valid) rather than named time zones, so conversion is
//! simple minute arithmetic with no DST rules.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Shift a UTC instant into a participant's local wall clock
pub fn shift(utc: DateTime<Utc>, offset_hours: f64) -> NaiveDateTime {
    let minutes = (offset_hours * 60.0).round() as i64;
    utc.naive_utc() + Duration::minutes(minutes)
}

/// Current local wall-clock time for the given offset
pub fn local_now(offset_hours: f64) -> NaiveDateTime {
    shift(Utc::now(), offset_hours)
}

/// Current local calendar date for the given offset
pub fn local_today(offset_hours: f64) -> NaiveDate {
    local_now(offset_hours).date()
}
