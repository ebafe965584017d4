//! Time and timestamp helpers.

use chrono::{DateTime, Local, TimeDelta, Timelike, Utc};

/// UTC timestamp used for status and energy events.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Shift `at` back by a whole number of hours.
///
/// Returns `None` when the result falls outside the representable range.
#[must_use]
pub fn hours_before(at: Timestamp, hours: u32) -> Option<Timestamp> {
    at.checked_sub_signed(TimeDelta::try_hours(i64::from(hours))?)
}

/// Hour of day (0–23) of `at` on the local wall clock.
///
/// Usage peaks follow the household's clock, not UTC.
#[must_use]
pub fn local_hour(at: Timestamp) -> u32 {
    at.with_timezone(&Local).hour()
}
