//! ## Summary
//! Consistency checks for a [`RecurrenceSpec`].
//!
//! Each check reports the offending field. The frequency itself is checked
//! when a flat record is converted, since [`Pattern`](crate::recur::Pattern)
//! cannot hold an unknown one.

use crate::error::ValidationError;
use crate::recur::core::{RecurrenceSpec, parse_time_of_day};
use crate::recur::expand::resolve_timezone;

/// Largest accepted `interval`.
pub const MAX_INTERVAL: u32 = 999;

/// Largest accepted `count`.
pub const MAX_COUNT: u32 = 1000;

/// ## Summary
/// Checks a specification and returns the first problem found.
///
/// Pure; validating the same specification twice gives the same result.
///
/// ## Errors
/// Returns a [`ValidationError`] naming the field when:
/// - `interval` is outside 1..=999
/// - a `days_of_month` value is outside 1..=31
/// - a `months_of_year` value is outside 1..=12
/// - `time_of_day` is not `HH:MM`
/// - `timezone` does not resolve
/// - `end_date` precedes `start_date`
/// - `count` is outside 1..=1000
pub fn validate(spec: &RecurrenceSpec) -> Result<(), ValidationError> {
    if !(1..=MAX_INTERVAL).contains(&spec.interval) {
        return Err(ValidationError::new(
            "interval",
            "interval must be between 1 and 999",
        ));
    }

    if spec
        .pattern
        .days_of_month()
        .iter()
        .any(|day| !(1..=31).contains(day))
    {
        return Err(ValidationError::new(
            "days_of_month",
            "day of month must be between 1 and 31",
        ));
    }

    if spec
        .pattern
        .months_of_year()
        .iter()
        .any(|month| !(1..=12).contains(month))
    {
        return Err(ValidationError::new(
            "months_of_year",
            "month must be between 1 and 12",
        ));
    }

    parse_time_of_day(&spec.time_of_day)?;

    resolve_timezone(&spec.timezone)
        .map_err(|_err| ValidationError::new("timezone", "invalid timezone"))?;

    if let Some(end) = spec.end_date
        && end < spec.start_date
    {
        return Err(ValidationError::new(
            "end_date",
            "end date must be after start date",
        ));
    }

    if let Some(count) = spec.count
        && !(1..=MAX_COUNT).contains(&count)
    {
        return Err(ValidationError::new(
            "count",
            "count must be between 1 and 1000",
        ));
    }

    Ok(())
}
