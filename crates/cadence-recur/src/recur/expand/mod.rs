//! Occurrence computation: the per-frequency calculator, range enumeration,
//! and the calendar and timezone arithmetic they share.

mod calendar;
mod calculator;
mod enumerator;
mod timezone;

use chrono::{DateTime, Utc};

use crate::recur::core::RecurrenceSpec;

pub use calculator::{EngineLimits, OccurrenceCalculator};
pub use timezone::{ConversionError, convert_to_utc, convert_to_utc_lenient, resolve_timezone};

/// ## Summary
/// Earliest occurrence strictly after `after`, using default engine limits.
///
/// See [`OccurrenceCalculator::next_occurrence`].
#[must_use]
pub fn next_occurrence(spec: &RecurrenceSpec, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    OccurrenceCalculator::default().next_occurrence(spec, after)
}

/// ## Summary
/// Occurrences in `(start, end]`, at most `max_count` of them plus any
/// includes, using default engine limits.
///
/// See [`OccurrenceCalculator::occurrences_between`].
#[must_use]
pub fn occurrences_between(
    spec: &RecurrenceSpec,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_count: usize,
) -> Vec<DateTime<Utc>> {
    OccurrenceCalculator::default().occurrences_between(spec, start, end, max_count)
}
