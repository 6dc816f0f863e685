//! Recurrence-rule occurrence engine.
//!
//! Computes the next or a bounded set of calendar occurrences for a
//! [`RecurrenceSpec`](recur::core::RecurrenceSpec): hourly, daily, weekly,
//! monthly and yearly patterns with interval alignment, exceptions,
//! inclusions and end/count bounds, evaluated in the specification's civil
//! timezone.

pub mod error;
pub mod recur;
