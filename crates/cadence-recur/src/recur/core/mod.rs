//! Recurrence specification model.
//!
//! This module defines the value types callers build and hand to the engine:
//! - [`RecurrenceSpec`]: the immutable rule, with the frequency and its
//!   selectors carried together in [`Pattern`]
//! - [`RecurrenceFields`]: the flat record form accepted from collaborators
//! - weekday, week-of-month and day-anchor selectors

mod describe;
mod fields;
mod spec;
mod weekday;

pub use fields::RecurrenceFields;
pub use spec::{
    Frequency, MonthlySelector, Pattern, RecurrenceSpec, TIME_OF_DAY_FORMAT, parse_time_of_day,
};
pub use weekday::{DayAnchor, WeekOfMonth, Weekday};
