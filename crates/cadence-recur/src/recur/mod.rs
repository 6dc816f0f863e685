//! Recurrence specification, validation and expansion.

pub mod core;
pub mod expand;
pub mod validation;

pub use self::core::{
    DayAnchor, Frequency, MonthlySelector, Pattern, RecurrenceFields, RecurrenceSpec, WeekOfMonth,
    Weekday,
};
pub use expand::{EngineLimits, OccurrenceCalculator, next_occurrence, occurrences_between};
pub use validation::validate;
