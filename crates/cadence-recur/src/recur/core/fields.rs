//! Flat input document for building a [`RecurrenceSpec`].
//!
//! Callers that persist or transmit rules as key/value records hand them to
//! the engine in this shape. Conversion resolves the frequency name, picks
//! the monthly selector and validates the result.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{DayAnchor, Frequency, MonthlySelector, Pattern, RecurrenceSpec, WeekOfMonth, Weekday};
use crate::error::{RecurError, RecurResult, ValidationError};

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Recurrence rule as a flat record of optional selectors.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceFields {
    pub frequency: String,
    #[serde(default)]
    pub interval: Option<i64>,
    #[serde(default)]
    pub days_of_week: Vec<Weekday>,
    #[serde(default)]
    pub days_of_month: Vec<i64>,
    #[serde(default)]
    pub months_of_year: Vec<i64>,
    #[serde(default)]
    pub week_of_month: Option<WeekOfMonth>,
    #[serde(default)]
    pub day_of_month: Option<DayAnchor>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub count: Option<i64>,
    pub time_of_day: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub skip_weekends: bool,
    #[serde(default)]
    pub skip_holidays: bool,
    #[serde(default)]
    pub exceptions: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub includes: Vec<DateTime<Utc>>,
}

fn narrow_list(values: &[i64], field: &'static str, reason: &'static str) -> Result<Vec<u8>, ValidationError> {
    values
        .iter()
        .map(|&value| u8::try_from(value).map_err(|_err| ValidationError::new(field, reason)))
        .collect()
}

/// Picks the monthly selector: explicit days, then week-of-month with its
/// weekday, then a day anchor, then the start day.
fn monthly_selector(fields: &RecurrenceFields, days_of_month: Vec<u8>) -> MonthlySelector {
    if !days_of_month.is_empty() {
        return MonthlySelector::DaysOfMonth(days_of_month);
    }
    if let Some(week) = fields.week_of_month
        && let Some(&weekday) = fields.days_of_week.first()
    {
        return MonthlySelector::NthWeekday { week, weekday };
    }
    match fields.day_of_month {
        Some(anchor) => MonthlySelector::Anchor(anchor),
        None => MonthlySelector::StartDay,
    }
}

impl TryFrom<RecurrenceFields> for RecurrenceSpec {
    type Error = ValidationError;

    fn try_from(fields: RecurrenceFields) -> Result<Self, Self::Error> {
        let frequency = Frequency::parse(&fields.frequency)
            .ok_or_else(|| ValidationError::new("frequency", "invalid frequency"))?;

        let interval = u32::try_from(fields.interval.unwrap_or(1))
            .map_err(|_err| ValidationError::new("interval", "interval must be between 1 and 999"))?;
        let count = fields
            .count
            .map(u32::try_from)
            .transpose()
            .map_err(|_err| ValidationError::new("count", "count must be between 1 and 1000"))?;
        let days_of_month = narrow_list(
            &fields.days_of_month,
            "days_of_month",
            "day of month must be between 1 and 31",
        )?;
        let months_of_year = narrow_list(
            &fields.months_of_year,
            "months_of_year",
            "month must be between 1 and 12",
        )?;

        let pattern = match frequency {
            Frequency::Hourly => Pattern::Hourly,
            Frequency::Daily => Pattern::Daily,
            Frequency::Weekly => Pattern::Weekly {
                days_of_week: fields.days_of_week.clone(),
            },
            Frequency::Monthly => Pattern::Monthly(monthly_selector(&fields, days_of_month)),
            Frequency::Yearly => Pattern::Yearly {
                months_of_year,
                days_of_month,
            },
        };

        let spec = Self {
            pattern,
            interval,
            start_date: fields.start_date,
            end_date: fields.end_date,
            count,
            time_of_day: fields.time_of_day,
            timezone: fields.timezone,
            skip_weekends: fields.skip_weekends,
            skip_holidays: fields.skip_holidays,
            exceptions: fields.exceptions,
            includes: fields.includes,
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl RecurrenceSpec {
    /// ## Summary
    /// Parses and validates a JSON-encoded [`RecurrenceFields`] document.
    ///
    /// ## Errors
    /// Returns `RecurError::ParseError` for malformed JSON and
    /// `RecurError::ValidationError` for an inconsistent rule.
    pub fn from_json(json: &str) -> RecurResult<Self> {
        let fields: RecurrenceFields =
            serde_json::from_str(json).map_err(|err| RecurError::ParseError(err.to_string()))?;
        Ok(Self::try_from(fields)?)
    }
}
