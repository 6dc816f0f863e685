//! Recurrence specification value type.

use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use super::{DayAnchor, WeekOfMonth, Weekday};
use crate::error::{RecurResult, ValidationError};
use crate::recur::expand::resolve_timezone;

/// Time-of-day text format (24-hour `HH:MM`).
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => return None,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a monthly pattern picks its day(s) within each month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthlySelector {
    /// Explicit days of the month (1-31). Days past a month's end are skipped.
    DaysOfMonth(Vec<u8>),
    /// The Kth (or last) given weekday of the month.
    NthWeekday { week: WeekOfMonth, weekday: Weekday },
    /// A day counted back from the end of the month.
    Anchor(DayAnchor),
    /// The start date's day of the month.
    StartDay,
}

/// Frequency together with the selectors that frequency understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Every N hours on hour boundaries; `time_of_day` is not applied.
    Hourly,
    Daily,
    /// Empty `days_of_week` means the start date's weekday.
    Weekly { days_of_week: Vec<Weekday> },
    Monthly(MonthlySelector),
    /// Empty lists mean the start date's month and day respectively.
    Yearly {
        months_of_year: Vec<u8>,
        days_of_month: Vec<u8>,
    },
}

impl Pattern {
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Hourly => Frequency::Hourly,
            Self::Daily => Frequency::Daily,
            Self::Weekly { .. } => Frequency::Weekly,
            Self::Monthly(_) => Frequency::Monthly,
            Self::Yearly { .. } => Frequency::Yearly,
        }
    }

    /// Days of the month named by the pattern, if any.
    #[must_use]
    pub fn days_of_month(&self) -> &[u8] {
        match self {
            Self::Monthly(MonthlySelector::DaysOfMonth(days))
            | Self::Yearly {
                days_of_month: days,
                ..
            } => days,
            _ => &[],
        }
    }

    /// Months of the year named by the pattern, if any.
    #[must_use]
    pub fn months_of_year(&self) -> &[u8] {
        match self {
            Self::Yearly { months_of_year, .. } => months_of_year,
            _ => &[],
        }
    }
}

/// ## Summary
/// Declarative description of a recurring event.
///
/// Instants are UTC; all calendar arithmetic happens in `timezone`, where
/// `time_of_day` is applied to every computed date. `start_date` anchors the
/// interval phase and supplies the default weekday/day/month; the sequence
/// begins strictly after it.
///
/// `end_date` is exclusive in practice: an occurrence at or after it ends
/// the sequence. `count` caps the occurrences produced by chaining
/// [`next_occurrence`](crate::recur::next_occurrence) from `start_date`.
///
/// `skip_holidays` is carried for forward compatibility. No holiday calendar
/// is consulted, so it has no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceSpec {
    pub pattern: Pattern,
    pub interval: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub count: Option<u32>,
    pub time_of_day: String,
    pub timezone: String,
    pub skip_weekends: bool,
    pub skip_holidays: bool,
    pub exceptions: Vec<DateTime<Utc>>,
    pub includes: Vec<DateTime<Utc>>,
}

impl RecurrenceSpec {
    /// Creates a specification with interval 1 and no bounds or filters.
    #[must_use]
    pub fn new(
        pattern: Pattern,
        start_date: DateTime<Utc>,
        time_of_day: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            pattern,
            interval: 1,
            start_date,
            end_date: None,
            count: None,
            time_of_day: time_of_day.into(),
            timezone: timezone.into(),
            skip_weekends: false,
            skip_holidays: false,
            exceptions: Vec::new(),
            includes: Vec::new(),
        }
    }

    /// Creates an hourly rule. `time_of_day` is validated but not applied.
    #[must_use]
    pub fn hourly(
        start_date: DateTime<Utc>,
        time_of_day: impl Into<String>,
        timezone: impl Into<String>,
        interval: u32,
    ) -> Self {
        Self::new(Pattern::Hourly, start_date, time_of_day, timezone).with_interval(interval)
    }

    /// Creates a daily rule.
    #[must_use]
    pub fn daily(
        start_date: DateTime<Utc>,
        time_of_day: impl Into<String>,
        timezone: impl Into<String>,
        interval: u32,
    ) -> Self {
        Self::new(Pattern::Daily, start_date, time_of_day, timezone).with_interval(interval)
    }

    /// Creates a weekly rule on the given weekdays.
    #[must_use]
    pub fn weekly(
        start_date: DateTime<Utc>,
        time_of_day: impl Into<String>,
        timezone: impl Into<String>,
        interval: u32,
        days_of_week: Vec<Weekday>,
    ) -> Self {
        Self::new(
            Pattern::Weekly { days_of_week },
            start_date,
            time_of_day,
            timezone,
        )
        .with_interval(interval)
    }

    /// Creates a monthly rule on explicit days of the month.
    #[must_use]
    pub fn monthly(
        start_date: DateTime<Utc>,
        time_of_day: impl Into<String>,
        timezone: impl Into<String>,
        interval: u32,
        days_of_month: Vec<u8>,
    ) -> Self {
        let selector = if days_of_month.is_empty() {
            MonthlySelector::StartDay
        } else {
            MonthlySelector::DaysOfMonth(days_of_month)
        };
        Self::new(Pattern::Monthly(selector), start_date, time_of_day, timezone)
            .with_interval(interval)
    }

    /// Creates a monthly rule on the Kth weekday, e.g. "first Monday".
    #[must_use]
    pub fn monthly_by_week(
        start_date: DateTime<Utc>,
        time_of_day: impl Into<String>,
        timezone: impl Into<String>,
        interval: u32,
        week: WeekOfMonth,
        weekday: Weekday,
    ) -> Self {
        Self::new(
            Pattern::Monthly(MonthlySelector::NthWeekday { week, weekday }),
            start_date,
            time_of_day,
            timezone,
        )
        .with_interval(interval)
    }

    /// Creates a yearly rule over the given months and days.
    #[must_use]
    pub fn yearly(
        start_date: DateTime<Utc>,
        time_of_day: impl Into<String>,
        timezone: impl Into<String>,
        interval: u32,
        months_of_year: Vec<u8>,
        days_of_month: Vec<u8>,
    ) -> Self {
        Self::new(
            Pattern::Yearly {
                months_of_year,
                days_of_month,
            },
            start_date,
            time_of_day,
            timezone,
        )
        .with_interval(interval)
    }

    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_skip_weekends(mut self, skip: bool) -> Self {
        self.skip_weekends = skip;
        self
    }

    #[must_use]
    pub fn with_skip_holidays(mut self, skip: bool) -> Self {
        self.skip_holidays = skip;
        self
    }

    #[must_use]
    pub fn with_exception(mut self, instant: DateTime<Utc>) -> Self {
        self.add_exception(instant);
        self
    }

    #[must_use]
    pub fn with_include(mut self, instant: DateTime<Utc>) -> Self {
        self.add_include(instant);
        self
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.pattern.frequency()
    }

    /// Suppresses an instant that would otherwise match the pattern.
    pub fn add_exception(&mut self, instant: DateTime<Utc>) {
        if !self.exceptions.contains(&instant) {
            self.exceptions.push(instant);
        }
    }

    /// Removes a previously added exception. Returns whether one was removed.
    pub fn remove_exception(&mut self, instant: DateTime<Utc>) -> bool {
        remove_instant(&mut self.exceptions, instant)
    }

    /// Forces an instant into enumerated results.
    pub fn add_include(&mut self, instant: DateTime<Utc>) {
        if !self.includes.contains(&instant) {
            self.includes.push(instant);
        }
    }

    /// Removes a previously added inclusion. Returns whether one was removed.
    pub fn remove_include(&mut self, instant: DateTime<Utc>) -> bool {
        remove_instant(&mut self.includes, instant)
    }

    /// ## Summary
    /// Checks the specification for internal consistency.
    ///
    /// ## Errors
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::recur::validation::validate(self)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// ## Summary
    /// Parses `time_of_day` as a 24-hour `HH:MM` wall-clock time.
    ///
    /// ## Errors
    /// Returns a `time_of_day` [`ValidationError`] if the text is malformed.
    pub fn parsed_time_of_day(&self) -> Result<NaiveTime, ValidationError> {
        parse_time_of_day(&self.time_of_day)
    }

    /// ## Summary
    /// Resolves `timezone` to a zone, accepting Windows zone names and
    /// client-prefixed identifiers.
    ///
    /// ## Errors
    /// Returns `RecurError::ConversionError` if the identifier is unknown.
    pub fn zone(&self) -> RecurResult<Tz> {
        Ok(resolve_timezone(&self.timezone)?)
    }
}

/// ## Summary
/// Parses a 24-hour `HH:MM` wall-clock time.
///
/// ## Errors
/// Returns a `time_of_day` [`ValidationError`] if the text is malformed.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(text.trim(), TIME_OF_DAY_FORMAT)
        .map_err(|_err| ValidationError::new("time_of_day", "time must be in HH:MM format"))
}

fn remove_instant(list: &mut Vec<DateTime<Utc>>, instant: DateTime<Utc>) -> bool {
    let before = list.len();
    list.retain(|existing| *existing != instant);
    list.len() != before
}
