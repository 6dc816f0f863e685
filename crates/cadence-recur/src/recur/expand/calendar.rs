//! Civil-calendar helpers: month lengths, month indices and weekday lookup.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

use crate::recur::core::WeekOfMonth;

/// Returns the number of days in a month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1))
        .map_or(31, |d| d.pred_opt().map_or(31, |p| p.day()))
}

/// Builds a date, or `None` if the day does not exist in that month.
pub fn date_in_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Shifts a date by a signed number of days.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Months since year 0, so month arithmetic is plain integer arithmetic.
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Inverse of [`month_index`]: `(year, month)` with month in 1..=12.
pub fn from_month_index(index: i64) -> Option<(i32, u32)> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    Some((year, month))
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    add_days(date, -i64::from(date.weekday().num_days_from_monday()))
}

/// ## Summary
/// Locates the Kth (or last) `weekday` of a month.
///
/// "first" is the first such weekday on or after the 1st; "second" through
/// "fourth" add whole weeks; "last" counts back from the month's final day.
/// A result that would roll into an adjacent month is discarded.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    week: WeekOfMonth,
    weekday: Weekday,
) -> Option<NaiveDate> {
    let candidate = if week == WeekOfMonth::Last {
        let last_day = date_in_month(year, month, days_in_month(year, month))?;
        let back = (7 + last_day.weekday().num_days_from_monday()
            - weekday.num_days_from_monday())
            % 7;
        add_days(last_day, -i64::from(back))?
    } else {
        let first_day = date_in_month(year, month, 1)?;
        let forward = (7 + weekday.num_days_from_monday()
            - first_day.weekday().num_days_from_monday())
            % 7;
        let weeks = match week {
            WeekOfMonth::First | WeekOfMonth::Last => 0,
            WeekOfMonth::Second => 1,
            WeekOfMonth::Third => 2,
            WeekOfMonth::Fourth => 3,
        };
        add_days(first_day, i64::from(forward + 7 * weeks))?
    };

    (candidate.month() == month && candidate.year() == year).then_some(candidate)
}

/// The month's last Monday through Friday.
pub fn last_weekday_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let mut date = date_in_month(year, month, days_in_month(year, month))?;
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date = date.pred_opt()?;
    }
    Some(date)
}
