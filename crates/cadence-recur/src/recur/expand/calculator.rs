//! Occurrence calculator (next matching instant strictly after a reference).
//!
//! `start_date` is an inclusive lower bound: when it matches the pattern it
//! is the first occurrence.
//!
//! Each frequency has its own search, run in the specification's civil
//! timezone. Interval phase is always measured from `start_date`, so
//! repeated calls chained through their own results stay aligned.

use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

use cadence_core::config::{DEFAULT_MAX_SCAN_PERIODS, DEFAULT_MAX_SKIP_ITERATIONS, EngineConfig};

use super::calendar::{
    add_days, date_in_month, days_in_month, from_month_index, last_weekday_of_month, month_index,
    nth_weekday_of_month, week_start,
};
use super::timezone::convert_to_utc_lenient;
use crate::error::RecurResult;
use crate::recur::core::{
    DayAnchor, MonthlySelector, Pattern, RecurrenceSpec, WeekOfMonth, Weekday,
};

/// Iteration caps that keep every search finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    /// Retries allowed when candidates are suppressed by exceptions or
    /// weekend skipping.
    pub max_skip_iterations: u32,
    /// Interval-aligned periods one per-frequency search may scan.
    pub max_scan_periods: u32,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_skip_iterations: DEFAULT_MAX_SKIP_ITERATIONS,
            max_scan_periods: DEFAULT_MAX_SCAN_PERIODS,
        }
    }
}

impl EngineLimits {
    /// ## Summary
    /// Builds limits from the `engine` configuration section.
    ///
    /// ## Errors
    /// Returns `RecurError::CoreError` if a configured limit is zero.
    pub fn from_config(config: &EngineConfig) -> RecurResult<Self> {
        config.validate()?;
        Ok(Self {
            max_skip_iterations: config.max_skip_iterations,
            max_scan_periods: config.max_scan_periods,
        })
    }
}

/// Specification fields parsed once per engine call.
pub(super) struct Resolved<'a> {
    pub(super) spec: &'a RecurrenceSpec,
    tz: Tz,
    time: NaiveTime,
    /// `start_date` as a civil date in `tz`.
    start: NaiveDate,
}

impl<'a> Resolved<'a> {
    /// Returns `None` (after logging) when the specification was never
    /// validated and its time of day or timezone does not resolve.
    pub(super) fn new(spec: &'a RecurrenceSpec) -> Option<Self> {
        let time = match spec.parsed_time_of_day() {
            Ok(time) => time,
            Err(err) => {
                tracing::warn!(error = %err, "Specification not validated; no occurrences");
                return None;
            }
        };
        let tz = match spec.zone() {
            Ok(tz) => tz,
            Err(err) => {
                tracing::warn!(error = %err, "Specification not validated; no occurrences");
                return None;
            }
        };
        if spec.skip_holidays {
            tracing::debug!("skip_holidays is set but no holiday calendar is available; ignoring");
        }

        Some(Self {
            spec,
            tz,
            time,
            start: spec.start_date.with_timezone(&tz).date_naive(),
        })
    }

    fn interval(&self) -> i64 {
        i64::from(self.spec.interval.max(1))
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// `time_of_day` on `date`, as an instant.
    fn at(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        convert_to_utc_lenient(date.and_time(self.time), &self.tz).ok()
    }

    fn is_weekend(&self, instant: DateTime<Utc>) -> bool {
        Weekday::from(instant.with_timezone(&self.tz).weekday()).is_weekend()
    }

    /// The latest instant preceding `start_date`, so that a search strictly
    /// after it may return `start_date` itself.
    fn before_start(&self) -> Option<DateTime<Utc>> {
        self.spec
            .start_date
            .checked_sub_signed(TimeDelta::nanoseconds(1))
    }
}

/// Computes occurrences of a validated [`RecurrenceSpec`].
///
/// Stateless apart from its limits; one calculator may serve any number of
/// specifications concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct OccurrenceCalculator {
    limits: EngineLimits,
}

impl OccurrenceCalculator {
    #[must_use]
    pub const fn new(limits: EngineLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub const fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// ## Summary
    /// Returns the earliest occurrence strictly after `after`.
    ///
    /// The result satisfies the pattern, is before `end_date`, is not an
    /// exception, is not on a weekend when `skip_weekends` is set, and is
    /// within the first `count` occurrences from `start_date` on. `None`
    /// means the sequence is exhausted.
    ///
    /// The specification must have been validated; if its time of day or
    /// timezone does not resolve, `None` is returned.
    #[must_use]
    #[tracing::instrument(level = "trace", skip(self, spec), fields(frequency = %spec.frequency()))]
    pub fn next_occurrence(
        &self,
        spec: &RecurrenceSpec,
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let resolved = Resolved::new(spec)?;
        let next = self.filtered_next(&resolved, after)?;

        if let Some(last) = self.count_horizon(&resolved)
            && next > last
        {
            tracing::debug!(count = ?spec.count, "Occurrence count reached");
            return None;
        }

        Some(next)
    }

    /// The `count`-th occurrence from `start_date` on, if `count` is set and
    /// the sequence gets that far.
    pub(super) fn count_horizon(&self, resolved: &Resolved<'_>) -> Option<DateTime<Utc>> {
        let count = resolved.spec.count?;
        let mut cursor = resolved.before_start()?;
        for _ in 0..count {
            cursor = self.filtered_next(resolved, cursor)?;
        }
        Some(cursor)
    }

    /// Next pattern occurrence after the end-date, exception and weekend
    /// filters. Suppressed candidates are retried from the candidate itself.
    pub(super) fn filtered_next(
        &self,
        resolved: &Resolved<'_>,
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let spec = resolved.spec;
        let mut cursor = after.max(resolved.before_start()?);

        for _ in 0..self.limits.max_skip_iterations {
            let Some(candidate) = self.pattern_next(resolved, cursor) else {
                tracing::debug!(after = %cursor, "No further occurrence within scan horizon");
                return None;
            };
            tracing::trace!(candidate = %candidate, "Computed candidate");

            if candidate <= cursor {
                tracing::warn!(candidate = %candidate, after = %cursor, "Candidate did not advance");
                return None;
            }

            if let Some(end) = spec.end_date
                && candidate >= end
            {
                tracing::debug!(candidate = %candidate, end = %end, "Past end date");
                return None;
            }

            if spec.exceptions.contains(&candidate) {
                tracing::trace!(candidate = %candidate, "Skipping exception");
                cursor = candidate;
                continue;
            }

            if spec.skip_weekends && resolved.is_weekend(candidate) {
                tracing::trace!(candidate = %candidate, "Skipping weekend");
                cursor = candidate;
                continue;
            }

            return Some(candidate);
        }

        tracing::warn!(
            max_skip_iterations = self.limits.max_skip_iterations,
            "Skip limit reached while filtering candidates"
        );
        None
    }

    fn pattern_next(&self, resolved: &Resolved<'_>, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match &resolved.spec.pattern {
            Pattern::Hourly => self.next_hourly(resolved, after),
            Pattern::Daily => self.next_daily(resolved, after),
            Pattern::Weekly { days_of_week } => self.next_weekly(resolved, days_of_week, after),
            Pattern::Monthly(selector) => self.next_monthly(resolved, selector, after),
            Pattern::Yearly {
                months_of_year,
                days_of_month,
            } => self.next_yearly(resolved, months_of_year, days_of_month, after),
        }
    }

    fn next_daily(&self, resolved: &Resolved<'_>, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let interval = resolved.interval();
        let mut date = resolved.local_date(after);

        for _ in 0..self.limits.max_scan_periods {
            let offset = date
                .signed_duration_since(resolved.start)
                .num_days()
                .rem_euclid(interval);
            if offset != 0 {
                date = add_days(date, interval - offset)?;
            }
            if let Some(candidate) = resolved.at(date)
                && candidate > after
            {
                return Some(candidate);
            }
            date = add_days(date, interval)?;
        }
        None
    }

    /// Weeks start on Monday; the interval phase counts weeks from the one
    /// containing `start_date`.
    fn next_weekly(
        &self,
        resolved: &Resolved<'_>,
        days_of_week: &[Weekday],
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let wanted: Vec<chrono::Weekday> = if days_of_week.is_empty() {
            vec![resolved.start.weekday()]
        } else {
            days_of_week.iter().map(|&wd| wd.into()).collect()
        };
        let interval = resolved.interval();
        let first_week = week_start(resolved.start)?;
        let mut date = resolved.local_date(after);

        for _ in 0..u64::from(self.limits.max_scan_periods) * 7 {
            let week = date.signed_duration_since(first_week).num_days().div_euclid(7);
            let offset = week.rem_euclid(interval);
            if offset != 0 {
                date = add_days(first_week, (week + interval - offset) * 7)?;
            }
            if wanted.contains(&date.weekday())
                && let Some(candidate) = resolved.at(date)
                && candidate > after
            {
                return Some(candidate);
            }
            date = date.succ_opt()?;
        }
        None
    }

    fn next_monthly(
        &self,
        resolved: &Resolved<'_>,
        selector: &MonthlySelector,
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let interval = resolved.interval();
        let base = month_index(resolved.start);
        let mut index = month_index(resolved.local_date(after));
        let offset = (index - base).rem_euclid(interval);
        if offset != 0 {
            index += interval - offset;
        }

        for _ in 0..self.limits.max_scan_periods {
            let (year, month) = from_month_index(index)?;
            for date in monthly_dates(resolved, selector, year, month) {
                if let Some(candidate) = resolved.at(date)
                    && candidate > after
                {
                    return Some(candidate);
                }
            }
            index += interval;
        }
        None
    }

    fn next_yearly(
        &self,
        resolved: &Resolved<'_>,
        months_of_year: &[u8],
        days_of_month: &[u8],
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let months = ascending_or(months_of_year, resolved.start.month());
        let days = ascending_or(days_of_month, resolved.start.day());
        let interval = resolved.interval();
        let base = i64::from(resolved.start.year());
        let mut year = i64::from(resolved.local_date(after).year());
        let offset = (year - base).rem_euclid(interval);
        if offset != 0 {
            year += interval - offset;
        }

        for _ in 0..self.limits.max_scan_periods {
            let civil_year = i32::try_from(year).ok()?;
            for &month in &months {
                for &day in &days {
                    if let Some(date) = date_in_month(civil_year, month, day)
                        && let Some(candidate) = resolved.at(date)
                        && candidate > after
                    {
                        return Some(candidate);
                    }
                }
            }
            year += interval;
        }
        None
    }

    /// Local hour boundaries; `time_of_day` does not apply. Interval phase
    /// counts whole elapsed hours from the boundary at or before
    /// `start_date`. Every local hour is visited, so a fold yields both of
    /// its instants and a gap yields none.
    fn next_hourly(&self, resolved: &Resolved<'_>, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let interval = resolved.interval();
        let anchor = floor_to_hour(resolved.spec.start_date, &resolved.tz)?;
        let mut slot = local_hour(after, &resolved.tz)?;

        for _ in 0..self.limits.max_scan_periods {
            let mapped = resolved.tz.from_local_datetime(&slot);
            let mut offset = None;
            for local in [mapped.earliest(), mapped.latest()].into_iter().flatten() {
                let candidate = local.with_timezone(&Utc);
                if candidate <= after {
                    continue;
                }
                let phase = candidate
                    .signed_duration_since(anchor)
                    .num_minutes()
                    .div_euclid(60)
                    .rem_euclid(interval);
                if phase == 0 {
                    return Some(candidate);
                }
                offset = Some(phase);
            }

            // A fold can stretch local hours, so stop one short of the phase.
            let skip = offset.map_or(0, |phase| (interval - phase - 2).max(0));
            slot = slot.checked_add_signed(TimeDelta::try_hours(skip + 1)?)?;
        }
        None
    }
}

fn floor_to_hour(instant: DateTime<Utc>, tz: &Tz) -> Option<DateTime<Utc>> {
    let local = instant.with_timezone(tz);
    let into_hour = TimeDelta::try_minutes(i64::from(local.minute()))?
        + TimeDelta::try_seconds(i64::from(local.second()))?
        + TimeDelta::nanoseconds(i64::from(local.nanosecond()));
    instant.checked_sub_signed(into_hour)
}

/// The civil hour containing `instant`, truncated to the hour.
fn local_hour(instant: DateTime<Utc>, tz: &Tz) -> Option<NaiveDateTime> {
    let local = instant.with_timezone(tz).naive_local();
    local.date().and_hms_opt(local.hour(), 0, 0)
}

/// Candidate dates of one month, ascending. Days the month lacks are skipped.
fn monthly_dates(
    resolved: &Resolved<'_>,
    selector: &MonthlySelector,
    year: i32,
    month: u32,
) -> Vec<NaiveDate> {
    match selector {
        MonthlySelector::DaysOfMonth(days) => ascending_or(days, resolved.start.day())
            .into_iter()
            .filter_map(|day| date_in_month(year, month, day))
            .collect(),
        MonthlySelector::NthWeekday { week, weekday } => {
            nth_weekday_of_month(year, month, *week, (*weekday).into())
                .into_iter()
                .collect()
        }
        MonthlySelector::Anchor(anchor) => anchor_date(*anchor, year, month).into_iter().collect(),
        MonthlySelector::StartDay => date_in_month(year, month, resolved.start.day())
            .into_iter()
            .collect(),
    }
}

fn anchor_date(anchor: DayAnchor, year: i32, month: u32) -> Option<NaiveDate> {
    match anchor {
        DayAnchor::LastDay => date_in_month(year, month, days_in_month(year, month)),
        DayAnchor::LastWeekday => last_weekday_of_month(year, month),
        _ => {
            let weekday = anchor.weekday()?;
            nth_weekday_of_month(year, month, WeekOfMonth::Last, weekday.into())
        }
    }
}

/// Sorted, de-duplicated selector values, or `fallback` alone when empty.
fn ascending_or(values: &[u8], fallback: u32) -> Vec<u32> {
    if values.is_empty() {
        return vec![fallback];
    }
    let mut sorted: Vec<u32> = values.iter().map(|&v| u32::from(v)).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}
