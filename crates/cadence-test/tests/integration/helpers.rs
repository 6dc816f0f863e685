#![expect(clippy::expect_used, reason = "test helpers panic on malformed fixtures")]
//! Test helpers for integration tests.
//!
//! Provides:
//! - a corpus of validated specifications covering every frequency
//! - instant construction shorthands
//! - scratch files for rule and configuration documents

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};

use cadence_test::component::recur::{
    DayAnchor, MonthlySelector, Pattern, RecurrenceSpec, WeekOfMonth, Weekday,
};
use tempfile::TempDir;

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid UTC instant")
}

pub fn start() -> DateTime<Utc> {
    utc(2024, 1, 1, 0, 0)
}

/// Specifications across frequencies, intervals, selectors and timezones.
pub fn corpus() -> Vec<RecurrenceSpec> {
    let specs = vec![
        RecurrenceSpec::hourly(start(), "00:00", "UTC", 1),
        RecurrenceSpec::hourly(start(), "00:00", "America/New_York", 5),
        RecurrenceSpec::daily(start(), "09:00", "UTC", 1),
        RecurrenceSpec::daily(start(), "02:30", "America/New_York", 2),
        RecurrenceSpec::daily(start(), "23:45", "Asia/Kolkata", 7).with_skip_weekends(true),
        RecurrenceSpec::weekly(
            start(),
            "18:00",
            "Europe/Berlin",
            1,
            vec![Weekday::Tuesday, Weekday::Thursday],
        ),
        RecurrenceSpec::weekly(start(), "07:15", "Australia/Sydney", 3, Vec::new()),
        RecurrenceSpec::monthly(start(), "09:00", "UTC", 1, vec![31, 1, 15]),
        RecurrenceSpec::monthly(start(), "12:00", "Europe/London", 5, vec![29, 30]),
        RecurrenceSpec::monthly_by_week(
            start(),
            "10:00",
            "America/Chicago",
            1,
            WeekOfMonth::Last,
            Weekday::Friday,
        ),
        RecurrenceSpec::monthly_by_week(
            start(),
            "08:00",
            "UTC",
            2,
            WeekOfMonth::Fourth,
            Weekday::Sunday,
        ),
        RecurrenceSpec::new(
            Pattern::Monthly(MonthlySelector::Anchor(DayAnchor::LastWeekday)),
            start(),
            "17:00",
            "UTC",
        ),
        RecurrenceSpec::new(
            Pattern::Monthly(MonthlySelector::Anchor(DayAnchor::LastDay)),
            start(),
            "17:00",
            "Pacific/Auckland",
        ),
        RecurrenceSpec::yearly(start(), "09:00", "UTC", 1, vec![2, 8], vec![29, 31]),
        RecurrenceSpec::yearly(start(), "06:00", "America/Los_Angeles", 2, Vec::new(), Vec::new()),
    ];

    for spec in &specs {
        spec.validate().expect("corpus specifications are valid");
    }
    specs
}

/// Writes `contents` to `name` inside a fresh temporary directory.
///
/// The directory and file are removed when the returned [`TempDir`] drops,
/// so callers keep it alive for as long as the path is in use.
pub fn scratch_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create scratch directory");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write scratch file");
    (dir, path)
}
