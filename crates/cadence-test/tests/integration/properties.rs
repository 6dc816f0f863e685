#![expect(clippy::expect_used, reason = "a panicking worker fails the test")]
//! Engine-wide properties checked over the specification corpus.

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Australia::Lord_Howe;
use chrono_tz::Pacific::Auckland;

use cadence_test::component::recur::{
    OccurrenceCalculator, RecurrenceSpec, Weekday, next_occurrence, occurrences_between,
};

use super::helpers::{corpus, start, utc};

fn window_end() -> DateTime<Utc> {
    utc(2026, 1, 1, 0, 0)
}

fn reference_instants() -> Vec<DateTime<Utc>> {
    vec![
        utc(2023, 6, 1, 0, 0),
        start(),
        utc(2024, 1, 1, 9, 0),
        utc(2024, 2, 29, 23, 59),
        utc(2024, 3, 10, 7, 0),
        utc(2024, 11, 3, 5, 30),
        utc(2025, 12, 31, 12, 0),
    ]
}

#[test_log::test]
fn next_is_strictly_after_reference() {
    for spec in corpus() {
        for reference in reference_instants() {
            if let Some(next) = next_occurrence(&spec, reference) {
                assert!(next > reference, "{spec}: {next} not after {reference}");
                assert!(next >= spec.start_date, "{spec}: {next} before start");
            }
        }
    }
}

#[test_log::test]
fn matching_start_date_is_the_first_occurrence() {
    for spec in corpus() {
        let before = spec.start_date - TimeDelta::seconds(1);
        let Some(first) = next_occurrence(&spec, before) else {
            panic!("{spec} produced nothing");
        };
        assert!(first >= spec.start_date, "{spec}");

        // Re-anchored on its first occurrence, a rule starts with its start date
        let mut anchored = spec.clone();
        anchored.start_date = first;
        assert_eq!(next_occurrence(&anchored, before), Some(first), "{spec}");
    }
}

#[test_log::test]
fn enumeration_matches_chained_next() {
    for spec in corpus() {
        let listed = occurrences_between(&spec, start(), window_end(), 50);

        let mut chained = Vec::new();
        let mut cursor = start();
        while chained.len() < 50 {
            match next_occurrence(&spec, cursor) {
                Some(next) if next <= window_end() => {
                    chained.push(next);
                    cursor = next;
                }
                _ => break,
            }
        }
        assert_eq!(listed, chained, "{spec}");
    }
}

#[test_log::test]
fn enumeration_is_sorted_and_unique() {
    for spec in corpus() {
        let listed = occurrences_between(&spec, start(), window_end(), 200);
        assert!(!listed.is_empty(), "{spec} produced nothing");
        assert!(listed.windows(2).all(|pair| pair[0] < pair[1]), "{spec}");
        assert!(listed.iter().all(|o| *o > start() && *o <= window_end()));
    }
}

#[test_log::test]
fn daily_and_hourly_intervals_are_exact() {
    for interval in [1, 2, 5, 13] {
        let daily = RecurrenceSpec::daily(start(), "06:45", "UTC", interval);
        let got = occurrences_between(&daily, start(), window_end(), 40);
        assert!(
            got.windows(2)
                .all(|pair| pair[1] - pair[0] == TimeDelta::days(i64::from(interval))),
            "daily interval {interval}"
        );

        let hourly = RecurrenceSpec::hourly(start(), "00:00", "America/New_York", interval);
        let got = occurrences_between(&hourly, utc(2024, 3, 9, 0, 0), window_end(), 40);
        assert!(
            got.windows(2)
                .all(|pair| pair[1] - pair[0] == TimeDelta::hours(i64::from(interval))),
            "hourly interval {interval}"
        );
    }
}

#[test_log::test]
fn hourly_stays_on_local_hours_across_half_hour_dst() {
    // Lord Howe Island shifts by 30 minutes in October and April
    for interval in [1, 2, 5] {
        let spec = RecurrenceSpec::hourly(start(), "00:00", "Australia/Lord_Howe", interval);
        for window_start in [utc(2024, 4, 6, 0, 0), utc(2024, 10, 5, 0, 0)] {
            let got = occurrences_between(&spec, window_start, window_end(), 48);
            assert_eq!(got.len(), 48, "interval {interval}");
            for occurrence in &got {
                let local = occurrence.with_timezone(&Lord_Howe);
                assert_eq!(
                    (local.minute(), local.second()),
                    (0, 0),
                    "interval {interval}: {local} is not an hour boundary"
                );
            }
            let nominal = TimeDelta::hours(i64::from(interval));
            let mut stretched = 0;
            for pair in got.windows(2) {
                let gap = pair[1] - pair[0];
                if gap != nominal {
                    stretched += 1;
                    assert!(
                        (gap - nominal).abs() <= TimeDelta::minutes(30),
                        "interval {interval}: gap {gap} around {}",
                        pair[0]
                    );
                }
            }
            assert!(stretched <= 1, "interval {interval}: {stretched} irregular gaps");
        }
    }
}

#[test_log::test]
fn daily_interval_holds_civil_days_across_dst() {
    let spec = RecurrenceSpec::daily(utc(2024, 3, 1, 5, 0), "09:00", "America/New_York", 3);
    let got = occurrences_between(&spec, spec.start_date, utc(2024, 4, 1, 0, 0), 20);
    assert_eq!(got.len(), 11);
    for pair in got.windows(2) {
        let first = pair[0].with_timezone(&New_York);
        let second = pair[1].with_timezone(&New_York);
        assert_eq!((second.date_naive() - first.date_naive()).num_days(), 3);
        assert_eq!((first.hour(), second.hour()), (9, 9));
    }
}

#[test_log::test]
fn end_date_is_never_reached() {
    for spec in corpus() {
        let end = utc(2024, 9, 15, 12, 0);
        let bounded = spec.clone().with_end_date(end);
        let got = occurrences_between(&bounded, start(), window_end(), 10_000);
        assert!(got.iter().all(|o| *o < end), "{spec}");
        if let Some(last) = got.last() {
            assert_eq!(next_occurrence(&bounded, *last), None, "{spec}");
        }

        let included = bounded
            .with_include(utc(2024, 9, 1, 0, 0))
            .with_include(end)
            .with_include(utc(2025, 3, 1, 0, 0));
        let listed = occurrences_between(&included, start(), window_end(), 10_000);
        assert!(listed.contains(&utc(2024, 9, 1, 0, 0)), "{spec}");
        assert!(listed.iter().all(|o| *o < end), "{spec}: include past end date");
    }
}

#[test_log::test]
fn count_bounds_total_occurrences() {
    for spec in corpus() {
        let bounded = spec.clone().with_count(4);

        let mut seen = 0;
        let mut cursor = bounded.start_date - TimeDelta::seconds(1);
        while let Some(next) = next_occurrence(&bounded, cursor) {
            seen += 1;
            cursor = next;
            assert!(seen <= 4, "{spec} exceeded its count");
        }
        assert_eq!(seen, 4, "{spec}");

        let listed = occurrences_between(&bounded, start(), window_end(), 100);
        assert!(listed.len() <= 4, "{spec}");
    }
}

#[test_log::test]
fn exceptions_never_appear() {
    for spec in corpus() {
        let base = occurrences_between(&spec, start(), window_end(), 6);
        let mut excluded = spec.clone();
        for occurrence in base.iter().skip(1).step_by(2) {
            excluded.add_exception(*occurrence);
        }

        let got = occurrences_between(&excluded, start(), window_end(), 6);
        for exception in &excluded.exceptions {
            assert!(!got.contains(exception), "{spec}: {exception} listed");
            let before = *exception - TimeDelta::seconds(1);
            assert_ne!(next_occurrence(&excluded, before), Some(*exception));
        }
        assert_eq!(got.first(), base.first(), "{spec}");
    }
}

#[test_log::test]
fn includes_always_appear_in_order() {
    let extra = [utc(2024, 2, 14, 13, 37), utc(2024, 7, 4, 0, 1), utc(2025, 1, 1, 0, 0)];
    for spec in corpus() {
        let mut included = spec.clone();
        for instant in extra {
            included.add_include(instant);
        }
        let got = occurrences_between(&included, start(), window_end(), 3);
        for instant in extra {
            assert!(got.contains(&instant), "{spec}: {instant} missing");
        }
        assert!(got.windows(2).all(|pair| pair[0] < pair[1]), "{spec}");
    }
}

#[test_log::test]
fn thirty_first_never_in_short_months() {
    let spec = RecurrenceSpec::monthly(start(), "09:00", "UTC", 1, vec![31]);
    let got = occurrences_between(&spec, start(), utc(2034, 1, 1, 0, 0), 1000);
    assert_eq!(got.len(), 70);
    assert!(got.iter().all(|o| ![2, 4, 6, 9, 11].contains(&o.month())));
}

#[test_log::test]
fn skip_weekends_holds_in_local_time() {
    let spec = RecurrenceSpec::daily(start(), "23:30", "Pacific/Auckland", 1).with_skip_weekends(true);
    let got = occurrences_between(&spec, start(), utc(2024, 3, 1, 0, 0), 100);
    assert!(!got.is_empty());
    for occurrence in got {
        let local = Weekday::from(occurrence.with_timezone(&Auckland).weekday());
        assert!(!local.is_weekend(), "{occurrence} is a local weekend");
    }
}

#[test_log::test]
fn validation_is_idempotent() {
    for spec in corpus() {
        assert_eq!(spec.validate(), spec.validate());
        let broken = spec.with_interval(0);
        assert_eq!(broken.validate(), broken.validate());
        assert!(broken.validate().is_err());
    }
}

#[test_log::test]
fn concurrent_callers_agree() {
    let specs = corpus();
    let calculator = OccurrenceCalculator::default();
    let sequential: Vec<Vec<DateTime<Utc>>> = specs
        .iter()
        .map(|spec| calculator.occurrences_between(spec, start(), window_end(), 25))
        .collect();

    let concurrent: Vec<Vec<DateTime<Utc>>> = std::thread::scope(|scope| {
        let handles: Vec<_> = specs
            .iter()
            .map(|spec| {
                scope.spawn(move || calculator.occurrences_between(spec, start(), window_end(), 25))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    assert_eq!(sequential, concurrent);
}
