//! The command-line front end, driven with rule documents on disk.

use cadence_test::component::cli::{AppError, Commands, Context, dispatch};
use cadence_test::component::config::Settings;
use cadence_test::component::error::RecurError;

use super::helpers::{scratch_file, utc};

const MONTHLY_RULE: &str = r#"{
    "frequency": "monthly",
    "days_of_month": [31],
    "start_date": "2024-01-01T00:00:00Z",
    "time_of_day": "09:00",
    "timezone": "Europe/Berlin"
}"#;

fn context() -> Context {
    Context::from_settings(&Settings::from_toml_str("").expect("defaults")).expect("context")
}

fn run(command: &Commands) -> String {
    let mut out = Vec::new();
    dispatch(command, &context(), &mut out).expect("command succeeds");
    String::from_utf8(out).expect("utf-8 output")
}

#[test_log::test]
fn list_reads_rule_file() {
    let (_dir, rule) = scratch_file("rule.json", MONTHLY_RULE);
    let output = run(&Commands::List {
        rule,
        start: None,
        end: utc(2024, 6, 1, 0, 0),
        limit: None,
        json: false,
    });
    // 09:00 in Berlin is 08:00 UTC in winter and 07:00 UTC in summer
    assert_eq!(
        output,
        "2024-01-31T08:00:00Z\n2024-03-31T07:00:00Z\n2024-05-31T07:00:00Z\n"
    );
}

#[test_log::test]
fn validate_reports_field_errors() {
    let (_dir, rule) = scratch_file(
        "rule.json",
        r#"{"frequency": "daily", "interval": 0, "start_date": "2024-01-01T00:00:00Z", "time_of_day": "09:00"}"#,
    );
    let err = dispatch(&Commands::Validate { rule }, &context(), &mut Vec::new())
        .expect_err("interval 0 is invalid");
    match err {
        AppError::RecurError(RecurError::ValidationError(err)) => {
            assert_eq!(err.field, "interval");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test_log::test]
fn next_reads_rule_file() {
    let (_dir, rule) = scratch_file("rule.json", MONTHLY_RULE);
    let output = run(&Commands::Next {
        rule,
        after: Some(utc(2024, 2, 1, 0, 0)),
    });
    assert_eq!(output, "2024-03-31T07:00:00Z\n");
}

#[test_log::test]
fn scratch_files_are_removed_with_their_directory() {
    let (dir, rule) = scratch_file("rule.json", MONTHLY_RULE);
    assert!(rule.exists());
    drop(dir);
    assert!(!rule.exists());
}
