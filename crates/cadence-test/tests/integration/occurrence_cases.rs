use cadence_test::component::recur::{RecurrenceSpec, occurrences_between};

include!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../cadence-recur/tests/occurrence_cases_data/mod.rs"
));

/// ## Summary
/// Shared occurrence cases, driven through the public free functions.
#[test_log::test]
fn occurrence_cases_integration() {
    for case in occurrence_cases() {
        assert_case(&case, |rule, after, until, limit| {
            let spec = RecurrenceSpec::from_json(rule)
                .unwrap_or_else(|err| panic!("Invalid rule in {}: {err}", case.name));
            occurrences_between(&spec, after, until, limit)
        });
    }
}
