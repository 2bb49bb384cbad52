//! Suppression policy of `compute_results`.
//!
//! GREEN when:
//! - an unclassified error with an otherwise clean run drops `tests` but keeps
//!   `error` and `stats`,
//! - an error matched by at least one test keeps `tests` untouched,
//! - without an error `tests` is never dropped.

use lcc_config::DataConfig;
use lcc_results::{
    compute_results, compute_tests, CheckError, Counter, CounterSnapshot, CoverageSource,
    EndCondition, EndConditionKind, StaticCoverage, StorageErrorKind, Verdict,
};

fn synced_counters() -> CounterSnapshot {
    CounterSnapshot::new()
        .with(Counter::Blocks, 100u64)
        .with(Counter::Orphans, 0u64)
        .with(Counter::Transactions, 250u64)
        .with(Counter::Operations, 600u64)
        .with(Counter::ActiveReconciliations, 12u64)
        .with(Counter::InactiveReconciliations, 3u64)
}

#[test]
fn unclassified_error_on_clean_run_drops_tests_keeps_stats() {
    let cfg = DataConfig::default();
    let counters = synced_counters();
    let err = CheckError::other("unexpected EOF reading state");

    let r = compute_results(&cfg, Some(&err), Some(&counters), None, None);

    assert_eq!(r.error.as_deref(), Some("unexpected EOF reading state"));
    assert_eq!(r.tests, None);
    assert_eq!(r.stats.as_ref().map(|s| s.blocks), Some(100));
    assert_eq!(r.end_condition, None);
}

#[test]
fn unclassified_error_without_any_signal_drops_tests() {
    let cfg = DataConfig::default();
    let err = CheckError::other("boom");

    let tests = compute_tests(&cfg, Some(&err), None);
    assert!(tests.request_response);
    assert!(tests.response_assertion);
    assert_eq!(tests.block_syncing, Verdict::NotTested);
    assert_eq!(tests.balance_tracking, Verdict::NotTested);
    assert_eq!(tests.reconciliation, Verdict::NotTested);

    let r = compute_results(&cfg, Some(&err), None, None, None);
    assert_eq!(r.error.as_deref(), Some("boom"));
    assert_eq!(r.tests, None);
    assert_eq!(r.stats, None);
}

#[test]
fn matched_error_keeps_tests_unmodified() {
    let cfg = DataConfig::default();
    let counters = synced_counters();
    let err = CheckError::Assertion {
        message: "block 7 has no hash".to_string(),
    };

    let expected = compute_tests(&cfg, Some(&err), Some(&counters));
    let r = compute_results(&cfg, Some(&err), Some(&counters), None, None);

    assert_eq!(r.tests, Some(expected));
    let tests = r.tests.unwrap();
    assert!(!tests.response_assertion);
    assert!(tests.request_response);
    assert_eq!(tests.block_syncing, Verdict::Passed);
}

#[test]
fn error_never_carries_end_condition() {
    let cfg = DataConfig::default();
    let counters = synced_counters();
    let end = EndCondition::new(EndConditionKind::Tip, "reached tip 100");

    let errors = [
        CheckError::other("x"),
        CheckError::storage(StorageErrorKind::NegativeBalance, "acct -1"),
        CheckError::Syncer {
            message: "fork".to_string(),
        },
    ];
    for err in &errors {
        let r = compute_results(&cfg, Some(err), Some(&counters), None, Some(end.clone()));
        assert!(r.error.is_some());
        assert_eq!(r.end_condition, None);
    }
}

#[test]
fn no_error_keeps_tests_and_attaches_end_condition() {
    let cfg = DataConfig::default();
    let counters = synced_counters().with_coverage(0.4);
    let coverage = counters.coverage();
    let end = EndCondition::new(EndConditionKind::Duration, "ran for 60s");

    let r = compute_results(
        &cfg,
        None,
        Some(&counters),
        coverage.as_ref().map(|c| c as &dyn CoverageSource),
        Some(end.clone()),
    );

    assert_eq!(r.error, None);
    assert_eq!(r.end_condition, Some(end));
    let tests = r.tests.unwrap();
    assert!(!tests.has_failure());
    assert_eq!(tests.reconciliation, Verdict::Passed);
    assert_eq!(r.stats.unwrap().reconciliation_coverage, 0.4);
}

#[test]
fn no_error_and_no_signal_still_reports_tests() {
    let r = compute_results(&DataConfig::default(), None, None, Some(&StaticCoverage(0.1)), None);
    assert!(r.tests.is_some());
    assert_eq!(r.end_condition, None);
    assert_eq!(r.stats, None);
}
