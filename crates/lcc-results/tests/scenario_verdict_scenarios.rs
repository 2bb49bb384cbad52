//! End-to-end verdict scenarios.
//!
//! GREEN when:
//! - a clean run that synced to the tip passes block syncing and has no
//!   progress left to estimate,
//! - a negative balance fails balance tracking only,
//! - config disable flags force NOT_TESTED regardless of counters,
//! - unreadable counters degrade to "not observed" instead of failing.

use lcc_config::DataConfig;
use lcc_results::{
    compute_progress, compute_results, compute_tests, CheckError, Counter, CounterSnapshot,
    CounterSource, SourceError, StorageErrorKind, Verdict,
};
use num_bigint::BigInt;

fn counters(blocks: u64, operations: u64, reconciliations: u64) -> CounterSnapshot {
    CounterSnapshot::new()
        .with(Counter::Blocks, blocks)
        .with(Counter::Orphans, 0u64)
        .with(Counter::Transactions, blocks * 2)
        .with(Counter::Operations, operations)
        .with(Counter::ActiveReconciliations, reconciliations)
        .with(Counter::InactiveReconciliations, 0u64)
        .with(Counter::TimeElapsed, 20u64)
}

/// Every read fails.
struct Unreadable;

impl CounterSource for Unreadable {
    fn get(&self, counter: Counter) -> Result<BigInt, SourceError> {
        Err(SourceError::Unreadable {
            counter,
            message: "storage closed".to_string(),
        })
    }
}

#[test]
fn clean_run_at_tip() {
    let snap = counters(100, 0, 0);
    let r = compute_results(&DataConfig::default(), None, Some(&snap), None, None);

    assert_eq!(r.error, None);
    assert_eq!(r.end_condition, None);
    let tests = r.tests.unwrap();
    assert_eq!(tests.block_syncing, Verdict::Passed);
    assert_eq!(tests.balance_tracking, Verdict::NotTested);
    assert_eq!(tests.reconciliation, Verdict::NotTested);

    assert_eq!(compute_progress(Ok::<i64, String>(100), &snap), None);
}

#[test]
fn negative_balance_fails_balance_tracking_only() {
    let snap = counters(40, 90, 5);
    let err = CheckError::storage(StorageErrorKind::NegativeBalance, "acct-3 balance -12");

    let r = compute_results(&DataConfig::default(), Some(&err), Some(&snap), None, None);

    assert_eq!(r.error.as_deref(), Some("negative balance: acct-3 balance -12"));
    let tests = r.tests.expect("a failed test keeps the table");
    assert!(tests.request_response);
    assert!(tests.response_assertion);
    assert_eq!(tests.block_syncing, Verdict::Passed);
    assert_eq!(tests.balance_tracking, Verdict::Failed);
    assert_eq!(tests.reconciliation, Verdict::Passed);
}

#[test]
fn block_syncing_not_tested_only_without_blocks_and_sync_errors() {
    let cfg = DataConfig::default();
    let empty = counters(0, 0, 0);

    let t = compute_tests(&cfg, None, Some(&empty));
    assert_eq!(t.block_syncing, Verdict::NotTested);

    let missing_block = CheckError::storage(StorageErrorKind::BlockNotFound, "index 0");
    let t = compute_tests(&cfg, Some(&missing_block), Some(&empty));
    assert_eq!(t.block_syncing, Verdict::Failed);

    let negative = CheckError::storage(StorageErrorKind::NegativeBalance, "acct");
    let t = compute_tests(&cfg, Some(&negative), Some(&empty));
    assert_eq!(t.block_syncing, Verdict::NotTested);
}

#[test]
fn disable_flags_force_not_tested_regardless_of_counters() {
    let busy = counters(500, 2_000, 300);

    let balance_off = DataConfig {
        balance_tracking_disabled: true,
        ..DataConfig::default()
    };
    let t = compute_tests(&balance_off, None, Some(&busy));
    assert_eq!(t.balance_tracking, Verdict::NotTested);
    assert_eq!(t.reconciliation, Verdict::NotTested);
    assert_eq!(t.block_syncing, Verdict::Passed);

    let reconciliation_off = DataConfig {
        reconciliation_disabled: true,
        ..DataConfig::default()
    };
    let t = compute_tests(&reconciliation_off, None, Some(&busy));
    assert_eq!(t.balance_tracking, Verdict::Passed);
    assert_eq!(t.reconciliation, Verdict::NotTested);

    let ignored = DataConfig {
        ignore_reconciliation_error: true,
        ..DataConfig::default()
    };
    let t = compute_tests(&ignored, None, Some(&busy));
    assert_eq!(t.reconciliation, Verdict::NotTested);
}

#[test]
fn inactive_reconciliations_alone_count_as_performed() {
    let snap = counters(10, 10, 0).with(Counter::InactiveReconciliations, 4u64);
    let t = compute_tests(&DataConfig::default(), None, Some(&snap));
    assert_eq!(t.reconciliation, Verdict::Passed);
}

#[test]
fn unreadable_counters_mean_not_observed() {
    let cfg = DataConfig::default();

    let t = compute_tests(&cfg, None, Some(&Unreadable));
    assert!(t.request_response);
    assert_eq!(t.block_syncing, Verdict::NotTested);
    assert_eq!(t.balance_tracking, Verdict::NotTested);
    assert_eq!(t.reconciliation, Verdict::NotTested);

    let r = compute_results(&cfg, None, Some(&Unreadable), None, None);
    assert!(r.tests.is_some());
    assert_eq!(r.stats, None);
    assert_eq!(compute_progress(Ok::<i64, String>(10), &Unreadable), None);
}

#[test]
fn request_failures_fail_request_response() {
    let cfg = DataConfig::default();
    let snap = counters(10, 0, 0);
    let failures = [
        CheckError::Fetch {
            message: "HTTP 500".to_string(),
        },
        CheckError::NetworkNotSupported {
            message: "Bitcoin/Regtest".to_string(),
        },
        CheckError::NetworkStatus {
            message: "timeout".to_string(),
        },
        CheckError::FetchBlock {
            message: "index 11".to_string(),
        },
    ];

    for err in &failures {
        let r = compute_results(&cfg, Some(err), Some(&snap), None, None);
        let tests = r.tests.expect("request failure is a failed test");
        assert!(!tests.request_response, "{err}");
        assert!(tests.response_assertion);
    }
}
