//! Verdict engine: which check:data tests passed.
//!
//! Each test is evaluated independently from the terminal error and from
//! whether the subsystem it covers was exercised at all. A test that was never
//! exercised reports [`Verdict::NotTested`] unless a matching failure is
//! present; a matching failure always wins.

use lcc_config::DataConfig;
use num_bigint::Sign;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::counters::{Counter, CounterSource};
use crate::error::{CheckError, StorageErrorKind};

/// Tri-state test outcome.
///
/// On the wire this is an optional boolean: absent = not tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    #[default]
    NotTested,
    Passed,
    Failed,
}

impl Verdict {
    /// `failed` wins over `exercised`.
    pub fn evaluate(failed: bool, exercised: bool) -> Self {
        if failed {
            Verdict::Failed
        } else if !exercised {
            Verdict::NotTested
        } else {
            Verdict::Passed
        }
    }

    pub fn from_option(v: Option<bool>) -> Self {
        match v {
            None => Verdict::NotTested,
            Some(true) => Verdict::Passed,
            Some(false) => Verdict::Failed,
        }
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            Verdict::NotTested => None,
            Verdict::Passed => Some(true),
            Verdict::Failed => Some(false),
        }
    }

    pub fn is_failed(&self) -> bool {
        *self == Verdict::Failed
    }

    pub fn is_not_tested(&self) -> bool {
        *self == Verdict::NotTested
    }

    /// Console label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::NotTested => "NOT TESTED",
            Verdict::Passed => "PASSED",
            Verdict::Failed => "FAILED",
        }
    }
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        if passed {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Verdict::from_option)
    }
}

/// Outcome of the five check:data tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    /// Every request was serviced. Never "not tested".
    pub request_response: bool,
    /// Every response was well formed. Never "not tested".
    pub response_assertion: bool,
    #[serde(default, skip_serializing_if = "Verdict::is_not_tested")]
    pub block_syncing: Verdict,
    #[serde(default, skip_serializing_if = "Verdict::is_not_tested")]
    pub balance_tracking: Verdict,
    #[serde(default, skip_serializing_if = "Verdict::is_not_tested")]
    pub reconciliation: Verdict,
}

impl TestSuite {
    /// True when at least one test failed.
    pub fn has_failure(&self) -> bool {
        !self.request_response
            || !self.response_assertion
            || self.block_syncing.is_failed()
            || self.balance_tracking.is_failed()
            || self.reconciliation.is_failed()
    }

    /// (name, description, verdict) in display order.
    pub fn rows(&self) -> [(&'static str, &'static str, Verdict); 5] {
        [
            (
                "Request/Response",
                "Implementation serviced all requests",
                self.request_response.into(),
            ),
            (
                "Response Assertion",
                "All responses are correctly formatted",
                self.response_assertion.into(),
            ),
            (
                "Block Syncing",
                "Blocks are connected into a single canonical chain",
                self.block_syncing,
            ),
            (
                "Balance Tracking",
                "Account balances did not go negative",
                self.balance_tracking,
            ),
            (
                "Reconciliation",
                "No balance discrepancies were found between computed and live balances",
                self.reconciliation,
            ),
        ]
    }
}

/// Which subsystems were exercised during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivityFlags {
    pub blocks_synced: bool,
    pub operations_seen: bool,
    pub reconciliations_performed: bool,
}

impl ActivityFlags {
    /// Read activity from counters. An unreadable counter counts as "not
    /// observed"; it never aborts the computation.
    pub fn observe(counters: Option<&dyn CounterSource>) -> Self {
        let Some(counters) = counters else {
            return ActivityFlags::default();
        };

        ActivityFlags {
            blocks_synced: is_positive(counters, Counter::Blocks),
            operations_seen: is_positive(counters, Counter::Operations),
            reconciliations_performed: is_positive(counters, Counter::ActiveReconciliations)
                || is_positive(counters, Counter::InactiveReconciliations),
        }
    }
}

fn is_positive(counters: &dyn CounterSource, counter: Counter) -> bool {
    match counters.get(counter) {
        Ok(v) => v.sign() == Sign::Plus,
        Err(e) => {
            debug!(%counter, error = %e, "counter unreadable; treating as not observed");
            false
        }
    }
}

/// All endpoints returned a usable response.
pub fn request_response_test(err: Option<&CheckError>) -> bool {
    !err.is_some_and(CheckError::is_request_failure)
}

/// All responses were correctly formatted.
pub fn response_assertion_test(err: Option<&CheckError>) -> bool {
    !err.is_some_and(CheckError::is_assertion_failure)
}

/// Blocks could be synced. A negative balance is a balance-tracking failure,
/// not a syncing one.
pub fn block_syncing_test(err: Option<&CheckError>, blocks_synced: bool) -> Verdict {
    let failed = err.is_some_and(|e| {
        e.is_syncer_failure()
            || e.storage_kind()
                .is_some_and(|kind| kind != StorageErrorKind::NegativeBalance)
    });
    Verdict::evaluate(failed, blocks_synced)
}

/// No balance went negative or otherwise failed to compute.
pub fn balance_tracking_test(
    cfg: &DataConfig,
    err: Option<&CheckError>,
    operations_seen: bool,
) -> Verdict {
    let failed = err.is_some_and(CheckError::is_balance_storage_failure);
    Verdict::evaluate(failed, !cfg.balance_tracking_disabled && operations_seen)
}

/// No discrepancy between computed and live balances.
pub fn reconciliation_test(
    cfg: &DataConfig,
    err: Option<&CheckError>,
    reconciliations_performed: bool,
) -> Verdict {
    let failed = err.is_some_and(CheckError::is_reconciliation_failure);
    let exercised = !cfg.balance_tracking_disabled
        && !cfg.reconciliation_disabled
        && !cfg.ignore_reconciliation_error
        && reconciliations_performed;
    Verdict::evaluate(failed, exercised)
}

/// Evaluate all five tests.
pub fn compute_tests(
    cfg: &DataConfig,
    err: Option<&CheckError>,
    counters: Option<&dyn CounterSource>,
) -> TestSuite {
    let flags = ActivityFlags::observe(counters);

    TestSuite {
        request_response: request_response_test(err),
        response_assertion: response_assertion_test(err),
        block_syncing: block_syncing_test(err, flags.blocks_synced),
        balance_tracking: balance_tracking_test(cfg, err, flags.operations_seen),
        reconciliation: reconciliation_test(cfg, err, flags.reconciliations_performed),
    }
}
