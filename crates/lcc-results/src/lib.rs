//! lcc-results
//!
//! Verdicts, stats and progress for check:data runs.
//!
//! - Inputs: the terminal error of the run (if any), read-only counters owned
//!   by the sync engine, and static configuration.
//! - Outputs: a [`RunResult`] (tests + stats, error or end condition) and a
//!   [`CheckDataStatus`] (stats + progress) for live display.
//!
//! Deterministic, synchronous logic. No network IO; the remote tip is handed
//! in by the caller.

mod counters;
mod error;
mod progress;
mod render;
mod results;
mod stats;
mod verdict;

pub use counters::{
    Counter, CounterSnapshot, CounterSource, CoverageSource, SourceError, StaticCoverage,
};
pub use error::{CheckError, StorageErrorKind};
pub use progress::{compute_progress, format_time_remaining, SyncProgress};
pub use results::{
    compute_results, compute_status, CheckDataStatus, EndCondition, EndConditionKind, RunResult,
};
pub use stats::{compute_stats, Stats};
pub use verdict::{
    balance_tracking_test, block_syncing_test, compute_tests, reconciliation_test,
    request_response_test, response_assertion_test, ActivityFlags, TestSuite, Verdict,
};
