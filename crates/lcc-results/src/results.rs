use lcc_config::DataConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Display;
use tracing::{info, warn};

use crate::counters::{CounterSource, CoverageSource};
use crate::error::CheckError;
use crate::progress::{compute_progress, SyncProgress};
use crate::stats::{compute_stats, Stats};
use crate::verdict::{compute_tests, TestSuite};

/// Reason a run stopped voluntarily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndConditionKind {
    /// Synced up to the remote tip.
    Tip,
    /// Reached a configured block index.
    Index,
    /// Ran for a configured duration.
    Duration,
    /// Reached a configured reconciliation coverage.
    ReconciliationCoverage,
}

impl EndConditionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndConditionKind::Tip => "tip",
            EndConditionKind::Index => "index",
            EndConditionKind::Duration => "duration",
            EndConditionKind::ReconciliationCoverage => "reconciliation_coverage",
        }
    }
}

impl fmt::Display for EndConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndCondition {
    #[serde(rename = "type")]
    pub kind: EndConditionKind,
    pub detail: String,
}

impl EndCondition {
    pub fn new(kind: EndConditionKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Final report of a check:data run. This is what gets printed and persisted.
///
/// `error` and `end_condition` are never both set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_condition: Option<EndCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<TestSuite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
}

/// Build the final [`RunResult`]. Never fails.
///
/// When an error is present and no test failed, the error falls outside what
/// the tests cover: `tests` is dropped so an unexplained error is not shown
/// next to an all-green table. Stats are kept either way.
pub fn compute_results(
    cfg: &DataConfig,
    err: Option<&CheckError>,
    counters: Option<&dyn CounterSource>,
    coverage: Option<&dyn CoverageSource>,
    end_condition: Option<EndCondition>,
) -> RunResult {
    let tests = compute_tests(cfg, err, counters);
    let stats = compute_stats(counters, coverage);
    let mut results = RunResult {
        error: None,
        end_condition: None,
        tests: Some(tests),
        stats,
    };

    if let Some(err) = err {
        results.error = Some(err.to_string());
        if !tests.has_failure() {
            info!(class = err.class(), "error not covered by any test; omitting tests");
            results.tests = None;
        }
        return results;
    }

    results.end_condition = end_condition;
    results
}

/// Live status of a running check:data: stats plus progress towards the tip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckDataStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<SyncProgress>,
}

pub fn compute_status<E: Display>(
    counters: Option<&dyn CounterSource>,
    coverage: Option<&dyn CoverageSource>,
    tip: Result<i64, E>,
) -> CheckDataStatus {
    let progress = match tip {
        Ok(tip) => counters.and_then(|c| compute_progress(Ok::<i64, E>(tip), c)),
        Err(e) => {
            warn!(error = %e, "cannot get network status");
            None
        }
    };

    CheckDataStatus {
        stats: compute_stats(counters, coverage),
        progress,
    }
}
