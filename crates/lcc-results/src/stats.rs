use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::counters::{Counter, CounterSource, CoverageSource};

/// Counters observed during a check:data run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub blocks: u64,
    pub orphans: u64,
    pub transactions: u64,
    pub operations: u64,
    pub active_reconciliations: u64,
    pub inactive_reconciliations: u64,
    /// Fraction in [0, 1].
    pub reconciliation_coverage: f64,
}

impl Stats {
    /// (name, description, rendered value) in display order.
    pub fn rows(&self) -> [(&'static str, &'static str, String); 7] {
        [
            ("Blocks", "# of blocks synced", self.blocks.to_string()),
            ("Orphans", "# of blocks orphaned", self.orphans.to_string()),
            (
                "Transactions",
                "# of transaction processed",
                self.transactions.to_string(),
            ),
            (
                "Operations",
                "# of operations processed",
                self.operations.to_string(),
            ),
            (
                "Active Reconciliations",
                "# of reconciliations performed after seeing an account in a block",
                self.active_reconciliations.to_string(),
            ),
            (
                "Inactive Reconciliations",
                "# of reconciliation performed on randomly selected accounts",
                self.inactive_reconciliations.to_string(),
            ),
            (
                "Reconciliation Coverage",
                "% of accounts that have been reconciled",
                format!("{:.6}%", self.reconciliation_coverage * 100.0),
            ),
        ]
    }
}

/// Snapshot the counters into [`Stats`].
///
/// Returns `None` when there is no counter source or when any single read
/// fails. Without a coverage source the coverage stays at zero.
pub fn compute_stats(
    counters: Option<&dyn CounterSource>,
    coverage: Option<&dyn CoverageSource>,
) -> Option<Stats> {
    let counters = counters?;

    let mut stats = Stats {
        blocks: read_u64(counters, Counter::Blocks)?,
        orphans: read_u64(counters, Counter::Orphans)?,
        transactions: read_u64(counters, Counter::Transactions)?,
        operations: read_u64(counters, Counter::Operations)?,
        active_reconciliations: read_u64(counters, Counter::ActiveReconciliations)?,
        inactive_reconciliations: read_u64(counters, Counter::InactiveReconciliations)?,
        reconciliation_coverage: 0.0,
    };

    if let Some(source) = coverage {
        stats.reconciliation_coverage = match source.reconciliation_coverage() {
            Ok(c) if (0.0..=1.0).contains(&c) => c,
            Ok(c) => {
                warn!(coverage = c, "reconciliation coverage outside [0, 1]; dropping stats");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "cannot get reconciliation coverage");
                return None;
            }
        };
    }

    Some(stats)
}

fn read_u64(counters: &dyn CounterSource, counter: Counter) -> Option<u64> {
    let value = match counters.get(counter) {
        Ok(v) => v,
        Err(e) => {
            warn!(%counter, error = %e, "cannot get counter");
            return None;
        }
    };

    match u64::try_from(&value) {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(%counter, %value, "counter does not fit in u64");
            None
        }
    }
}
