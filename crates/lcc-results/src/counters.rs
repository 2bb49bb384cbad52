//! Read-only view over the sync engine's counters.

use anyhow::{anyhow, bail, Context, Result};
use num_bigint::{BigInt, Sign};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Counters maintained by the sync and reconciliation engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    Blocks,
    Orphans,
    Transactions,
    Operations,
    ActiveReconciliations,
    InactiveReconciliations,
    /// Seconds spent syncing.
    TimeElapsed,
}

impl Counter {
    pub const ALL: [Counter; 7] = [
        Counter::Blocks,
        Counter::Orphans,
        Counter::Transactions,
        Counter::Operations,
        Counter::ActiveReconciliations,
        Counter::InactiveReconciliations,
        Counter::TimeElapsed,
    ];

    /// Key under which the counter is stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::Blocks => "blocks",
            Counter::Orphans => "orphans",
            Counter::Transactions => "transactions",
            Counter::Operations => "operations",
            Counter::ActiveReconciliations => "active_reconciliations",
            Counter::InactiveReconciliations => "inactive_reconciliations",
            Counter::TimeElapsed => "time_elapsed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Counter::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("counter {0} is not initialized")]
    Uninitialized(Counter),

    #[error("counter {counter} is unreadable: {message}")]
    Unreadable { counter: Counter, message: String },

    #[error("reconciliation coverage unavailable: {0}")]
    Coverage(String),
}

/// Narrow read interface over the counter store.
///
/// Implementations are owned elsewhere and may be mutated concurrently; each
/// `get` is an independent point-in-time read.
pub trait CounterSource {
    fn get(&self, counter: Counter) -> Result<BigInt, SourceError>;
}

/// Fraction of known accounts that have been reconciled at least once.
pub trait CoverageSource {
    fn reconciliation_coverage(&self) -> Result<f64, SourceError>;
}

/// Coverage value read ahead of time (e.g. from a snapshot file).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCoverage(pub f64);

impl CoverageSource for StaticCoverage {
    fn reconciliation_coverage(&self) -> Result<f64, SourceError> {
        Ok(self.0)
    }
}

/// In-memory copy of the counters, optionally with reconciliation coverage.
///
/// A counter that was never written reads as [`SourceError::Uninitialized`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterSnapshot {
    counters: BTreeMap<Counter, BigInt>,
    coverage: Option<f64>,
}

impl CounterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, counter: Counter, value: impl Into<BigInt>) -> Self {
        self.set(counter, value);
        self
    }

    pub fn with_coverage(mut self, coverage: f64) -> Self {
        self.coverage = Some(coverage);
        self
    }

    pub fn set(&mut self, counter: Counter, value: impl Into<BigInt>) {
        self.counters.insert(counter, value.into());
    }

    pub fn coverage(&self) -> Option<StaticCoverage> {
        self.coverage.map(StaticCoverage)
    }

    /// Parse a snapshot document:
    ///
    /// ```json
    /// {"blocks": 120, "orphans": "3", "time_elapsed": 60, "reconciliation_coverage": 0.25}
    /// ```
    ///
    /// Counter values may be JSON integers or decimal strings (for values
    /// beyond 64 bits). Unknown keys are rejected.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(raw).context("counter snapshot must be valid JSON")?;
        let map = doc
            .as_object()
            .ok_or_else(|| anyhow!("counter snapshot must be a JSON object"))?;

        let mut snapshot = CounterSnapshot::new();
        for (key, value) in map {
            if key == "reconciliation_coverage" {
                let coverage = value
                    .as_f64()
                    .ok_or_else(|| anyhow!("reconciliation_coverage must be a number"))?;
                snapshot.coverage = Some(coverage);
                continue;
            }

            let counter =
                Counter::parse(key).ok_or_else(|| anyhow!("unknown counter '{key}'"))?;
            let parsed = parse_counter_value(value)
                .with_context(|| format!("invalid value for counter '{key}'"))?;
            if parsed.sign() == Sign::Minus {
                bail!("counter '{key}' must not be negative");
            }
            snapshot.counters.insert(counter, parsed);
        }

        Ok(snapshot)
    }
}

fn parse_counter_value(value: &Value) -> Result<BigInt> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(BigInt::from(u))
            } else if let Some(i) = n.as_i64() {
                Ok(BigInt::from(i))
            } else {
                bail!("expected an integer, got {n}")
            }
        }
        Value::String(s) => BigInt::from_str(s.trim()).context("expected a decimal integer string"),
        other => bail!("expected an integer or decimal string, got {other}"),
    }
}

impl CounterSource for CounterSnapshot {
    fn get(&self, counter: Counter) -> Result<BigInt, SourceError> {
        self.counters
            .get(&counter)
            .cloned()
            .ok_or(SourceError::Uninitialized(counter))
    }
}
