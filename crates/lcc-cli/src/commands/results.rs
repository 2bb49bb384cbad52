//! `lcc results`: final verdicts of a finished run.

use anyhow::{Context, Result};
use lcc_artifacts::exit_data;
use lcc_config::UnusedKeyPolicy;
use lcc_results::{CounterSource, CoverageSource};

use super::{load_check_config, load_counters, load_outcome, RunOutcome};

pub fn run_results(
    config_paths: Vec<String>,
    counters: Option<String>,
    outcome: Option<String>,
    strict_config: bool,
) -> Result<()> {
    let policy = if strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let cfg = load_check_config(&config_paths, policy)?;

    let snapshot = counters.as_deref().map(load_counters).transpose()?;
    let coverage = snapshot.as_ref().and_then(|s| s.coverage());
    let outcome = match outcome.as_deref() {
        Some(p) => load_outcome(p)?,
        None => RunOutcome::default(),
    };

    exit_data(
        &cfg.data,
        snapshot.as_ref().map(|s| s as &dyn CounterSource),
        coverage.as_ref().map(|c| c as &dyn CoverageSource),
        outcome.error,
        outcome.end_condition,
    )
    .context("check:data failed")?;

    Ok(())
}
