//! Command handler modules for lcc.
//!
//! Shared loaders live here; command-specific logic lives in the submodules.

pub mod results;
pub mod status;

use anyhow::{bail, Context, Result};
use lcc_config::{report_unused_keys, CheckConfig, UnusedKeyPolicy};
use lcc_results::{CheckError, CounterSnapshot, EndCondition};
use serde::Deserialize;
use std::fs;
use tracing::{info, warn};

/// Load layered config, report unused keys, and deserialize `CheckConfig`.
pub fn load_check_config(config_paths: &[String], policy: UnusedKeyPolicy) -> Result<CheckConfig> {
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = lcc_config::load_layered_yaml(&path_refs)?;

    let report = report_unused_keys(&loaded.config_json, policy)?;
    if !report.is_clean() {
        warn!(
            unused_leaf_keys = report.unused_leaf_pointers.len(),
            "CONFIG_UNUSED_KEYS"
        );
        for p in report.unused_leaf_pointers.iter().take(50) {
            warn!(unused = %p, "unused config key");
        }
    }

    let cfg = loaded.check_config()?;
    info!(config_hash = %loaded.config_hash, online_url = %cfg.online_url, "config loaded");
    Ok(cfg)
}

pub fn load_counters(path: &str) -> Result<CounterSnapshot> {
    let raw = read_text(path).with_context(|| format!("read counters failed: {path}"))?;
    CounterSnapshot::from_json_str(&raw).with_context(|| format!("parse counters failed: {path}"))
}

/// How a run ended, as handed over by the sync engine.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunOutcome {
    #[serde(default)]
    pub error: Option<CheckError>,
    #[serde(default)]
    pub end_condition: Option<EndCondition>,
}

pub fn load_outcome(path: &str) -> Result<RunOutcome> {
    let raw = read_text(path).with_context(|| format!("read outcome failed: {path}"))?;
    let outcome: RunOutcome =
        serde_json::from_str(&raw).with_context(|| format!("parse outcome failed: {path}"))?;
    if outcome.error.is_some() && outcome.end_condition.is_some() {
        bail!("outcome cannot carry both error and end_condition: {path}");
    }
    Ok(outcome)
}

/// Read a UTF-8 text file, tolerating a leading BOM.
fn read_text(path: &str) -> Result<String> {
    let bytes = fs::read(path)?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    String::from_utf8(bytes.to_vec()).context("file must be UTF-8 text")
}
