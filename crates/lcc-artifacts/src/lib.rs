//! lcc-artifacts
//!
//! On-disk outputs of a check:data run. Files are written through a sibling
//! temp file and renamed into place, so readers never see a partial document.

use anyhow::{Context, Result};
use lcc_config::DataConfig;
use lcc_results::{
    compute_results, CheckError, CounterSource, CoverageSource, EndCondition, RunResult,
};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
/// Missing parent directories are created.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("create output dir failed: {}", parent.display()))?;

    let json = serde_json::to_string_pretty(value).context("serialize json failed")?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file failed: {}", parent.display()))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.write_all(b"\n"))
        .with_context(|| format!("write temp file failed: {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync temp file failed: {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("persist failed: {}", path.display()))?;

    Ok(())
}

/// Persist the final results to `path`. An empty path disables the write.
///
/// Failures are logged and swallowed: losing the file must not change the
/// outcome of the run.
pub fn persist_results(results: &RunResult, path: &str) {
    if path.is_empty() {
        return;
    }

    match write_json_atomic(Path::new(path), results) {
        Ok(()) => info!(path, "results written"),
        Err(e) => warn!(path, error = %format!("{e:#}"), "unable to save results"),
    }
}

/// Final step of a check:data run: compute the results, print them, persist
/// them to `data.results_output_file`, then hand the terminal error back so
/// the caller can exit non-zero.
pub fn exit_data(
    cfg: &DataConfig,
    counters: Option<&dyn CounterSource>,
    coverage: Option<&dyn CoverageSource>,
    err: Option<CheckError>,
    end_condition: Option<EndCondition>,
) -> Result<RunResult, CheckError> {
    let results = compute_results(cfg, err.as_ref(), counters, coverage, end_condition);
    results.print();
    persist_results(&results, &cfg.results_output_file);

    match err {
        Some(e) => Err(e),
        None => Ok(results),
    }
}
