//! `lcc progress` and `lcc status`: live view of a running check.

use anyhow::{Context, Result};
use lcc_config::UnusedKeyPolicy;
use lcc_results::{compute_status, CheckDataStatus, CounterSource, CoverageSource};
use lcc_status::{fetch_status, NetworkStatusClient, TipFetcher};

use super::{load_check_config, load_counters};

pub async fn run_progress(config_paths: Vec<String>, counters: String) -> Result<()> {
    let cfg = load_check_config(&config_paths, UnusedKeyPolicy::Warn)?;
    let snapshot = load_counters(&counters)?;
    let coverage = snapshot.coverage();

    let client = NetworkStatusClient::new(&cfg).context("build network status client failed")?;
    let tip = client.current_tip().await;

    let status = compute_status(
        Some(&snapshot as &dyn CounterSource),
        coverage.as_ref().map(|c| c as &dyn CoverageSource),
        tip,
    );
    print_status(&status)
}

pub async fn run_status(url: String) -> Result<()> {
    let status = fetch_status(&url).await?;
    print_status(&status)
}

fn print_status(status: &CheckDataStatus) -> Result<()> {
    let json = serde_json::to_string_pretty(status).context("serialize status failed")?;
    println!("{json}");
    Ok(())
}
