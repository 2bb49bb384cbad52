use serde::{Deserialize, Serialize};

/// Request timeout applied to every call against the ledger API.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Network the checker is pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkIdentifier {
    pub blockchain: String,
    pub network: String,
}

/// `data:` section. Only the keys read by the results layer live here; the
/// sync and storage engines own the rest of their configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Balances are not computed at all; balance and reconciliation checks
    /// cannot be exercised.
    pub balance_tracking_disabled: bool,
    /// Computed balances are never compared against live balances.
    pub reconciliation_disabled: bool,
    /// Reconciliation failures are logged instead of stopping the run.
    pub ignore_reconciliation_error: bool,
    /// Where the final results JSON is written. Empty means "do not write".
    pub results_output_file: String,
}

/// Top-level check:data configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Base URL of the ledger API implementation under test.
    pub online_url: String,
    pub network: NetworkIdentifier,
    pub http_timeout_secs: u64,
    pub data: DataConfig,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            online_url: "http://localhost:8080".to_string(),
            network: NetworkIdentifier::default(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            data: DataConfig::default(),
        }
    }
}
