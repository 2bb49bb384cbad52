//! lcc-status
//!
//! HTTP boundary of the checker:
//! - [`NetworkStatusClient`] asks the implementation under test for its
//!   current tip (`POST /network/status`).
//! - [`fetch_status`] reads the live [`CheckDataStatus`] published by another
//!   running checker.
//!
//! Results are handed to `lcc-results` as plain values; nothing here computes
//! verdicts.

use std::time::Duration;

use async_trait::async_trait;
use lcc_config::{CheckConfig, NetworkIdentifier};
use lcc_results::CheckDataStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from the HTTP boundary.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Network or transport failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("api error status={status}{}: {message}", fmt_code(.code))]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },
    /// A response payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The client could not be built from configuration.
    #[error("config error: {0}")]
    Config(String),
}

fn fmt_code(code: &Option<i64>) -> String {
    code.map(|c| format!(" code={c}")).unwrap_or_default()
}

/// Source of the remote tip index.
#[async_trait]
pub trait TipFetcher: Send + Sync {
    async fn current_tip(&self) -> Result<i64, StatusError>;
}

#[derive(Debug, Serialize)]
struct NetworkRequest<'a> {
    network_identifier: &'a NetworkIdentifier,
}

#[derive(Debug, Deserialize)]
struct NetworkStatusResponse {
    current_block_identifier: BlockIdentifier,
}

#[derive(Debug, Deserialize)]
struct BlockIdentifier {
    index: i64,
}

/// Error body returned by the ledger API on failure.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Client for `/network/status` of the implementation under test.
#[derive(Debug, Clone)]
pub struct NetworkStatusClient {
    http: reqwest::Client,
    base_url: String,
    network: NetworkIdentifier,
}

impl NetworkStatusClient {
    pub fn new(cfg: &CheckConfig) -> Result<Self, StatusError> {
        Self::new_with_base_url(cfg, cfg.online_url.clone())
    }

    pub fn new_with_base_url(cfg: &CheckConfig, base_url: String) -> Result<Self, StatusError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()
            .map_err(|e| StatusError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            network: cfg.network.clone(),
        })
    }

    fn build_network_status_url(&self) -> String {
        format!("{}/network/status", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TipFetcher for NetworkStatusClient {
    async fn current_tip(&self) -> Result<i64, StatusError> {
        let url = self.build_network_status_url();
        debug!(%url, blockchain = %self.network.blockchain, network = %self.network.network, "fetching network status");

        let resp = self
            .http
            .post(url)
            .json(&NetworkRequest {
                network_identifier: &self.network,
            })
            .send()
            .await
            .map_err(|e| StatusError::Transport(e.to_string()))?;

        let body: NetworkStatusResponse = decode(resp).await?;
        Ok(body.current_block_identifier.index)
    }
}

/// Fetch the status document a running checker publishes at `url`.
pub async fn fetch_status(url: &str) -> Result<CheckDataStatus, StatusError> {
    let resp = reqwest::get(url).await.map_err(|e| {
        StatusError::Transport(format!("{e}: unable to fetch check:data status"))
    })?;

    decode(resp).await.map_err(|e| match e {
        StatusError::Decode(msg) => {
            StatusError::Decode(format!("{msg}: unable to fetch check:data status"))
        }
        StatusError::Api {
            status,
            code,
            message,
        } => StatusError::Api {
            status,
            code,
            message: format!("{message}: unable to fetch check:data status"),
        },
        other => other,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, StatusError> {
    let status = resp.status();
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| StatusError::Transport(e.to_string()))?;

    if !status.is_success() {
        let body: ApiErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        let message = body
            .message
            .unwrap_or_else(|| String::from_utf8_lossy(&bytes).trim().to_string());
        return Err(StatusError::Api {
            status: status.as_u16(),
            code: body.code,
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| StatusError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_status_url_trims_trailing_slash() {
        let cfg = CheckConfig::default();
        let client =
            NetworkStatusClient::new_with_base_url(&cfg, "http://node:8080/".to_string()).unwrap();
        assert_eq!(
            client.build_network_status_url(),
            "http://node:8080/network/status"
        );
    }

    #[test]
    fn api_error_display_includes_code_when_known() {
        let with_code = StatusError::Api {
            status: 500,
            code: Some(12),
            message: "network not found".to_string(),
        };
        assert_eq!(
            with_code.to_string(),
            "api error status=500 code=12: network not found"
        );

        let without = StatusError::Api {
            status: 502,
            code: None,
            message: "bad gateway".to_string(),
        };
        assert_eq!(without.to_string(), "api error status=502: bad gateway");
    }

    #[test]
    fn request_body_wraps_network_identifier() {
        let network = NetworkIdentifier {
            blockchain: "Bitcoin".to_string(),
            network: "Mainnet".to_string(),
        };
        let body = serde_json::to_value(NetworkRequest {
            network_identifier: &network,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "network_identifier": {"blockchain": "Bitcoin", "network": "Mainnet"}
            })
        );
    }
}
