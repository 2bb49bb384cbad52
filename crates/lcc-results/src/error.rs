//! Terminal errors of a check:data run, classified once at the boundary.
//!
//! Collaborators (fetcher, syncer, storage, reconciler) raise their own error
//! types; the caller maps each into one of these variants before handing it
//! to the verdict engine. Everything that does not fit a known class becomes
//! [`CheckError::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure kinds raised by the balance / block storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageErrorKind {
    // Balance storage family.
    NegativeBalance,
    InvalidLiveBalance,
    BalancePruned,
    BlockNil,
    AccountMissing,
    InvalidChangeValue,
    InvalidValue,

    // Block and key/value storage.
    HeadBlockNotFound,
    BlockNotFound,
    DuplicateBlockHash,
    DuplicateTransactionHash,
    Database,
}

impl StorageErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageErrorKind::NegativeBalance => "negative balance",
            StorageErrorKind::InvalidLiveBalance => "invalid live balance",
            StorageErrorKind::BalancePruned => "balance pruned",
            StorageErrorKind::BlockNil => "block nil",
            StorageErrorKind::AccountMissing => "account missing",
            StorageErrorKind::InvalidChangeValue => "invalid change value",
            StorageErrorKind::InvalidValue => "invalid value",
            StorageErrorKind::HeadBlockNotFound => "head block not found",
            StorageErrorKind::BlockNotFound => "block not found",
            StorageErrorKind::DuplicateBlockHash => "duplicate block hash",
            StorageErrorKind::DuplicateTransactionHash => "duplicate transaction hash",
            StorageErrorKind::Database => "database error",
        }
    }

    /// True for failures raised while computing or storing account balances.
    pub fn is_balance_storage(&self) -> bool {
        matches!(
            self,
            StorageErrorKind::NegativeBalance
                | StorageErrorKind::InvalidLiveBalance
                | StorageErrorKind::BalancePruned
                | StorageErrorKind::BlockNil
                | StorageErrorKind::AccountMissing
                | StorageErrorKind::InvalidChangeValue
                | StorageErrorKind::InvalidValue
        )
    }
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error that ended a check:data run.
///
/// Serialized with a `class` tag so a run outcome can be handed over as JSON:
/// `{"class": "storage", "kind": "negative_balance", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum CheckError {
    /// Transport failure or non-success response from the ledger API.
    #[error("fetch failed: {message}")]
    Fetch { message: String },

    #[error("network not supported: {message}")]
    NetworkNotSupported { message: String },

    /// Raised by the syncer when it cannot read the network status.
    #[error("unable to get network status: {message}")]
    NetworkStatus { message: String },

    /// Raised by the syncer when it cannot fetch a block.
    #[error("unable to fetch block: {message}")]
    FetchBlock { message: String },

    /// A response did not pass schema / assertion checks.
    #[error("response assertion failed: {message}")]
    Assertion { message: String },

    /// The syncer could not connect blocks into a canonical chain.
    #[error("syncer failed: {message}")]
    Syncer { message: String },

    #[error("{kind}: {message}")]
    Storage {
        kind: StorageErrorKind,
        message: String,
    },

    /// Computed balance did not match the live balance.
    #[error("reconciliation failure: {message}")]
    Reconciliation { message: String },

    /// Anything the classifiers above do not recognise.
    #[error("{message}")]
    Other { message: String },
}

impl CheckError {
    pub fn other(message: impl Into<String>) -> Self {
        CheckError::Other {
            message: message.into(),
        }
    }

    pub fn storage(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        CheckError::Storage {
            kind,
            message: message.into(),
        }
    }

    /// Stable class name, matching the serde tag.
    pub fn class(&self) -> &'static str {
        match self {
            CheckError::Fetch { .. } => "fetch",
            CheckError::NetworkNotSupported { .. } => "network_not_supported",
            CheckError::NetworkStatus { .. } => "network_status",
            CheckError::FetchBlock { .. } => "fetch_block",
            CheckError::Assertion { .. } => "assertion",
            CheckError::Syncer { .. } => "syncer",
            CheckError::Storage { .. } => "storage",
            CheckError::Reconciliation { .. } => "reconciliation",
            CheckError::Other { .. } => "other",
        }
    }

    /// The implementation did not service a request.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            CheckError::Fetch { .. }
                | CheckError::NetworkNotSupported { .. }
                | CheckError::NetworkStatus { .. }
                | CheckError::FetchBlock { .. }
        )
    }

    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, CheckError::Assertion { .. })
    }

    /// Network-status and fetch-block failures are raised by the syncer, so
    /// they count against block syncing as well as request/response.
    pub fn is_syncer_failure(&self) -> bool {
        matches!(
            self,
            CheckError::Syncer { .. } | CheckError::NetworkStatus { .. } | CheckError::FetchBlock { .. }
        )
    }

    pub fn storage_kind(&self) -> Option<StorageErrorKind> {
        match self {
            CheckError::Storage { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_balance_storage_failure(&self) -> bool {
        self.storage_kind()
            .is_some_and(|kind| kind.is_balance_storage())
    }

    pub fn is_reconciliation_failure(&self) -> bool {
        matches!(self, CheckError::Reconciliation { .. })
    }
}
