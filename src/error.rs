//! Error types
//!
//! `RpcError` covers transport and protocol faults raised by the endpoint client,
//! including contract responses that do not decode.
//! `RegistryError` is the public taxonomy surfaced by the registry facade; write
//! failures are split by the stage that produced them so callers can decide whether
//! to re-submit with a fresh estimate.

use crate::types::TxHash;
use thiserror::Error;

/// Failure talking to the JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    #[error("RPC response missing result")]
    MissingResult,

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Undecodable contract response: {0}")]
    Decode(String),
}

impl From<alloy_primitives::hex::FromHexError> for RpcError {
    fn from(err: alloy_primitives::hex::FromHexError) -> Self {
        RpcError::InvalidHex(err.to_string())
    }
}

impl From<alloy_sol_types::Error> for RpcError {
    fn from(err: alloy_sol_types::Error) -> Self {
        RpcError::Decode(err.to_string())
    }
}

impl RpcError {
    /// True when the node reported that execution reverted.
    pub fn is_revert(&self) -> bool {
        match self {
            RpcError::Rpc { code, message, .. } => {
                *code == 3 || message.to_ascii_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}

/// Why waiting for a mined transaction failed.
#[derive(Debug, Error)]
pub enum ConfirmationFailure {
    #[error("endpoint error while waiting: {0}")]
    Endpoint(#[source] RpcError),

    #[error("transaction reverted in block {block_number}")]
    Reverted { block_number: u64 },
}

/// Errors surfaced by the registry client.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{method} requires a connected signer")]
    MissingSigner { method: &'static str },

    #[error("Gas estimation for {method} failed: {source}")]
    Estimation {
        method: &'static str,
        #[source]
        source: RpcError,
    },

    #[error("Submission of {method} failed: {source}")]
    Submission {
        method: &'static str,
        #[source]
        source: RpcError,
    },

    #[error("Confirmation of {tx_hash} failed: {reason}")]
    Confirmation {
        tx_hash: TxHash,
        #[source]
        reason: ConfirmationFailure,
    },

    #[error("Endpoint error: {0}")]
    Endpoint(#[from] RpcError),

    #[error("Registry interface mismatch: {0}")]
    InterfaceMismatch(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for RegistryError {
    fn from(err: config::ConfigError) -> Self {
        RegistryError::ConfigError(err.to_string())
    }
}
