//! Configuration
//!
//! Layered configuration for the registry client: built-in defaults, a global file,
//! a workspace file, then `AGENTREG__*` environment variables.

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

use crate::error::RegistryError;
use crate::logging::LoggingConfig;
use crate::transaction::WaitPolicy;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "AGENTREG";

/// Workspace-level config file name.
pub const WORKSPACE_CONFIG_FILE: &str = "agentreg.toml";

/// JSON-RPC endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_endpoint_url")]
    pub url: String,
}

fn default_endpoint_url() -> String {
    "http://localhost:8545".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
        }
    }
}

/// Registry contract settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Deployed registry address
    #[serde(default)]
    pub address: Option<Address>,

    /// JSON interface description checked at startup
    #[serde(default)]
    pub interface_path: Option<PathBuf>,
}

/// Default signer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Node-managed account used for writes
    #[serde(default)]
    pub address: Option<Address>,
}

/// Confirmation waiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_confirmations() -> u64 {
    1
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            confirmations: default_confirmations(),
        }
    }
}

impl TransactionConfig {
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            confirmations: self.confirmations,
        }
    }
}

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub registry: ContractConfig,

    #[serde(default)]
    pub signer: SignerConfig,

    #[serde(default)]
    pub transactions: TransactionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RegistryConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.endpoint.url.trim();
        if url.is_empty() {
            return Err("Endpoint URL cannot be empty".to_string());
        }
        let has_scheme = url.starts_with("http://") || url.starts_with("https://");
        let has_host = url
            .split_once("://")
            .map(|(_, rest)| !rest.is_empty() && !rest.chars().any(char::is_whitespace))
            .unwrap_or(false);
        if !has_scheme || !has_host {
            return Err(format!("Invalid endpoint URL: {}", url));
        }

        if self.transactions.confirmations == 0 {
            return Err("confirmations must be at least 1".to_string());
        }

        Ok(())
    }

    /// Registry address, required by every registry command.
    pub fn registry_address(&self) -> Result<Address, RegistryError> {
        self.registry.address.ok_or_else(|| {
            RegistryError::ConfigError(format!(
                "registry.address is not set (config file or {}__REGISTRY__ADDRESS)",
                ENV_PREFIX
            ))
        })
    }
}
