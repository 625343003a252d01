//! CLI Tooling
//!
//! `agentreg` subcommands map one-to-one onto registry facade operations.

use crate::config::{ConfigLoader, RegistryConfig};
use crate::contract::InterfaceDescription;
use crate::error::RegistryError;
use crate::registry::{AgentRegistry, ConnectOptions};
use crate::rpc::{Endpoint, RpcClient};
use crate::signer::{NodeSigner, Signer};
use crate::types::{Address, AgentId, AgentRecord, ChainId, TxHash};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Agent Registry CLI - manage agents in an on-chain registry
#[derive(Parser)]
#[command(name = "agentreg")]
#[command(about = "Create, update, enable and query agents in an on-chain registry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory searched for agentreg.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show an agent record
    Get { id: AgentId },
    /// Report whether an agent has been created
    Exists { id: AgentId },
    /// Report whether an agent is enabled
    Enabled { id: AgentId },
    /// Create an agent owned by the signer
    Create {
        id: AgentId,
        /// Metadata reference (e.g. ipfs://...)
        #[arg(long)]
        reference: String,
        /// Chain ids the agent operates on, comma separated
        #[arg(long = "chain-ids", value_delimiter = ',', required = true)]
        chain_ids: Vec<ChainId>,
        /// Signer address (overrides signer.address)
        #[arg(long)]
        from: Option<Address>,
    },
    /// Replace an agent's metadata reference and chain ids
    Update {
        id: AgentId,
        #[arg(long)]
        reference: String,
        #[arg(long = "chain-ids", value_delimiter = ',', required = true)]
        chain_ids: Vec<ChainId>,
        #[arg(long)]
        from: Option<Address>,
    },
    /// Enable an agent with owner permission
    Enable {
        id: AgentId,
        #[arg(long)]
        from: Option<Address>,
    },
    /// Disable an agent with owner permission
    Disable {
        id: AgentId,
        #[arg(long)]
        from: Option<Address>,
    },
    /// Run startup checks against the configured endpoint and registry
    Check,
}

/// CLI context: loaded configuration plus the runtime commands execute on.
pub struct CliContext {
    config: RegistryConfig,
    runtime: tokio::runtime::Runtime,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, RegistryError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(config)
    }

    pub fn with_config(config: RegistryConfig) -> Result<Self, RegistryError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            RegistryError::ConfigError(format!("Failed to create runtime: {}", e))
        })?;
        Ok(Self { config, runtime })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Fold logging flags into the loaded config.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        let logging = &mut self.config.logging;
        if cli.verbose {
            logging.level = "debug".to_string();
        }
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &cli.log_file {
            logging.file = Some(file.clone());
        }
    }

    /// Execute a command and render its output.
    pub fn execute(&self, command: &Commands, format: OutputFormat) -> Result<String, RegistryError> {
        self.runtime.block_on(self.execute_async(command, format))
    }

    async fn connect(&self) -> Result<(Arc<dyn Endpoint>, AgentRegistry), RegistryError> {
        let address = self.config.registry_address()?;
        let interface = self
            .config
            .registry
            .interface_path
            .as_deref()
            .map(InterfaceDescription::from_path)
            .transpose()?;

        let endpoint: Arc<dyn Endpoint> = Arc::new(RpcClient::new(self.config.endpoint.url.clone()));
        let options = ConnectOptions {
            interface,
            wait: self.config.transactions.wait_policy(),
        };
        let registry = AgentRegistry::connect(endpoint.clone(), address, options).await?;
        Ok((endpoint, registry))
    }

    fn signer(
        &self,
        endpoint: Arc<dyn Endpoint>,
        from: Option<Address>,
    ) -> Result<Arc<dyn Signer>, RegistryError> {
        let address = from.or(self.config.signer.address).ok_or_else(|| {
            RegistryError::ConfigError(
                "no signer address: pass --from or set signer.address".to_string(),
            )
        })?;
        Ok(Arc::new(NodeSigner::new(address, endpoint)))
    }

    async fn execute_async(
        &self,
        command: &Commands,
        format: OutputFormat,
    ) -> Result<String, RegistryError> {
        let (endpoint, registry) = self.connect().await?;

        match command {
            Commands::Get { id } => {
                let record = registry.get_agent(id).await?;
                Ok(format_record(id, &record, format))
            }
            Commands::Exists { id } => {
                let exists = registry.agent_exists(id).await?;
                Ok(format_flag(id, "exists", exists, format))
            }
            Commands::Enabled { id } => {
                let enabled = registry.is_enabled(id).await?;
                Ok(format_flag(id, "enabled", enabled, format))
            }
            Commands::Create {
                id,
                reference,
                chain_ids,
                from,
            } => {
                let signer = self.signer(endpoint, *from)?;
                let tx_hash = registry
                    .create_agent(signer, id, reference, chain_ids)
                    .await?;
                info!(agent_id = %id, %tx_hash, "agent created");
                Ok(format_tx("create", id, &tx_hash, format))
            }
            Commands::Update {
                id,
                reference,
                chain_ids,
                from,
            } => {
                let signer = self.signer(endpoint, *from)?;
                let tx_hash = registry
                    .update_agent(signer, id, reference, chain_ids)
                    .await?;
                Ok(format_tx("update", id, &tx_hash, format))
            }
            Commands::Enable { id, from } => {
                let signer = self.signer(endpoint, *from)?;
                let tx_hash = registry.enable_agent(signer, id).await?;
                Ok(format_tx("enable", id, &tx_hash, format))
            }
            Commands::Disable { id, from } => {
                let signer = self.signer(endpoint, *from)?;
                let tx_hash = registry.disable_agent(signer, id).await?;
                Ok(format_tx("disable", id, &tx_hash, format))
            }
            Commands::Check => Ok(match format {
                OutputFormat::Json => json!({
                    "ok": true,
                    "registry": registry.address(),
                    "chain_id": registry.network().chain_id(),
                })
                .to_string(),
                OutputFormat::Text => format!(
                    "Registry {} reachable on chain {}",
                    registry.address(),
                    registry.network().chain_id()
                ),
            }),
        }
    }
}

fn format_record(id: &AgentId, record: &AgentRecord, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({
            "agent_id": id,
            "created": record.created,
            "owner": record.owner,
            "version": record.version,
            "metadata": record.metadata,
            "chain_ids": record.chain_ids,
        })
        .to_string(),
        OutputFormat::Text => {
            if !record.created {
                return format!("Agent {} not found", id);
            }
            let chains: Vec<String> = record.chain_ids.iter().map(|c| c.to_string()).collect();
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Field", "Value"]);
            table.add_row(vec!["Agent".to_string(), id.to_string()]);
            table.add_row(vec!["Owner".to_string(), record.owner.to_string()]);
            table.add_row(vec!["Version".to_string(), record.version.to_string()]);
            table.add_row(vec!["Metadata".to_string(), record.metadata.clone()]);
            table.add_row(vec!["Chains".to_string(), chains.join(", ")]);
            table.to_string()
        }
    }
}

fn format_flag(id: &AgentId, name: &str, value: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({ "agent_id": id, name: value }).to_string(),
        OutputFormat::Text => format!("{}: {}", name, value),
    }
}

fn format_tx(action: &str, id: &AgentId, tx_hash: &TxHash, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({
            "action": action,
            "agent_id": id,
            "tx_hash": tx_hash,
        })
        .to_string(),
        OutputFormat::Text => format!("{} {}: {}", action, id, tx_hash),
    }
}
