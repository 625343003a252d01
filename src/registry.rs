//! Registry facade: the seven agent operations.
//!
//! Reads delegate to the contract binding. Writes build an intent with the caller's
//! signer and run it through the orchestrator, returning the mined transaction hash.

use crate::contract::{InterfaceDescription, Permission, RegistryContract};
use crate::error::RegistryError;
use crate::network::NetworkContext;
use crate::rpc::Endpoint;
use crate::signer::Signer;
use crate::transaction::{TransactionOrchestrator, WaitPolicy};
use crate::types::{Address, AgentId, AgentRecord, ChainId, TxHash};
use std::sync::Arc;
use tracing::{debug, info};

/// Startup inputs for [`AgentRegistry::connect`].
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Checked against the client's expected shape before anything else.
    pub interface: Option<InterfaceDescription>,
    pub wait: WaitPolicy,
}

#[derive(Clone)]
pub struct AgentRegistry {
    contract: RegistryContract,
    orchestrator: TransactionOrchestrator,
}

impl AgentRegistry {
    /// Assemble from an already resolved network context. No startup checks run.
    pub fn new(
        endpoint: Arc<dyn Endpoint>,
        address: Address,
        network: NetworkContext,
        wait: WaitPolicy,
    ) -> Self {
        Self {
            contract: RegistryContract::new(endpoint.clone(), address),
            orchestrator: TransactionOrchestrator::new(endpoint, network, wait),
        }
    }

    /// Verify the interface description (if given), confirm the registry is deployed
    /// and resolve the network. Fails fast on any mismatch.
    pub async fn connect(
        endpoint: Arc<dyn Endpoint>,
        address: Address,
        options: ConnectOptions,
    ) -> Result<Self, RegistryError> {
        if let Some(interface) = &options.interface {
            interface.verify()?;
            debug!("registry interface description verified");
        }

        let contract = RegistryContract::new(endpoint.clone(), address);
        contract.check_deployed().await?;

        let network = NetworkContext::resolve(endpoint.as_ref()).await?;
        info!(registry = %address, chain_id = network.chain_id(), "registry connected");

        Ok(Self {
            contract,
            orchestrator: TransactionOrchestrator::new(endpoint, network, options.wait),
        })
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn network(&self) -> NetworkContext {
        self.orchestrator.network()
    }

    /// Zero-value record (`created == false`) for ids never created.
    pub async fn get_agent(&self, id: &AgentId) -> Result<AgentRecord, RegistryError> {
        self.contract.get_agent(id).await
    }

    pub async fn agent_exists(&self, id: &AgentId) -> Result<bool, RegistryError> {
        Ok(self.get_agent(id).await?.created)
    }

    pub async fn is_enabled(&self, id: &AgentId) -> Result<bool, RegistryError> {
        self.contract.is_enabled(id).await
    }

    /// `chain_ids` must be non-empty.
    pub async fn create_agent(
        &self,
        signer: Arc<dyn Signer>,
        id: &AgentId,
        reference: &str,
        chain_ids: &[ChainId],
    ) -> Result<TxHash, RegistryError> {
        require_chain_ids(chain_ids)?;
        let intent = self
            .contract
            .connect(signer)
            .create_agent(id, reference, chain_ids)?;
        self.orchestrator.execute(intent).await
    }

    /// Arguments go to the contract unchecked; it decides what an update may contain.
    pub async fn update_agent(
        &self,
        signer: Arc<dyn Signer>,
        id: &AgentId,
        reference: &str,
        chain_ids: &[ChainId],
    ) -> Result<TxHash, RegistryError> {
        let intent = self
            .contract
            .connect(signer)
            .update_agent(id, reference, chain_ids)?;
        self.orchestrator.execute(intent).await
    }

    pub async fn enable_agent(
        &self,
        signer: Arc<dyn Signer>,
        id: &AgentId,
    ) -> Result<TxHash, RegistryError> {
        let intent = self
            .contract
            .connect(signer)
            .enable_agent(id, Permission::Owner)?;
        self.orchestrator.execute(intent).await
    }

    pub async fn disable_agent(
        &self,
        signer: Arc<dyn Signer>,
        id: &AgentId,
    ) -> Result<TxHash, RegistryError> {
        let intent = self
            .contract
            .connect(signer)
            .disable_agent(id, Permission::Owner)?;
        self.orchestrator.execute(intent).await
    }
}

fn require_chain_ids(chain_ids: &[ChainId]) -> Result<(), RegistryError> {
    if chain_ids.is_empty() {
        return Err(RegistryError::InvalidInput(
            "at least one chain id is required".to_string(),
        ));
    }
    Ok(())
}
