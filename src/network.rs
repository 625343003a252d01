//! Network identity resolved once at startup and passed explicitly.

use crate::error::RegistryError;
use crate::rpc::Endpoint;
use crate::types::ChainId;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkContext {
    chain_id: ChainId,
}

impl NetworkContext {
    pub fn new(chain_id: ChainId) -> Self {
        Self { chain_id }
    }

    /// Query the endpoint's chain id. Call once and hand the result to every
    /// component that needs it.
    pub async fn resolve(endpoint: &dyn Endpoint) -> Result<Self, RegistryError> {
        let chain_id = endpoint.chain_id().await?;
        info!(chain_id, "resolved network");
        Ok(Self { chain_id })
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}
