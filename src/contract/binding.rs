//! Typed binding over the registry contract.

use super::abi::{
    createAgentCall, disableAgentCall, enableAgentCall, getAgentCall, isEnabledCall,
    updateAgentCall,
};
use crate::error::{RegistryError, RpcError};
use crate::rpc::{CallRequest, Endpoint};
use crate::signer::Signer;
use crate::transaction::TransactionIntent;
use crate::types::{Address, AgentId, AgentRecord, ChainId, U256};
use alloy_sol_types::SolCall;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Authority an enable/disable action is performed under.
///
/// Passed to the contract verbatim as a `uint8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Owner,
}

impl Permission {
    pub fn code(self) -> u8 {
        match self {
            Permission::Owner => 1,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Owner => f.write_str("owner"),
        }
    }
}

/// Registry contract at a fixed address.
///
/// Reads go straight to the endpoint. Writes only build a `TransactionIntent` and
/// need a signer attached with [`RegistryContract::connect`].
#[derive(Clone)]
pub struct RegistryContract {
    endpoint: Arc<dyn Endpoint>,
    address: Address,
    signer: Option<Arc<dyn Signer>>,
}

impl RegistryContract {
    pub fn new(endpoint: Arc<dyn Endpoint>, address: Address) -> Self {
        Self {
            endpoint,
            address,
            signer: None,
        }
    }

    /// Copy of this binding with `signer` attached for writes.
    pub fn connect(&self, signer: Arc<dyn Signer>) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            address: self.address,
            signer: Some(signer),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn endpoint(&self) -> &Arc<dyn Endpoint> {
        &self.endpoint
    }

    pub fn signer(&self) -> Option<&Arc<dyn Signer>> {
        self.signer.as_ref()
    }

    /// Fail unless contract code is deployed at the bound address.
    pub async fn check_deployed(&self) -> Result<(), RegistryError> {
        let code = self.endpoint.get_code(&self.address).await?;
        if code.is_empty() {
            return Err(RegistryError::InterfaceMismatch(format!(
                "no contract code deployed at {}",
                self.address
            )));
        }
        Ok(())
    }

    /// `eth_call` and decode. Undecodable output is an endpoint fault: the address
    /// answered, but not as the registry.
    async fn read<C: SolCall>(&self, call: &C) -> Result<C::Return, RegistryError> {
        let request = CallRequest {
            from: None,
            to: self.address,
            data: call.abi_encode(),
        };
        let output = self.endpoint.call(&request).await?;
        Ok(C::abi_decode_returns(&output, true).map_err(RpcError::from)?)
    }

    pub async fn get_agent(&self, id: &AgentId) -> Result<AgentRecord, RegistryError> {
        let raw = self.read(&getAgentCall { id: id.as_u256() }).await?;
        let record = AgentRecord {
            created: raw.created,
            owner: raw.owner,
            version: to_u64(raw.version, "version")?,
            metadata: raw.metadata,
            chain_ids: raw
                .chainIds
                .into_iter()
                .map(|chain| to_u64(chain, "chain id"))
                .collect::<Result<_, _>>()?,
        };
        debug!(agent_id = %id, created = record.created, "getAgent");
        Ok(record)
    }

    pub async fn is_enabled(&self, id: &AgentId) -> Result<bool, RegistryError> {
        let raw = self.read(&isEnabledCall { id: id.as_u256() }).await?;
        Ok(raw.enabled)
    }

    fn intent<C: SolCall>(&self, method: &'static str, call: C) -> Result<TransactionIntent, RegistryError> {
        let signer = self
            .signer
            .clone()
            .ok_or(RegistryError::MissingSigner { method })?;
        Ok(TransactionIntent {
            method,
            to: self.address,
            data: call.abi_encode(),
            signer,
        })
    }

    /// The signer's address becomes the owner.
    pub fn create_agent(
        &self,
        id: &AgentId,
        metadata: &str,
        chain_ids: &[ChainId],
    ) -> Result<TransactionIntent, RegistryError> {
        let method = "createAgent";
        let owner = self
            .signer
            .as_ref()
            .map(|signer| signer.address())
            .ok_or(RegistryError::MissingSigner { method })?;
        let call = createAgentCall {
            id: id.as_u256(),
            owner,
            metadata: metadata.to_string(),
            chainIds: chain_words(chain_ids),
        };
        self.intent(method, call)
    }

    pub fn update_agent(
        &self,
        id: &AgentId,
        metadata: &str,
        chain_ids: &[ChainId],
    ) -> Result<TransactionIntent, RegistryError> {
        let call = updateAgentCall {
            id: id.as_u256(),
            metadata: metadata.to_string(),
            chainIds: chain_words(chain_ids),
        };
        self.intent("updateAgent", call)
    }

    pub fn enable_agent(
        &self,
        id: &AgentId,
        permission: Permission,
    ) -> Result<TransactionIntent, RegistryError> {
        let call = enableAgentCall {
            id: id.as_u256(),
            permission: permission.code(),
        };
        self.intent("enableAgent", call)
    }

    pub fn disable_agent(
        &self,
        id: &AgentId,
        permission: Permission,
    ) -> Result<TransactionIntent, RegistryError> {
        let call = disableAgentCall {
            id: id.as_u256(),
            permission: permission.code(),
        };
        self.intent("disableAgent", call)
    }
}

fn chain_words(chain_ids: &[ChainId]) -> Vec<U256> {
    chain_ids.iter().map(|id| U256::from(*id)).collect()
}

fn to_u64(value: U256, field: &str) -> Result<u64, RpcError> {
    u64::try_from(value).map_err(|_| RpcError::Decode(format!("{} {} overflows u64", field, value)))
}
