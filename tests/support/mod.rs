//! In-memory registry chain used by the integration tests.
//!
//! Executes registry calls against local state: estimation reverts for calls the
//! contract would reject, submissions are recorded, receipts can be held back or
//! made to fail.

#![allow(dead_code)]

use agent_registry::contract::abi::{
    createAgentCall, disableAgentCall, enableAgentCall, getAgentCall, isEnabledCall,
    updateAgentCall,
};
use agent_registry::contract::interface::REGISTRY_METHODS;
use agent_registry::rpc::{CallRequest, Endpoint, TransactionReceipt, TransactionRequest};
use agent_registry::transaction::WaitPolicy;
use agent_registry::types::U256;
use agent_registry::{Address, AgentRegistry, NetworkContext, NodeSigner, RpcError, Signer, TxHash};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CHAIN_ID: u64 = 137;
pub const RAW_GAS: u128 = 50_000;
pub const RAW_GAS_PRICE: u128 = 2_000_000_000;

pub fn registry_address() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn alice() -> Address {
    Address::repeat_byte(0x11)
}

pub fn bob() -> Address {
    Address::repeat_byte(0x22)
}

#[derive(Debug, Clone)]
struct StoredAgent {
    owner: Address,
    version: u64,
    metadata: String,
    chain_ids: Vec<u64>,
}

#[derive(Default)]
struct ChainState {
    agents: HashMap<U256, StoredAgent>,
    enabled: HashSet<U256>,
    submissions: Vec<TransactionRequest>,
    receipts: HashMap<TxHash, (TransactionReceipt, u32)>,
    block: u64,
    estimate_calls: usize,
}

/// Failure and latency knobs.
#[derive(Debug, Clone, Default)]
pub struct ChainBehavior {
    /// `eth_getTransactionReceipt` returns null this many times before the receipt.
    pub pending_polls: u32,
    pub fail_send: bool,
    pub fail_receipt: bool,
    pub fail_gas_price: bool,
    pub revert_on_mine: bool,
    pub undeployed: bool,
    /// Advance the head by one block on every `eth_blockNumber`.
    pub advance_on_block_query: bool,
}

pub struct FakeChain {
    state: Mutex<ChainState>,
    behavior: ChainBehavior,
}

fn revert(message: &str) -> RpcError {
    RpcError::Rpc {
        code: 3,
        message: format!("execution reverted: {}", message),
        data: None,
    }
}

impl FakeChain {
    pub fn new() -> Arc<Self> {
        Self::with_behavior(ChainBehavior::default())
    }

    pub fn with_behavior(behavior: ChainBehavior) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ChainState {
                block: 100,
                ..ChainState::default()
            }),
            behavior,
        })
    }

    pub fn submissions(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn submission_count(&self) -> usize {
        self.state.lock().unwrap().submissions.len()
    }

    pub fn estimate_calls(&self) -> usize {
        self.state.lock().unwrap().estimate_calls
    }

    pub fn head(&self) -> u64 {
        self.state.lock().unwrap().block
    }

    /// Validate a write the way the contract would and describe its effect.
    fn check(state: &ChainState, from: Option<Address>, data: &[u8]) -> Result<Effect, RpcError> {
        if data.len() < 4 {
            return Err(revert("no selector"));
        }
        let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];
        let is_owner = |agent: &StoredAgent| from.map(|f| f == agent.owner).unwrap_or(false);
        let existing_owned = |id: &U256| -> Result<(), RpcError> {
            let agent = state
                .agents
                .get(id)
                .ok_or_else(|| revert("agent does not exist"))?;
            if !is_owner(agent) {
                return Err(revert("caller is not owner"));
            }
            Ok(())
        };

        if selector == createAgentCall::SELECTOR {
            let call = createAgentCall::abi_decode(data, true).map_err(bad_calldata)?;
            if state.agents.contains_key(&call.id) {
                return Err(revert("agent already exists"));
            }
            if call.chainIds.is_empty() {
                return Err(revert("chain ids required"));
            }
            Ok(Effect::Create {
                id: call.id,
                agent: StoredAgent {
                    owner: call.owner,
                    version: 1,
                    metadata: call.metadata,
                    chain_ids: to_chain_ids(&call.chainIds),
                },
            })
        } else if selector == updateAgentCall::SELECTOR {
            let call = updateAgentCall::abi_decode(data, true).map_err(bad_calldata)?;
            existing_owned(&call.id)?;
            if call.chainIds.is_empty() {
                return Err(revert("chain ids required"));
            }
            Ok(Effect::Update {
                id: call.id,
                metadata: call.metadata,
                chain_ids: to_chain_ids(&call.chainIds),
            })
        } else if selector == enableAgentCall::SELECTOR || selector == disableAgentCall::SELECTOR {
            let (id, permission, enabled) = if selector == enableAgentCall::SELECTOR {
                let call = enableAgentCall::abi_decode(data, true).map_err(bad_calldata)?;
                (call.id, call.permission, true)
            } else {
                let call = disableAgentCall::abi_decode(data, true).map_err(bad_calldata)?;
                (call.id, call.permission, false)
            };
            existing_owned(&id)?;
            if permission != 1 {
                return Err(revert("unsupported permission"));
            }
            Ok(Effect::SetEnabled { id, enabled })
        } else {
            Err(revert("unknown selector"))
        }
    }

    fn apply(state: &mut ChainState, effect: Effect) {
        match effect {
            Effect::Create { id, agent } => {
                state.agents.insert(id, agent);
            }
            Effect::Update {
                id,
                metadata,
                chain_ids,
            } => {
                if let Some(agent) = state.agents.get_mut(&id) {
                    agent.metadata = metadata;
                    agent.chain_ids = chain_ids;
                    agent.version += 1;
                }
            }
            Effect::SetEnabled { id, enabled } => {
                if enabled {
                    state.enabled.insert(id);
                } else {
                    state.enabled.remove(&id);
                }
            }
        }
    }
}

enum Effect {
    Create { id: U256, agent: StoredAgent },
    Update { id: U256, metadata: String, chain_ids: Vec<u64> },
    SetEnabled { id: U256, enabled: bool },
}

fn bad_calldata(err: alloy_sol_types::Error) -> RpcError {
    revert(&format!("bad calldata: {}", err))
}

fn to_chain_ids(words: &[U256]) -> Vec<u64> {
    words.iter().map(|word| word.to::<u64>()).collect()
}

#[async_trait]
impl Endpoint for FakeChain {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        Ok(CHAIN_ID)
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        let mut state = self.state.lock().unwrap();
        if self.behavior.advance_on_block_query {
            state.block += 1;
        }
        Ok(state.block)
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError> {
        let state = self.state.lock().unwrap();
        let data = &request.data;

        if let Ok(call) = getAgentCall::abi_decode(data, true) {
            let encoded = match state.agents.get(&call.id) {
                Some(agent) => (
                    true,
                    agent.owner,
                    U256::from(agent.version),
                    agent.metadata.clone(),
                    agent.chain_ids.iter().map(|c| U256::from(*c)).collect::<Vec<_>>(),
                )
                    .abi_encode_params(),
                None => (false, Address::ZERO, U256::ZERO, String::new(), Vec::<U256>::new())
                    .abi_encode_params(),
            };
            Ok(encoded)
        } else if let Ok(call) = isEnabledCall::abi_decode(data, true) {
            Ok((state.enabled.contains(&call.id),).abi_encode_params())
        } else {
            Err(revert("unknown selector"))
        }
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u128, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.estimate_calls += 1;
        Self::check(&state, request.from, &request.data)?;
        Ok(RAW_GAS)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        if self.behavior.fail_gas_price {
            return Err(RpcError::Http("HTTP 503 Service Unavailable".to_string()));
        }
        Ok(RAW_GAS_PRICE)
    }

    async fn get_code(&self, _address: &Address) -> Result<Vec<u8>, RpcError> {
        if self.behavior.undeployed {
            Ok(Vec::new())
        } else {
            Ok(vec![0x60, 0x80, 0x60, 0x40])
        }
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, RpcError> {
        if self.behavior.fail_send {
            return Err(RpcError::Rpc {
                code: -32000,
                message: "insufficient funds for gas * price + value".to_string(),
                data: None,
            });
        }

        let mut state = self.state.lock().unwrap();
        state.submissions.push(request.clone());
        state.block += 1;

        let tx_hash = nth_tx_hash(state.submissions.len());

        let outcome = Self::check(&state, Some(request.from), &request.data);
        let succeeded = match outcome {
            Ok(effect) if !self.behavior.revert_on_mine => {
                Self::apply(&mut state, effect);
                true
            }
            _ => false,
        };

        let receipt = TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: state.block,
            status: Some(succeeded),
        };
        state
            .receipts
            .insert(tx_hash, (receipt, self.behavior.pending_polls));
        Ok(tx_hash)
    }

    async fn transaction_receipt(
        &self,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        if self.behavior.fail_receipt {
            return Err(RpcError::Http("connection reset by peer".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        match state.receipts.get_mut(tx_hash) {
            Some((_, remaining)) if *remaining > 0 => {
                *remaining -= 1;
                Ok(None)
            }
            Some((receipt, _)) => Ok(Some(receipt.clone())),
            None => Ok(None),
        }
    }
}

/// Hash the chain assigns to the n-th submission (1-based).
pub fn nth_tx_hash(n: usize) -> TxHash {
    let mut hash = [0u8; 32];
    hash[24..].copy_from_slice(&(n as u64).to_be_bytes());
    TxHash::from(hash)
}

pub fn fast_wait() -> WaitPolicy {
    WaitPolicy {
        poll_interval: Duration::from_millis(1),
        confirmations: 1,
    }
}

pub fn registry_on(chain: &Arc<FakeChain>, wait: WaitPolicy) -> AgentRegistry {
    let endpoint: Arc<dyn Endpoint> = chain.clone();
    AgentRegistry::new(
        endpoint,
        registry_address(),
        NetworkContext::new(CHAIN_ID),
        wait,
    )
}

pub fn signer_on(chain: &Arc<FakeChain>, address: Address) -> Arc<dyn Signer> {
    let endpoint: Arc<dyn Endpoint> = chain.clone();
    Arc::new(NodeSigner::new(address, endpoint))
}

/// ABI document matching the client's expected interface.
pub fn registry_abi() -> serde_json::Value {
    let entries: Vec<serde_json::Value> = REGISTRY_METHODS
        .iter()
        .map(|method| {
            let params = |kinds: &[&str]| -> Vec<serde_json::Value> {
                kinds
                    .iter()
                    .map(|kind| serde_json::json!({ "name": "", "type": kind }))
                    .collect()
            };
            serde_json::json!({
                "type": "function",
                "name": method.name,
                "stateMutability": if method.outputs.is_empty() { "nonpayable" } else { "view" },
                "inputs": params(method.inputs),
                "outputs": params(method.outputs),
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}
