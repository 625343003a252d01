//! Endpoint Layer
//!
//! The `Endpoint` port describes the JSON-RPC surface the registry client depends on.
//! `RpcClient` implements it over HTTP; tests substitute an in-memory chain.

mod client;

pub use client::RpcClient;

use crate::error::RpcError;
use crate::types::{Address, ChainId, TxHash};
use crate::util::{format_hex_prefixed, format_quantity, parse_hex_u64};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Read-only contract invocation (`eth_call` / `eth_estimateGas`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Vec<u8>,
}

impl CallRequest {
    pub fn to_param(&self) -> Value {
        let mut param = json!({
            "to": self.to.to_string(),
            "data": format_hex_prefixed(&self.data),
        });
        if let Some(from) = self.from {
            param["from"] = Value::String(from.to_string());
        }
        param
    }
}

/// Fully priced write ready for `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    pub gas: u128,
    pub gas_price: u128,
    pub chain_id: ChainId,
}

impl TransactionRequest {
    pub fn to_param(&self) -> Value {
        json!({
            "from": self.from.to_string(),
            "to": self.to.to_string(),
            "data": format_hex_prefixed(&self.data),
            "gas": format_quantity(self.gas),
            "gasPrice": format_quantity(self.gas_price),
            "chainId": format_quantity(self.chain_id as u128),
        })
    }
}

/// Subset of a mined receipt the orchestrator inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    /// `None` for pre-Byzantium receipts that carry no status field.
    pub status: Option<bool>,
}

impl TransactionReceipt {
    pub fn from_value(value: &Value) -> Result<Self, RpcError> {
        let field = |name: &str| -> Result<&str, RpcError> {
            value
                .get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| RpcError::Http(format!("receipt missing field '{}'", name)))
        };

        let transaction_hash = field("transactionHash")?.parse()?;
        let block_number = parse_hex_u64(field("blockNumber")?)?;
        let status = match value.get("status").and_then(Value::as_str) {
            Some(raw) => Some(parse_hex_u64(raw)? == 1),
            None => None,
        };

        Ok(Self {
            transaction_hash,
            block_number,
            status,
        })
    }

    pub fn succeeded(&self) -> bool {
        self.status.unwrap_or(true)
    }
}

/// JSON-RPC methods the registry client relies on.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn chain_id(&self) -> Result<ChainId, RpcError>;

    async fn block_number(&self) -> Result<u64, RpcError>;

    /// Execute a call against latest state and return the raw return data.
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError>;

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u128, RpcError>;

    async fn gas_price(&self) -> Result<u128, RpcError>;

    async fn get_code(&self, address: &Address) -> Result<Vec<u8>, RpcError>;

    /// Submit through a node-managed account. Returns as soon as the node accepts it.
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, RpcError>;

    /// `Ok(None)` while the transaction is still pending.
    async fn transaction_receipt(
        &self,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, RpcError>;
}
