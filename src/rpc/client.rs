//! JSON-RPC 2.0 over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::{CallRequest, Endpoint, TransactionReceipt, TransactionRequest};
use crate::error::RpcError;
use crate::types::{Address, ChainId, TxHash};
use crate::util::{parse_hex_u128, parse_hex_u64, parse_hex_vec};

static RPC_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: T,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    data: Option<Value>,
}

/// HTTP JSON-RPC endpoint. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue a request whose `result` may legitimately be `null`.
    pub async fn request_optional<P, R>(&self, method: &str, params: P) -> Result<Option<R>, RpcError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = RPC_ID.fetch_add(1, Ordering::Relaxed);
        let payload = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        trace!(method, id, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        // Some providers pair an error object with a 4xx/5xx status; the object wins.
        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice::<JsonRpcResponse<R>>(&body) {
            Ok(JsonRpcResponse {
                error: Some(error), ..
            }) => Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            Ok(parsed) if status.is_success() => Ok(parsed.result),
            Err(err) if status.is_success() => Err(RpcError::Json(err)),
            _ => Err(RpcError::Http(format!("HTTP {} from {}", status, self.url))),
        }
    }

    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, RpcError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.request_optional(method, params)
            .await?
            .ok_or(RpcError::MissingResult)
    }
}

#[async_trait]
impl Endpoint for RpcClient {
    async fn chain_id(&self) -> Result<ChainId, RpcError> {
        let result: String = self.request("eth_chainId", Vec::<Value>::new()).await?;
        parse_hex_u64(&result)
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        let result: String = self.request("eth_blockNumber", Vec::<Value>::new()).await?;
        parse_hex_u64(&result)
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError> {
        let params = vec![request.to_param(), Value::String("latest".to_string())];
        let result: String = self.request("eth_call", params).await?;
        parse_hex_vec(&result)
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u128, RpcError> {
        let params = vec![request.to_param()];
        let result: String = self.request("eth_estimateGas", params).await?;
        parse_hex_u128(&result)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        let result: String = self.request("eth_gasPrice", Vec::<Value>::new()).await?;
        parse_hex_u128(&result)
    }

    async fn get_code(&self, address: &Address) -> Result<Vec<u8>, RpcError> {
        let params = vec![address.to_string(), "latest".to_string()];
        let result: String = self.request("eth_getCode", params).await?;
        parse_hex_vec(&result)
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, RpcError> {
        let params = vec![request.to_param()];
        let result: String = self.request("eth_sendTransaction", params).await?;
        Ok(result.parse()?)
    }

    async fn transaction_receipt(
        &self,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        let params = vec![tx_hash.to_string()];
        let result: Option<Value> = self
            .request_optional("eth_getTransactionReceipt", params)
            .await?;
        result.as_ref().map(TransactionReceipt::from_value).transpose()
    }
}
