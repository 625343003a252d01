//! Signer capability.
//!
//! A signer is bound to one address and can authorize and broadcast a priced
//! transaction. Key handling lives outside this crate.

use crate::error::RpcError;
use crate::rpc::{Endpoint, TransactionRequest};
use crate::types::{Address, TxHash};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Signer: Send + Sync {
    /// Address every transaction from this signer is sent from.
    fn address(&self) -> Address;

    /// Sign and broadcast. Returns once the endpoint has accepted the transaction.
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, RpcError>;
}

/// Signer backed by an account the node manages (`eth_sendTransaction`).
#[derive(Clone)]
pub struct NodeSigner {
    address: Address,
    endpoint: Arc<dyn Endpoint>,
}

impl NodeSigner {
    pub fn new(address: Address, endpoint: Arc<dyn Endpoint>) -> Self {
        Self { address, endpoint }
    }
}

#[async_trait]
impl Signer for NodeSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, RpcError> {
        if request.from == self.address {
            self.endpoint.send_transaction(request).await
        } else {
            let mut request = request.clone();
            request.from = self.address;
            self.endpoint.send_transaction(&request).await
        }
    }
}
