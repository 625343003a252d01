//! Transaction Lifecycle
//!
//! A write runs as a single intent: estimate, inflate, submit, wait for mining.
//! Each intent carries its own state; nothing is shared between concurrent writes.

mod fees;
mod orchestrator;

pub use fees::{
    inflate, FeeEstimator, FeeQuote, GAS_LIMIT_MULTIPLIER_BPS, GAS_PRICE_MULTIPLIER_BPS,
};
pub use orchestrator::{TransactionOrchestrator, TxStage, WaitPolicy};

use crate::rpc::{CallRequest, TransactionRequest};
use crate::signer::Signer;
use crate::types::{Address, ChainId};
use std::fmt;
use std::sync::Arc;

/// One pending write: method, encoded call and the signer that performs it.
#[derive(Clone)]
pub struct TransactionIntent {
    pub method: &'static str,
    pub to: Address,
    pub data: Vec<u8>,
    pub signer: Arc<dyn Signer>,
}

impl TransactionIntent {
    /// The exact call as the network will execute it, for estimation.
    pub fn call_request(&self) -> CallRequest {
        CallRequest {
            from: Some(self.signer.address()),
            to: self.to,
            data: self.data.clone(),
        }
    }

    pub fn priced(&self, quote: &FeeQuote, chain_id: ChainId) -> TransactionRequest {
        TransactionRequest {
            from: self.signer.address(),
            to: self.to,
            data: self.data.clone(),
            gas: quote.gas_limit,
            gas_price: quote.gas_price,
            chain_id,
        }
    }
}

impl fmt::Debug for TransactionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionIntent")
            .field("method", &self.method)
            .field("to", &self.to)
            .field("from", &self.signer.address())
            .field("data_len", &self.data.len())
            .finish()
    }
}
