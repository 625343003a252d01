//! Runs one write intent to completion.
//!
//! `Estimating -> Submitting -> Pending -> Confirmed`, with `Failed` reachable from
//! every non-terminal stage. There are no internal retries: a failed intent is
//! re-run by the caller as a new intent with a fresh estimate. Waiting for mining
//! has no deadline; callers that need one wrap the call in their own timeout.

use super::{FeeEstimator, TransactionIntent};
use crate::error::{ConfirmationFailure, RegistryError};
use crate::network::NetworkContext;
use crate::rpc::{Endpoint, TransactionReceipt};
use crate::types::TxHash;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Estimating,
    Submitting,
    Pending,
    Confirmed,
    Failed,
}

impl TxStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, TxStage::Confirmed | TxStage::Failed)
    }

    pub fn can_advance_to(self, next: TxStage) -> bool {
        match (self, next) {
            (TxStage::Estimating, TxStage::Submitting)
            | (TxStage::Submitting, TxStage::Pending)
            | (TxStage::Pending, TxStage::Confirmed) => true,
            (current, TxStage::Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxStage::Estimating => "estimating",
            TxStage::Submitting => "submitting",
            TxStage::Pending => "pending",
            TxStage::Confirmed => "confirmed",
            TxStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How to wait for mining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    /// Blocks that must include the transaction, counting its own block.
    pub confirmations: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            confirmations: 1,
        }
    }
}

/// Stage tracker for a single run.
struct IntentRun {
    method: &'static str,
    stage: TxStage,
}

impl IntentRun {
    fn new(method: &'static str) -> Self {
        debug!(method, stage = %TxStage::Estimating, "intent started");
        Self {
            method,
            stage: TxStage::Estimating,
        }
    }

    fn advance(&mut self, next: TxStage) {
        debug_assert!(self.stage.can_advance_to(next));
        debug!(method = self.method, from = %self.stage, to = %next, "intent stage");
        self.stage = next;
    }

    fn fail(&mut self, err: RegistryError) -> RegistryError {
        warn!(method = self.method, stage = %self.stage, error = %err, "intent failed");
        self.advance(TxStage::Failed);
        err
    }
}

#[derive(Clone)]
pub struct TransactionOrchestrator {
    endpoint: Arc<dyn Endpoint>,
    estimator: FeeEstimator,
    network: NetworkContext,
    wait: WaitPolicy,
}

impl TransactionOrchestrator {
    pub fn new(endpoint: Arc<dyn Endpoint>, network: NetworkContext, wait: WaitPolicy) -> Self {
        Self {
            estimator: FeeEstimator::new(endpoint.clone()),
            endpoint,
            network,
            wait,
        }
    }

    pub fn network(&self) -> NetworkContext {
        self.network
    }

    /// Estimate, submit and wait. Returns the hash only once the transaction is mined.
    pub async fn execute(&self, intent: TransactionIntent) -> Result<TxHash, RegistryError> {
        let mut run = IntentRun::new(intent.method);

        let quote = match self.estimator.estimate(&intent).await {
            Ok(quote) => quote,
            Err(err) => return Err(run.fail(err)),
        };

        run.advance(TxStage::Submitting);
        let request = intent.priced(&quote, self.network.chain_id());
        let tx_hash = match intent.signer.send_transaction(&request).await {
            Ok(hash) => hash,
            Err(source) => {
                return Err(run.fail(RegistryError::Submission {
                    method: intent.method,
                    source,
                }))
            }
        };
        info!(method = intent.method, %tx_hash, "transaction submitted");

        run.advance(TxStage::Pending);
        let receipt = match self.await_confirmation(&tx_hash).await {
            Ok(receipt) => receipt,
            Err(reason) => return Err(run.fail(RegistryError::Confirmation { tx_hash, reason })),
        };

        run.advance(TxStage::Confirmed);
        info!(
            method = intent.method,
            %tx_hash,
            block = receipt.block_number,
            "transaction confirmed"
        );
        Ok(tx_hash)
    }

    async fn await_confirmation(
        &self,
        tx_hash: &TxHash,
    ) -> Result<TransactionReceipt, ConfirmationFailure> {
        let receipt = loop {
            match self.endpoint.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => break receipt,
                Ok(None) => tokio::time::sleep(self.wait.poll_interval).await,
                Err(err) => return Err(ConfirmationFailure::Endpoint(err)),
            }
        };

        if !receipt.succeeded() {
            return Err(ConfirmationFailure::Reverted {
                block_number: receipt.block_number,
            });
        }

        if self.wait.confirmations > 1 {
            let target = receipt
                .block_number
                .saturating_add(self.wait.confirmations - 1);
            loop {
                let head = self
                    .endpoint
                    .block_number()
                    .await
                    .map_err(ConfirmationFailure::Endpoint)?;
                if head >= target {
                    break;
                }
                tokio::time::sleep(self.wait.poll_interval).await;
            }
        }

        Ok(receipt)
    }
}
