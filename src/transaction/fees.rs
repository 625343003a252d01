//! Fee estimation with fixed headroom.
//!
//! The raw gas estimate and the current gas price are both inflated before
//! submission: the limit absorbs estimation drift between quote and execution, the
//! price keeps the transaction competitive during spikes. Neither is capped.

use super::TransactionIntent;
use crate::error::RegistryError;
use crate::rpc::Endpoint;
use std::sync::Arc;
use tracing::{debug, warn};

const BPS_DENOMINATOR: u128 = 10_000;

/// Gas limit headroom: 1.15x.
pub const GAS_LIMIT_MULTIPLIER_BPS: u128 = 11_500;

/// Gas price headroom: 1.5x.
pub const GAS_PRICE_MULTIPLIER_BPS: u128 = 15_000;

/// Multiply by `bps / 10_000`, rounding half up.
pub fn inflate(value: u128, bps: u128) -> u128 {
    let whole = value / BPS_DENOMINATOR;
    let rem = value % BPS_DENOMINATOR;
    whole
        .saturating_mul(bps)
        .saturating_add((rem * bps + BPS_DENOMINATOR / 2) / BPS_DENOMINATOR)
}

/// Priced gas parameters for one intent. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub gas_limit: u128,
    pub gas_price: u128,
}

impl FeeQuote {
    pub fn from_raw(gas_estimate: u128, gas_price: u128) -> Self {
        Self {
            gas_limit: inflate(gas_estimate, GAS_LIMIT_MULTIPLIER_BPS),
            gas_price: inflate(gas_price, GAS_PRICE_MULTIPLIER_BPS),
        }
    }
}

#[derive(Clone)]
pub struct FeeEstimator {
    endpoint: Arc<dyn Endpoint>,
}

impl FeeEstimator {
    pub fn new(endpoint: Arc<dyn Endpoint>) -> Self {
        Self { endpoint }
    }

    /// Quote the exact call. A reverting estimate fails here, before anything is
    /// submitted.
    pub async fn estimate(&self, intent: &TransactionIntent) -> Result<FeeQuote, RegistryError> {
        let request = intent.call_request();
        let (gas, price) = tokio::join!(
            self.endpoint.estimate_gas(&request),
            self.endpoint.gas_price()
        );

        let gas = gas.map_err(|source| {
            if source.is_revert() {
                warn!(method = intent.method, error = %source, "estimation reverted");
            }
            RegistryError::Estimation {
                method: intent.method,
                source,
            }
        })?;
        let price = price.map_err(|source| RegistryError::Estimation {
            method: intent.method,
            source,
        })?;

        let quote = FeeQuote::from_raw(gas, price);
        debug!(
            method = intent.method,
            raw_gas = %gas,
            raw_price = %price,
            gas_limit = %quote.gas_limit,
            gas_price = %quote.gas_price,
            "fee quote"
        );
        Ok(quote)
    }
}
