//! Core value types for the agent registry client.
//!
//! Account and hash types come from `alloy-primitives`; `AgentId` and `AgentRecord`
//! are registry-specific.

use crate::error::RpcError;
use crate::util::{format_hex_word, parse_hex_word};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub use alloy_primitives::{Address, TxHash, U256};

/// ChainId: numeric network identifier
pub type ChainId = u64;

/// Registry key for an agent.
///
/// Written as a hex handle (`0xabc`) and carried on the wire as a `uint256`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentId(U256);

impl AgentId {
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl From<U256> for AgentId {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hex_word(&self.0.to_be_bytes::<32>()))
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self)
    }
}

impl FromStr for AgentId {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_word(s).map(|word| AgentId(U256::from_be_bytes(word)))
    }
}

impl Serialize for AgentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AgentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Agent record as stored in the registry.
///
/// An id that was never created decodes to the zero value (`created == false`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentRecord {
    pub created: bool,
    pub owner: Address,
    pub version: u64,
    pub metadata: String,
    pub chain_ids: Vec<ChainId>,
}
