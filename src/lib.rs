//! Agent Registry: on-chain agent identity registry client
//!
//! Typed reads and confirmed writes against an agent registry contract reachable
//! over JSON-RPC. Every write is estimated, given fee headroom, submitted through a
//! caller-supplied signer and awaited until mined.

pub mod config;
pub mod contract;
pub mod error;
pub mod logging;
pub mod network;
pub mod registry;
pub mod rpc;
pub mod signer;
pub mod tooling;
pub mod transaction;
pub mod types;
pub mod util;

pub use contract::Permission;
pub use error::{ConfirmationFailure, RegistryError, RpcError};
pub use network::NetworkContext;
pub use registry::{AgentRegistry, ConnectOptions};
pub use signer::{NodeSigner, Signer};
pub use types::{Address, AgentId, AgentRecord, ChainId, TxHash};
