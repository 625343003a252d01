//! Contract Binding
//!
//! Encodes logical registry operations against the fixed interface description and
//! decodes their results.

pub mod abi;
mod binding;
pub mod interface;

pub use binding::{Permission, RegistryContract};
pub use interface::{InterfaceDescription, MethodSpec, REGISTRY_METHODS};
