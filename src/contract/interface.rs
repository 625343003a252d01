//! Registry interface description and startup shape check.

use crate::error::RegistryError;
use alloy_primitives::keccak256;
use serde::Deserialize;
use std::path::Path;

/// One method of the registry contract as the client expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: &'static str,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
}

impl MethodSpec {
    /// Canonical signature, e.g. `isEnabled(uint256)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.inputs.join(","))
    }

    pub fn selector(&self) -> [u8; 4] {
        selector(&self.signature())
    }
}

/// First four bytes of keccak-256 over a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

pub const GET_AGENT: MethodSpec = MethodSpec {
    name: "getAgent",
    inputs: &["uint256"],
    outputs: &["bool", "address", "uint256", "string", "uint256[]"],
};

pub const IS_ENABLED: MethodSpec = MethodSpec {
    name: "isEnabled",
    inputs: &["uint256"],
    outputs: &["bool"],
};

pub const CREATE_AGENT: MethodSpec = MethodSpec {
    name: "createAgent",
    inputs: &["uint256", "address", "string", "uint256[]"],
    outputs: &[],
};

pub const UPDATE_AGENT: MethodSpec = MethodSpec {
    name: "updateAgent",
    inputs: &["uint256", "string", "uint256[]"],
    outputs: &[],
};

pub const ENABLE_AGENT: MethodSpec = MethodSpec {
    name: "enableAgent",
    inputs: &["uint256", "uint8"],
    outputs: &[],
};

pub const DISABLE_AGENT: MethodSpec = MethodSpec {
    name: "disableAgent",
    inputs: &["uint256", "uint8"],
    outputs: &[],
};

/// Every method the client calls.
pub const REGISTRY_METHODS: [MethodSpec; 6] = [
    GET_AGENT,
    IS_ENABLED,
    CREATE_AGENT,
    UPDATE_AGENT,
    ENABLE_AGENT,
    DISABLE_AGENT,
];

#[derive(Debug, Clone, Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
}

fn default_entry_type() -> String {
    "function".to_string()
}

/// Accepts either a bare ABI array or a build artifact carrying an `abi` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AbiDocument {
    Bare(Vec<AbiEntry>),
    Artifact { abi: Vec<AbiEntry> },
}

/// Externally supplied description of the deployed registry.
#[derive(Debug, Clone)]
pub struct InterfaceDescription {
    entries: Vec<AbiEntry>,
}

impl InterfaceDescription {
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let document: AbiDocument = serde_json::from_str(json).map_err(|e| {
            RegistryError::InterfaceMismatch(format!("Failed to parse interface description: {}", e))
        })?;
        let entries = match document {
            AbiDocument::Bare(entries) => entries,
            AbiDocument::Artifact { abi } => abi,
        };
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::ConfigError(format!(
                "Failed to read interface description {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    fn functions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AbiEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.kind == "function" && entry.name == name)
    }

    /// Check that every expected method exists with the expected argument and return
    /// types. Methods the client does not use are ignored.
    pub fn verify(&self) -> Result<(), RegistryError> {
        for expected in REGISTRY_METHODS.iter() {
            self.verify_method(expected)?;
        }
        Ok(())
    }

    fn verify_method(&self, expected: &MethodSpec) -> Result<(), RegistryError> {
        let candidates: Vec<&AbiEntry> = self.functions_named(expected.name).collect();
        if candidates.is_empty() {
            return Err(RegistryError::InterfaceMismatch(format!(
                "method '{}' not found",
                expected.name
            )));
        }

        let entry = candidates
            .iter()
            .find(|entry| types_match(&entry.inputs, expected.inputs))
            .ok_or_else(|| {
                RegistryError::InterfaceMismatch(format!(
                    "method '{}' has no overload taking ({})",
                    expected.name,
                    expected.inputs.join(",")
                ))
            })?;

        if !types_match(&entry.outputs, expected.outputs) {
            let found: Vec<&str> = entry.outputs.iter().map(|p| p.kind.as_str()).collect();
            return Err(RegistryError::InterfaceMismatch(format!(
                "method '{}' returns ({}), expected ({})",
                expected.signature(),
                found.join(","),
                expected.outputs.join(",")
            )));
        }

        Ok(())
    }
}

fn types_match(params: &[AbiParam], expected: &[&str]) -> bool {
    params.len() == expected.len()
        && params
            .iter()
            .zip(expected.iter())
            .all(|(param, kind)| param.kind == *kind)
}

#[cfg(test)]
pub(crate) fn registry_abi_json() -> String {
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
                "inputs": params(method.inputs),
                "outputs": params(method.outputs),
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}
