//! Hex helpers for JSON-RPC quantities and agent ids.

use crate::error::RpcError;
use alloy_primitives::hex;

pub fn strip_0x(input: &str) -> &str {
    if let Some(stripped) = input.strip_prefix("0x") {
        stripped
    } else if let Some(stripped) = input.strip_prefix("0X") {
        stripped
    } else {
        input
    }
}

pub fn parse_hex_vec(input: &str) -> Result<Vec<u8>, RpcError> {
    let raw = strip_0x(input.trim());
    Ok(hex::decode(raw)?)
}

pub fn format_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Quantities go on the wire as minimal `0x` hex (no leading zeros).
pub fn format_quantity(value: u128) -> String {
    format!("0x{:x}", value)
}

pub fn parse_hex_u64(input: &str) -> Result<u64, RpcError> {
    let raw = strip_0x(input.trim());
    if raw.is_empty() {
        return Err(RpcError::InvalidHex("empty hex value".to_string()));
    }
    u64::from_str_radix(raw, 16).map_err(|e| RpcError::InvalidHex(e.to_string()))
}

pub fn parse_hex_u128(input: &str) -> Result<u128, RpcError> {
    let raw = strip_0x(input.trim());
    if raw.is_empty() {
        return Err(RpcError::InvalidHex("empty hex value".to_string()));
    }
    u128::from_str_radix(raw, 16).map_err(|e| RpcError::InvalidHex(e.to_string()))
}

/// Parse a hex quantity of up to 256 bits into a big-endian word.
///
/// Odd-length input is accepted and the value is left-padded, so `0xabc` becomes
/// `0x0000…0abc`.
pub fn parse_hex_word(input: &str) -> Result<[u8; 32], RpcError> {
    let raw = strip_0x(input.trim());
    if raw.is_empty() {
        return Err(RpcError::InvalidHex("empty hex value".to_string()));
    }
    if raw.len() > 64 {
        return Err(RpcError::InvalidLength {
            expected: 32,
            actual: (raw.len() + 1) / 2,
        });
    }
    let padded = format!("{:0>64}", raw);
    let bytes = hex::decode(padded)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Minimal `0x` rendering of a big-endian word (`0x0` for zero).
pub fn format_hex_word(word: &[u8; 32]) -> String {
    let encoded = hex::encode(word);
    let trimmed = encoded.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}
