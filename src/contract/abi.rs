//! Solidity bindings for the registry's methods.
//!
//! Each function gets a `<name>Call` type carrying its arguments, its selector and
//! signature, and a `<name>Return` type for decoding results.

use alloy_sol_types::sol;

sol! {
    function getAgent(uint256 id) external view returns (bool created, address owner, uint256 version, string metadata, uint256[] chainIds);
    function isEnabled(uint256 id) external view returns (bool enabled);
    function createAgent(uint256 id, address owner, string metadata, uint256[] chainIds) external;
    function updateAgent(uint256 id, string metadata, uint256[] chainIds) external;
    function enableAgent(uint256 id, uint8 permission) external;
    function disableAgent(uint256 id, uint8 permission) external;
}
