//! Test Helper Functions and Utilities
//!
//! Fixed addresses and ABI return-data builders shared by the integration tests.

use registrar_core::types::{Address, B256};

pub const REGISTRY: Address = Address([0x01; 20]);
pub const TLD_RESOLVER: Address = Address([0x02; 20]);
pub const LEGACY_REGISTRAR: Address = Address([0x03; 20]);
pub const BASE_REGISTRAR: Address = Address([0x04; 20]);
pub const CONTROLLER: Address = Address([0x05; 20]);
pub const PUBLIC_RESOLVER: Address = Address([0x06; 20]);
pub const DEED: Address = Address([0x07; 20]);
pub const DNS_REGISTRAR: Address = Address([0x08; 20]);

pub const ACCOUNT: Address = Address([0xaa; 20]);
pub const OTHER_ACCOUNT: Address = Address([0xbb; 20]);

/// Block time used by most scenarios: 2023-11-15T00:00:00Z.
pub const NOW: u64 = 1_700_006_400;

pub const DAY: u64 = 24 * 60 * 60;

/// Grace period of the production base registrar.
pub const GRACE_PERIOD: u64 = 90 * DAY;

pub const SECRET: B256 = B256([0x5e; 32]);

/// Encodes a `uint256` return word as 64 hex chars without prefix.
#[must_use]
pub fn word_uint(value: u128) -> String {
    format!("{value:064x}")
}

/// Encodes an `address` return word as 64 hex chars without prefix.
#[must_use]
pub fn word_address(address: Address) -> String {
    format!("{:0>64}", hex::encode(address.0))
}

#[must_use]
pub fn word_bool(value: bool) -> String {
    word_uint(u128::from(value))
}

/// Encodes a `bytes32` word as 64 hex chars without prefix.
#[must_use]
pub fn word_b256(value: B256) -> String {
    hex::encode(value.0)
}

/// Joins return words into `0x`-prefixed return data.
#[must_use]
pub fn return_data(words: &[String]) -> String {
    format!("0x{}", words.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_encoding() {
        assert_eq!(word_uint(1).len(), 64);
        assert!(word_uint(1).ends_with("01"));
        assert_eq!(word_address(ACCOUNT), format!("{}{}", "0".repeat(24), "aa".repeat(20)));
        assert_eq!(return_data(&[word_bool(true)]), format!("0x{}1", "0".repeat(63)));
    }
}
