//! ENS name hashing.
//!
//! - [`labelhash`]: keccak256 of a single label, or the decoded hash of an encoded
//!   `[<64 hex chars>]` label whose plaintext is unknown.
//! - [`namehash`]: recursive node hash of a dotted name, computed right to left from the zero
//!   node.
//!
//! Names are hashed as given. Normalization is the caller's job.

use sha3::{Digest, Keccak256};

use crate::{types::B256, utils::parse_hex_array};

/// Length of an encoded labelhash including the surrounding brackets.
const ENCODED_LABELHASH_LEN: usize = 66;

/// Computes keccak256 over `data`.
#[must_use]
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    let digest = Keccak256::digest(data.as_ref());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    B256(out)
}

/// Returns `true` if `label` is an encoded labelhash such as `[4f5b…d7f0]`.
#[must_use]
pub fn is_encoded_labelhash(label: &str) -> bool {
    label.len() == ENCODED_LABELHASH_LEN && label.starts_with('[') && label.ends_with(']')
}

/// Decodes an encoded labelhash. Returns `None` if `label` is not one or contains bad hex.
#[must_use]
pub fn decode_labelhash(label: &str) -> Option<B256> {
    if !is_encoded_labelhash(label) {
        return None;
    }
    parse_hex_array::<32>(&label[1..label.len() - 1]).map(B256)
}

/// Hashes a single label.
///
/// An encoded labelhash with valid hex is decoded rather than hashed again.
#[must_use]
pub fn labelhash(label: &str) -> B256 {
    decode_labelhash(label).unwrap_or_else(|| keccak256(label.as_bytes()))
}

/// Computes the namehash node of a dotted name. The empty name hashes to the zero node.
#[must_use]
pub fn namehash(name: &str) -> B256 {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return B256(node);
    }

    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(labelhash(label).as_bytes());
        node = keccak256(buf).0;
    }

    B256(node)
}

/// Returns the leftmost label of a name (`"alice"` for `"alice.eth"`).
#[must_use]
pub fn first_label(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}
