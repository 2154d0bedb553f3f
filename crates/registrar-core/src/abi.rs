//! Minimal contract ABI codec for the registrar surfaces.
//!
//! Supports what the registry contracts need and nothing more:
//! - call encoding with static words (`address`, `uint256`, `bytes32`, `bytes4`) and dynamic
//!   `string` / `bytes` arguments (head/tail layout);
//! - decoding of statically sized return values word by word.
//!
//! # Example
//!
//! ```
//! use registrar_core::abi::{encode_call, selector};
//!
//! let data = encode_call("minCommitmentAge()", &[]);
//! assert_eq!(&data[..], &selector("minCommitmentAge()")[..]);
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::{
    namehash::keccak256,
    types::{Address, InterfaceId, B256},
};

const WORD: usize = 32;

/// Errors raised while decoding contract return data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AbiError {
    #[error("return data too short: need {needed} bytes, got {got}")]
    ShortData { needed: usize, got: usize },

    #[error("word {index} does not fit in {bits} bits")]
    Overflow { index: usize, bits: u32 },

    #[error("word {index} is not a valid bool")]
    InvalidBool { index: usize },
}

/// A single call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Address(Address),
    Uint(u128),
    Word(B256),
    Interface(InterfaceId),
    String(&'a str),
    Bytes(&'a [u8]),
}

impl Token<'_> {
    fn is_dynamic(&self) -> bool {
        matches!(self, Self::String(_) | Self::Bytes(_))
    }

    fn head_word(&self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        match self {
            Self::Address(address) => word = address.to_word(),
            Self::Uint(value) => word[16..].copy_from_slice(&value.to_be_bytes()),
            Self::Word(value) => word = value.0,
            Self::Interface(id) => word[..4].copy_from_slice(&id.0),
            Self::String(_) | Self::Bytes(_) => {}
        }
        word
    }

    fn dynamic_payload(&self) -> &[u8] {
        match self {
            Self::String(s) => s.as_bytes(),
            Self::Bytes(b) => b,
            _ => &[],
        }
    }
}

/// Computes the 4-byte selector of a canonical function signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.0[..4]);
    out
}

fn uint_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[24..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// Encodes a function call: selector followed by the ABI-encoded arguments.
#[must_use]
pub fn encode_call(signature: &str, args: &[Token<'_>]) -> Bytes {
    let head_len = args.len() * WORD;
    let tail_len: usize = args
        .iter()
        .filter(|t| t.is_dynamic())
        .map(|t| WORD + padded_len(t.dynamic_payload().len()))
        .sum();

    let mut out = BytesMut::with_capacity(4 + head_len + tail_len);
    out.put_slice(&selector(signature));

    let mut tail = BytesMut::with_capacity(tail_len);
    for token in args {
        if token.is_dynamic() {
            out.put_slice(&uint_word(head_len + tail.len()));
            let payload = token.dynamic_payload();
            tail.put_slice(&uint_word(payload.len()));
            tail.put_slice(payload);
            tail.put_bytes(0, padded_len(payload.len()) - payload.len());
        } else {
            out.put_slice(&token.head_word());
        }
    }

    out.put_slice(&tail);
    out.freeze()
}

/// Word-indexed view over statically encoded return data.
#[derive(Debug, Clone, Copy)]
pub struct ReturnData<'a> {
    data: &'a [u8],
}

impl<'a> ReturnData<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Returns the raw word at `index`.
    pub fn word(&self, index: usize) -> Result<[u8; WORD], AbiError> {
        let start = index * WORD;
        let end = start + WORD;
        let slice = self
            .data
            .get(start..end)
            .ok_or(AbiError::ShortData { needed: end, got: self.data.len() })?;
        let mut word = [0u8; WORD];
        word.copy_from_slice(slice);
        Ok(word)
    }

    pub fn address(&self, index: usize) -> Result<Address, AbiError> {
        self.word(index).map(|w| Address::from_word(&w))
    }

    pub fn b256(&self, index: usize) -> Result<B256, AbiError> {
        self.word(index).map(B256)
    }

    pub fn bool(&self, index: usize) -> Result<bool, AbiError> {
        match self.uint(index)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(AbiError::InvalidBool { index }),
        }
    }

    /// Decodes a `uint` word that must fit in 128 bits.
    pub fn uint(&self, index: usize) -> Result<u128, AbiError> {
        let word = self.word(index)?;
        if word[..16].iter().any(|b| *b != 0) {
            return Err(AbiError::Overflow { index, bits: 128 });
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&word[16..]);
        Ok(u128::from_be_bytes(low))
    }

    /// Decodes a `uint` word that must fit in 64 bits (timestamps, durations).
    pub fn uint64(&self, index: usize) -> Result<u64, AbiError> {
        u64::try_from(self.uint(index)?).map_err(|_| AbiError::Overflow { index, bits: 64 })
    }
}
