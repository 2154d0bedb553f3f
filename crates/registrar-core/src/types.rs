//! Core value types shared by every registrar component.
//!
//! # Type Categories
//!
//! ## Fixed-size byte values
//! - [`Address`]: 20-byte account or contract address
//! - [`B256`]: 32-byte word (label hashes, namehash nodes, commitments, secrets, tx hashes)
//! - [`InterfaceId`]: 4-byte interface identifier used by `interfaceImplementer`
//!
//! All three parse from `0x`-prefixed hex (case-insensitive) and display as lowercase hex.
//!
//! ## Read outcomes
//! - [`Lookup`]: explicit found / degraded / unavailable result for read-path helpers
//!
//! ## Transactions
//! - [`TxRequest`], [`Overrides`]: a call to submit through the chain context

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::utils::format_hex;

/// Error type for fixed-size hex parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexParseError {
    #[error("missing 0x prefix")]
    MissingPrefix,
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Length of the value in bytes.
            pub const LEN: usize = $len;

            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; $len]);

            /// Returns the inner byte array.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Returns `true` if every byte is zero.
            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl TryFrom<&str> for $name {
            type Error = HexParseError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let hex_str = value.strip_prefix("0x").ok_or(HexParseError::MissingPrefix)?;
                let bytes =
                    hex::decode(hex_str).map_err(|e| HexParseError::InvalidHex(e.to_string()))?;
                if bytes.len() != $len {
                    return Err(HexParseError::InvalidLength { expected: $len, got: bytes.len() });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }
        }

        impl FromStr for $name {
            type Err = HexParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&format_hex(&self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), format_hex(&self.0))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&format_hex(&self.0))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::try_from(s.as_str()).map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// 20-byte Ethereum address.
    ///
    /// # Example
    /// ```
    /// use registrar_core::types::Address;
    ///
    /// let a: Address = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e".parse().unwrap();
    /// assert_eq!(a.to_string(), "0x00000000000c2e074ec69a0dfb2997ba6c7d2e1e");
    /// assert!(!a.is_zero());
    /// ```
    Address,
    20
);

fixed_bytes!(
    /// 32-byte word.
    B256,
    32
);

fixed_bytes!(
    /// 4-byte interface identifier (ERC-165 style).
    InterfaceId,
    4
);

impl Address {
    /// Extracts an address from the low 20 bytes of an ABI word.
    #[must_use]
    pub fn from_word(word: &[u8; 32]) -> Self {
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&word[12..]);
        Self(arr)
    }

    /// Left-pads the address into an ABI word.
    #[must_use]
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

/// Outcome of a read-path helper.
///
/// Read helpers never raise: they report how much of the answer could be obtained, and callers
/// branch explicitly instead of treating partial data as authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Every read succeeded.
    Found(T),
    /// Some reads failed; `value` is a well-defined fallback (usually the zero value).
    Degraded { value: T, reason: String },
    /// No usable information could be obtained.
    Unavailable { reason: String },
}

impl<T> Lookup<T> {
    /// Returns the carried value for `Found` and `Degraded`.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Found(value) | Self::Degraded { value, .. } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    /// Consumes the lookup, returning the carried value for `Found` and `Degraded`.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Found(value) | Self::Degraded { value, .. } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns `true` only for `Found`.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the failure reason for `Degraded` and `Unavailable`.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Found(_) => None,
            Self::Degraded { reason, .. } | Self::Unavailable { reason } => Some(reason),
        }
    }
}

/// Per-call transaction overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    /// Explicit gas limit. `None` leaves estimation to the node.
    pub gas_limit: Option<u64>,
    /// Wei attached to the call.
    pub value: Option<u128>,
}

impl Overrides {
    /// Overrides carrying a payment.
    #[must_use]
    pub fn with_value(value: u128) -> Self {
        Self { gas_limit: None, value: Some(value) }
    }
}

/// A contract call ready to be estimated or submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: bytes::Bytes,
    pub value: Option<u128>,
    pub gas: Option<u64>,
}

impl TxRequest {
    /// Creates a call to `to` with the given calldata.
    #[must_use]
    pub fn new(to: Address, data: impl Into<bytes::Bytes>) -> Self {
        Self { from: None, to, data: data.into(), value: None, gas: None }
    }

    /// Applies caller overrides onto this request.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.gas_limit.is_some() {
            self.gas = overrides.gas_limit;
        }
        if overrides.value.is_some() {
            self.value = overrides.value;
        }
        self
    }

    /// Returns the 4-byte function selector, if the calldata carries one.
    #[must_use]
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|s| s.try_into().ok())
    }
}
