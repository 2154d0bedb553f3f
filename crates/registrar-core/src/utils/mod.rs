//! Hex helpers shared by the ABI codec and the JSON-RPC transport.
//!
//! Formatting reuses a thread-local buffer so the per-call allocation is a single clone of the
//! finished string.

pub mod hex;

pub use self::hex::{format_hex, format_quantity, parse_hex_array, parse_hex_bytes, parse_hex_u64};
