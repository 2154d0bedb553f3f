use std::{cell::RefCell, fmt::Write};

thread_local! {
    /// Thread-local buffer reused by every hex formatting call.
    ///
    /// Pre-sized for a typical calldata payload (selector plus a handful of words).
    static HEX_BUFFER: RefCell<String> = RefCell::new(String::with_capacity(512));
}

/// Formats bytes as `0x`-prefixed lowercase hex, returning an owned `String`.
///
/// Reuses the thread-local buffer for formatting and only clones the final result.
#[must_use]
pub fn format_hex(bytes: &[u8]) -> String {
    HEX_BUFFER.with(|buffer| {
        let mut buf = buffer.borrow_mut();
        buf.clear();

        buf.reserve(2 + bytes.len() * 2);

        buf.push_str("0x");
        for byte in bytes {
            let _ = write!(&mut buf, "{byte:02x}");
        }

        buf.clone()
    })
}

/// Formats a quantity as JSON-RPC hex. Zero is formatted as `0x0`.
#[must_use]
pub fn format_quantity(value: u128) -> String {
    HEX_BUFFER.with(|buffer| {
        let mut buf = buffer.borrow_mut();
        buf.clear();
        let _ = write!(&mut buf, "0x{value:x}");
        buf.clone()
    })
}

/// Parses a JSON-RPC quantity to `u64`.
///
/// Accepts strings with or without `0x` prefix. Returns `None` if invalid hex or overflow.
#[must_use]
pub fn parse_hex_u64(hex: &str) -> Option<u64> {
    let hex_str = hex.strip_prefix("0x").unwrap_or(hex);
    if hex_str.is_empty() {
        return None;
    }
    u64::from_str_radix(hex_str, 16).ok()
}

/// Parses a hex string to bytes.
///
/// Accepts strings with or without `0x` prefix. `0x` alone decodes to an empty vector.
#[must_use]
pub fn parse_hex_bytes(hex: &str) -> Option<Vec<u8>> {
    let hex_str = hex.strip_prefix("0x").unwrap_or(hex);
    hex::decode(hex_str).ok()
}

/// Parses a hex string to a fixed-size byte array.
///
/// Returns `None` if the length doesn't match `N * 2` characters or contains invalid hex.
#[must_use]
pub fn parse_hex_array<const N: usize>(hex: &str) -> Option<[u8; N]> {
    let hex_str = hex.strip_prefix("0x").unwrap_or(hex);
    if hex_str.len() != N * 2 {
        return None;
    }

    let bytes = hex_str.as_bytes();
    let mut array = [0u8; N];
    for (i, chunk) in bytes.chunks(2).enumerate() {
        let high = hex_digit_to_u8(chunk[0])?;
        let low = hex_digit_to_u8(chunk[1])?;
        array[i] = (high << 4) | low;
    }

    Some(array)
}

fn hex_digit_to_u8(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
