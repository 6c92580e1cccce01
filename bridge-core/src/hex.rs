//! Hex text codec used by the command protocol and the status report.
//!
//! Decoding is lenient: any character outside `0-9`, `a-f`, `A-F` decodes to
//! nibble 0, and a missing character counts as a 0 nibble. Host tools rely on
//! this, so nothing in this module ever fails.

use core::fmt;

use crate::config::ADDRESS_LEN;

/// Hex digits lookup table for encoding.
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Convert a hex character to its 4-bit value, or 0 if it is not a hex digit.
#[inline]
#[must_use]
pub const fn decode_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// Decode the first two characters of `text` as one byte, high nibble first.
#[inline]
#[must_use]
pub fn decode_byte(text: &[u8]) -> u8 {
    let high = text.first().map_or(0, |&c| decode_nibble(c));
    let low = text.get(1).map_or(0, |&c| decode_nibble(c));
    (high << 4) | low
}

/// Decode five consecutive hex pairs into an address, left to right.
#[must_use]
pub fn decode_address(text: &[u8]) -> [u8; ADDRESS_LEN] {
    let mut address = [0u8; ADDRESS_LEN];
    for (i, byte) in address.iter_mut().enumerate() {
        *byte = decode_byte(text.get(i * 2..).unwrap_or(&[]));
    }
    address
}

/// Encode a byte as two uppercase hex digits.
#[inline]
#[must_use]
pub const fn encode_byte(value: u8) -> [u8; 2] {
    [
        HEX_DIGITS[(value >> 4) as usize],
        HEX_DIGITS[(value & 0xF) as usize],
    ]
}

/// Encode `bytes` into `out` as hex text.
///
/// Returns the number of characters written. Encoding stops at the last byte
/// that fits completely in `out`.
pub fn encode_bytes(bytes: &[u8], out: &mut [u8]) -> usize {
    let mut written = 0;
    for (&byte, pair) in bytes.iter().zip(out.chunks_exact_mut(2)) {
        pair.copy_from_slice(&encode_byte(byte));
        written += 2;
    }
    written
}

/// Encode an address as the ten characters the `!t`/`!r` directives take.
#[must_use]
pub fn encode_address(address: &[u8; ADDRESS_LEN]) -> [u8; ADDRESS_LEN * 2] {
    let mut text = [0u8; ADDRESS_LEN * 2];
    encode_bytes(address, &mut text);
    text
}

/// Display adapter that renders a byte slice as uppercase hex.
///
/// ```
/// use nrf_bridge_core::hex::Hex;
///
/// let mut text = heapless::String::<16>::new();
/// core::fmt::write(&mut text, format_args!("{}", Hex(&[0x7B, 0x27]))).unwrap();
/// assert_eq!(text.as_str(), "7B27");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Hex<'a>(pub &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.0 {
            let [high, low] = encode_byte(byte);
            f.write_fmt(format_args!("{}{}", high as char, low as char))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;

    #[test]
    fn test_decode_nibble_digits() {
        for (i, c) in (b'0'..=b'9').enumerate() {
            assert_eq!(decode_nibble(c), i as u8);
        }
        for (i, c) in (b'a'..=b'f').enumerate() {
            assert_eq!(decode_nibble(c), 10 + i as u8);
        }
        for (i, c) in (b'A'..=b'F').enumerate() {
            assert_eq!(decode_nibble(c), 10 + i as u8);
        }
    }

    #[test]
    fn test_decode_nibble_invalid_is_zero() {
        for c in [b'g', b'G', b'z', b' ', b'\n', b'!', 0x00, 0xFF, b'/', b':', b'@', b'`'] {
            assert_eq!(decode_nibble(c), 0, "char {:#04x}", c);
        }
    }

    #[test]
    fn test_nibble_roundtrip_all_values() {
        for value in 0..16u8 {
            let [_, low] = encode_byte(value);
            assert_eq!(decode_nibble(low), value);
        }
    }

    #[test]
    fn test_decode_byte() {
        assert_eq!(decode_byte(b"2A"), 0x2A);
        assert_eq!(decode_byte(b"2a"), 0x2A);
        assert_eq!(decode_byte(b"ff"), 0xFF);
        assert_eq!(decode_byte(b"00"), 0x00);
    }

    #[test]
    fn test_decode_byte_ignores_trailing_text() {
        assert_eq!(decode_byte(b"7F\r\n"), 0x7F);
    }

    #[test]
    fn test_decode_byte_lenient() {
        assert_eq!(decode_byte(b"x5"), 0x05);
        assert_eq!(decode_byte(b"5x"), 0x50);
        assert_eq!(decode_byte(b"5"), 0x50);
        assert_eq!(decode_byte(b""), 0x00);
    }

    #[test]
    fn test_decode_address_order() {
        assert_eq!(
            decode_address(b"7B271F1F1F"),
            [0x7B, 0x27, 0x1F, 0x1F, 0x1F]
        );
    }

    #[test]
    fn test_decode_address_short_input() {
        assert_eq!(decode_address(b"0102"), [0x01, 0x02, 0x00, 0x00, 0x00]);
        assert_eq!(decode_address(b"010"), [0x01, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_address_roundtrip() {
        let addresses = [
            [0x00; ADDRESS_LEN],
            [0xFF; ADDRESS_LEN],
            [0x7B, 0x27, 0x1F, 0x1F, 0x1F],
            [0x01, 0x23, 0x45, 0x67, 0x89],
            [0xAB, 0xCD, 0xEF, 0x10, 0x0A],
        ];
        for address in addresses {
            assert_eq!(decode_address(&encode_address(&address)), address);
        }
    }

    #[test]
    fn test_encode_byte_uppercase() {
        assert_eq!(&encode_byte(0x2A), b"2A");
        assert_eq!(&encode_byte(0x0F), b"0F");
        assert_eq!(&encode_byte(0xFF), b"FF");
    }

    #[test]
    fn test_encode_bytes_stops_at_capacity() {
        let mut out = [0u8; 5];
        assert_eq!(encode_bytes(&[0x12, 0x34, 0x56], &mut out), 4);
        assert_eq!(&out[..4], b"1234");
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Hex(&[0x7B, 0x27, 0x1F]).to_string(), "7B271F");
        assert_eq!(Hex(&[]).to_string(), "");
    }
}
