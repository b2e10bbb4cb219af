//! Lenient Base32 (RFC 4648) codec for shared secrets
//!
//! Decoding is deliberately forgiving so that secrets copied from
//! enrollment pages keep working:
//! 1. Characters are folded to uppercase before lookup
//! 2. Characters outside `A-Z2-7` (spaces, dashes, newlines) are skipped
//! 3. The first `=` ends decoding; nothing after it is read
//!
//! Trailing bits that do not fill a whole byte are discarded.

use data_encoding::BASE32_NOPAD;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const PADDING: char = '=';

/// Map a character to its 5-bit value, if it belongs to the alphabet
fn symbol_value(c: char) -> Option<u8> {
    match c.to_ascii_uppercase() {
        c @ 'A'..='Z' => Some(c as u8 - b'A'),
        c @ '2'..='7' => Some(c as u8 - b'2' + 26),
        _ => None,
    }
}

/// Decode a Base32 string into raw key bytes
///
/// Never fails: unrecognized characters are dropped and an input with no
/// valid characters decodes to an empty vector.
pub fn decode_base32(input: &str) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for c in input.chars() {
        if c == PADDING {
            break;
        }

        let Some(value) = symbol_value(c) else {
            continue;
        };

        buffer = (buffer << 5) | u32::from(value);
        bits += 5;

        if bits >= 8 {
            bits -= 8;
            output.push((buffer >> bits) as u8);
            // keep only the bits not yet emitted
            buffer &= (1 << bits) - 1;
        }
    }

    output
}

/// Encode raw bytes as unpadded Base32
pub fn encode_base32(bytes: &[u8]) -> String {
    BASE32_NOPAD.encode(bytes)
}

/// Returns true if `c` is part of the Base32 alphabet (case-insensitive)
pub fn is_base32_symbol(c: char) -> bool {
    ALPHABET.contains(&(c.to_ascii_uppercase() as u8))
}
