//! Dynamic truncation and decimal formatting (RFC 4226 §5.3)

use super::hmac::DIGEST_LEN;

/// Largest power of ten representable in a `u64`
const MAX_MODULUS_EXPONENT: u32 = 19;

/// Extract a 31-bit value from an HMAC-SHA1 digest
///
/// The low nibble of the last byte selects an offset in `0..=15`; the four
/// bytes at that offset are read big-endian with the top bit cleared.
pub fn dynamic_truncate(digest: &[u8; DIGEST_LEN]) -> u32 {
    let offset = (digest[DIGEST_LEN - 1] & 0x0f) as usize;

    u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ])
}

/// Reduce `value` modulo `10^digits` and left-pad it with zeros to `digits` characters
///
/// The output is always exactly `digits` characters long. Digit counts are
/// not validated here; anything above 19 keeps the value whole and only pads.
pub fn format_code(value: u32, digits: u32) -> String {
    let width = digits as usize;
    if digits == 0 {
        return String::new();
    }

    let modulus = 10u64.pow(digits.min(MAX_MODULUS_EXPONENT));
    format!("{:0width$}", u64::from(value) % modulus, width = width)
}
