//! HMAC-SHA1 primitive
//!
//! Thin wrapper over the RustCrypto `hmac` and `sha1` crates. HOTP is
//! defined over HMAC-SHA1 (RFC 4226 §5.2), so this is the only MAC the
//! engine needs.
//!
//! Reference: https://www.ietf.org/rfc/rfc2104.txt

use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Length in bytes of an HMAC-SHA1 digest
pub const DIGEST_LEN: usize = 20;

type HmacSha1 = Hmac<Sha1>;

/// Compute HMAC-SHA1 of `message` under `key`
///
/// Keys of any length are accepted, including the empty key; keys longer
/// than the SHA-1 block size are hashed first as RFC 2104 requires.
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> [u8; DIGEST_LEN] {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);

    let digest = mac.finalize().into_bytes();
    let mut result = [0u8; DIGEST_LEN];
    result.copy_from_slice(&digest);
    result
}
