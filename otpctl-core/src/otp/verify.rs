//! Code verification with resynchronization windows
//!
//! The generators compute a single code per counter or instant. Verifiers
//! tolerate drift by checking a small range of neighbouring counters:
//! HOTP looks ahead of the stored counter, TOTP checks steps on both sides
//! of the current one.

use super::base32::decode_base32;
use super::hotp::compute_hotp_raw;
use super::totp::time_step;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Compare two codes without short-circuiting on the first differing byte
fn codes_match(candidate: &str, expected: &str) -> bool {
    candidate.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Verify an HOTP code against `counter..=counter + look_ahead`
///
/// Returns the counter that produced the code. The caller must persist
/// `matched + 1` so the same code cannot be accepted twice.
pub fn verify_hotp(
    secret: &str,
    code: &str,
    counter: u64,
    digits: u32,
    look_ahead: u64,
) -> Option<u64> {
    let key = decode_base32(secret);
    let last = counter.saturating_add(look_ahead);

    let matched = (counter..=last).find(|&candidate| {
        codes_match(code.trim(), &compute_hotp_raw(&key, candidate, digits))
    });

    if let Some(found) = matched {
        debug!("HOTP code matched at offset {}", found - counter);
    }
    matched
}

/// Verify a TOTP code, accepting up to `window` steps before or after `at_time`
pub fn verify_totp(
    secret: &str,
    code: &str,
    period: u64,
    digits: u32,
    at_time: u64,
    window: u64,
) -> bool {
    let key = decode_base32(secret);
    let step = time_step(period, at_time);
    let first = step.saturating_sub(window);
    let last = step.saturating_add(window);

    let mut accepted = false;
    for candidate in first..=last {
        // no early exit, every step in the window is computed
        accepted |= codes_match(code.trim(), &compute_hotp_raw(&key, candidate, digits));
    }
    accepted
}
