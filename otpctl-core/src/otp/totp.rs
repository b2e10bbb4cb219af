//! TOTP (Time-based One-Time Password) generation
//!
//! Implements RFC 6238 on top of the HOTP engine: the counter is the number
//! of whole periods elapsed since the Unix epoch.

use super::clock::TimeSource;
use super::hotp::compute_hotp;
use crate::error::OtpError;

/// RFC 6238 default time step in seconds
pub const DEFAULT_PERIOD: u64 = 30;

/// Guard against a zero period; zero is a caller error and falls back to the default
fn effective_period(period: u64) -> u64 {
    if period == 0 {
        DEFAULT_PERIOD
    } else {
        period
    }
}

/// Time step (HOTP counter) for a given instant
pub fn time_step(period: u64, at_time: u64) -> u64 {
    at_time / effective_period(period)
}

/// Seconds until the code valid at `at_time` expires
pub fn seconds_remaining(period: u64, at_time: u64) -> u64 {
    let period = effective_period(period);
    period - at_time % period
}

/// Compute the TOTP code for a Base32 secret at an explicit Unix time
///
/// Pure function: identical arguments always give identical output.
pub fn compute_totp(secret: &str, period: u64, digits: u32, at_time: u64) -> String {
    compute_hotp(secret, time_step(period, at_time), digits)
}

/// Compute the TOTP code for the instant reported by `clock`
pub fn generate_totp<C: TimeSource + ?Sized>(
    secret: &str,
    period: u64,
    digits: u32,
    clock: &C,
) -> Result<String, OtpError> {
    let now = clock.now()?;
    Ok(compute_totp(secret, period, digits, now))
}
