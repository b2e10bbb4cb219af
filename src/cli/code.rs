//! Stateless code commands
//!
//! `otpctl hotp` and `otpctl totp` compute a code straight from a secret
//! given on the command line. Nothing is stored; for HOTP the caller is
//! responsible for advancing the counter.

use otpctl_core::config::toml_config::load_config;
use otpctl_core::error::OtpctlError;
use otpctl_core::otp::{compute_hotp, compute_totp};
use otpctl_core::types::{validate_digits, validate_period};
use tracing::debug;

/// Run the hotp command
///
/// Outputs only the code to stdout for machine-parsable usage.
pub fn run_hotp(secret: &str, counter: u64, digits: Option<u32>) -> Result<(), OtpctlError> {
    let config = load_config()?;
    let digits = validate_digits(digits.unwrap_or(config.defaults.digits))?;

    debug!("Computing HOTP code for counter {}", counter);
    println!("{}", compute_hotp(secret, counter, digits));

    Ok(())
}

/// Run the totp command
pub fn run_totp(
    secret: &str,
    period: Option<u64>,
    digits: Option<u32>,
    at: Option<u64>,
) -> Result<(), OtpctlError> {
    let config = load_config()?;
    let digits = validate_digits(digits.unwrap_or(config.defaults.digits))?;
    let period = validate_period(period.unwrap_or(config.defaults.period))?;
    let at = match at {
        Some(at) => at,
        None => super::now()?,
    };

    debug!("Computing TOTP code at t={} with period {}s", at, period);
    println!("{}", compute_totp(secret, period, digits, at));

    Ok(())
}
