//! Type definitions and wrappers for secure data handling
//!
//! This module provides type-safe wrappers for sensitive data using the
//! secrecy crate to prevent accidental exposure in logs or debug output.

use crate::error::OtpError;
use crate::otp::base32::{decode_base32, is_base32_symbol};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest accepted code length
pub const MIN_DIGITS: u32 = 4;

/// Largest accepted code length
pub const MAX_DIGITS: u32 = 10;

/// Keyring service name under which secrets are stored
pub const KEYRING_SERVICE_SECRET: &str = "otpctl-secret";

/// Wrapper for Base32-encoded OTP secrets
///
/// Secrets are never printed through `Debug`; callers must go through
/// [`OtpSecret::expose`] to get at the value.
#[derive(Clone, Debug)]
pub struct OtpSecret(Secret<String>);

impl OtpSecret {
    /// Create a new OtpSecret from a Base32-encoded string
    pub fn new(secret: String) -> Self {
        Self(Secret::new(secret))
    }

    /// Expose the secret value (use with caution!)
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Strict validation used when enrolling a key
    ///
    /// The generators decode leniently and accept anything; enrollment
    /// rejects secrets that decode to zero key bytes.
    pub fn validate(&self) -> Result<(), OtpError> {
        if decode_base32(self.expose()).is_empty() {
            Err(OtpError::InvalidSecret)
        } else {
            Ok(())
        }
    }

    /// Canonical form for storage and URIs
    ///
    /// Keeps only Base32 symbols before the first `=`, uppercased. The key
    /// bytes are unchanged since the decoder skips everything else anyway.
    pub fn normalized(&self) -> Self {
        let cleaned: String = self
            .expose()
            .chars()
            .take_while(|&c| c != '=')
            .filter(|&c| is_base32_symbol(c))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self::new(cleaned)
    }
}

impl From<String> for OtpSecret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

/// Wrapper for generated one-time codes
///
/// Codes are short-lived but still sensitive; they are never logged.
#[derive(Clone, Debug)]
pub struct OtpCode(Secret<String>);

impl OtpCode {
    pub fn new(code: String) -> Self {
        Self(Secret::new(code))
    }

    /// Expose the code value (use with caution!)
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for OtpCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

/// Generation mode of a stored key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    /// TOTP, counter derived from the clock
    #[default]
    Time,
    /// HOTP, counter persisted with the key
    Counter,
}

impl KeyKind {
    /// otpauth URI type segment
    pub fn otpauth_type(&self) -> &'static str {
        match self {
            KeyKind::Time => "totp",
            KeyKind::Counter => "hotp",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Time => write!(f, "time"),
            KeyKind::Counter => write!(f, "counter"),
        }
    }
}

impl FromStr for KeyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "time" | "totp" => Ok(KeyKind::Time),
            "counter" | "hotp" => Ok(KeyKind::Counter),
            other => Err(format!("unknown key kind '{}' (expected time or counter)", other)),
        }
    }
}

/// Check a digit count against the supported range
pub fn validate_digits(digits: u32) -> Result<u32, OtpError> {
    if (MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        Ok(digits)
    } else {
        Err(OtpError::InvalidDigits { digits })
    }
}

/// Check that a TOTP period is usable
pub fn validate_period(period: u64) -> Result<u64, OtpError> {
    if period == 0 {
        Err(OtpError::InvalidPeriod)
    } else {
        Ok(period)
    }
}
