//! Configuration module
//!
//! Handles loading and saving otpctl settings from TOML files.

use crate::otp::{DEFAULT_DIGITS, DEFAULT_PERIOD};
use crate::types::{validate_digits, validate_period};
use serde::{Deserialize, Serialize};

pub mod toml_config;

/// Default issuer label used in otpauth URIs
pub const DEFAULT_ISSUER: &str = "otpctl";

/// Default number of adjacent TOTP steps accepted on each side when verifying
pub const DEFAULT_TOTP_WINDOW: u64 = 1;

/// Default number of HOTP counters checked ahead of the stored one when verifying
pub const DEFAULT_HOTP_LOOK_AHEAD: u64 = 10;

/// Largest accepted TOTP verification window
pub const MAX_TOTP_WINDOW: u64 = 10;

/// Largest accepted HOTP look-ahead
pub const MAX_HOTP_LOOK_AHEAD: u64 = 100;

/// Defaults applied to newly added keys and ad-hoc codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Code length (4..=10)
    pub digits: u32,

    /// TOTP period in seconds
    pub period: u64,

    /// Issuer shown by authenticator apps
    pub issuer: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// Resynchronization windows for code verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifySettings {
    /// TOTP steps accepted before and after the current one
    pub window: u64,

    /// HOTP counters checked ahead of the stored counter
    pub look_ahead: u64,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_TOTP_WINDOW,
            look_ahead: DEFAULT_HOTP_LOOK_AHEAD,
        }
    }
}

/// Where key secrets live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// System keyring (Secret Service on Linux)
    #[default]
    Keyring,
    /// `secrets.toml` next to the key store, readable only by the owner
    File,
}

/// Secret storage settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: SecretBackend,
}

/// Complete otpctl configuration
///
/// Every section is optional in the file; missing sections take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpctlConfig {
    pub defaults: Defaults,
    pub verify: VerifySettings,
    pub storage: StorageSettings,
}

impl OtpctlConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_digits(self.defaults.digits).map_err(|e| e.to_string())?;
        validate_period(self.defaults.period).map_err(|e| e.to_string())?;

        if self.defaults.issuer.trim().is_empty() {
            return Err("Issuer cannot be empty".to_string());
        }

        if self.defaults.issuer.contains(':') {
            return Err("Issuer cannot contain ':'".to_string());
        }

        if self.verify.window > MAX_TOTP_WINDOW {
            return Err(format!(
                "Verify window {} is too large (at most {})",
                self.verify.window, MAX_TOTP_WINDOW
            ));
        }

        if self.verify.look_ahead > MAX_HOTP_LOOK_AHEAD {
            return Err(format!(
                "Verify look-ahead {} is too large (at most {})",
                self.verify.look_ahead, MAX_HOTP_LOOK_AHEAD
            ));
        }

        Ok(())
    }
}
