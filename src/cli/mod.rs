//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands.

use otpctl_core::config::{toml_config, OtpctlConfig, SecretBackend};
use otpctl_core::error::OtpctlError;
use otpctl_core::otp::clock::{SystemClock, TimeSource};
use otpctl_core::store::file::SECRETS_FILE_NAME;
use otpctl_core::store::{FileVault, KeyStore, KeyringVault, SecretVault, KEYS_FILE_NAME};

pub mod add;
pub mod code;
pub mod init;
pub mod keys;

/// Store type used by the binary; the vault is chosen by configuration
pub type Store = KeyStore<Box<dyn SecretVault>>;

/// Load the configuration and open the key store it describes
pub fn open_store() -> Result<(OtpctlConfig, Store), OtpctlError> {
    let config = toml_config::load_config()?;
    let config_dir = toml_config::get_config_dir()?;

    let vault: Box<dyn SecretVault> = match config.storage.backend {
        SecretBackend::Keyring => Box::new(KeyringVault::new()),
        SecretBackend::File => Box::new(FileVault::new(config_dir.join(SECRETS_FILE_NAME))),
    };

    let store = KeyStore::new(config_dir.join(KEYS_FILE_NAME), vault);
    Ok((config, store))
}

/// Current Unix time from the system clock
pub fn now() -> Result<u64, OtpctlError> {
    Ok(SystemClock.now()?)
}
