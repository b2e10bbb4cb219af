//! Secret vaults
//!
//! Key metadata lives in `keys.toml`; the Base32 secrets themselves are
//! kept in a [`SecretVault`]. The default vault is the system keyring
//! (GNOME Keyring / Secret Service on Linux).

use crate::error::{KeyringError, OtpctlError};
use crate::types::{OtpSecret, KEYRING_SERVICE_SECRET};
use keyring::Entry;

/// Storage for key secrets, addressed by key id
pub trait SecretVault {
    /// Store (or replace) the secret for a key
    fn store_secret(&self, key_id: &str, secret: &OtpSecret) -> Result<(), OtpctlError>;

    /// Retrieve the secret for a key
    fn retrieve_secret(&self, key_id: &str) -> Result<OtpSecret, OtpctlError>;

    /// Delete the secret for a key; deleting a missing secret succeeds
    fn delete_secret(&self, key_id: &str) -> Result<(), OtpctlError>;
}

impl<V: SecretVault + ?Sized> SecretVault for Box<V> {
    fn store_secret(&self, key_id: &str, secret: &OtpSecret) -> Result<(), OtpctlError> {
        (**self).store_secret(key_id, secret)
    }

    fn retrieve_secret(&self, key_id: &str) -> Result<OtpSecret, OtpctlError> {
        (**self).retrieve_secret(key_id)
    }

    fn delete_secret(&self, key_id: &str) -> Result<(), OtpctlError> {
        (**self).delete_secret(key_id)
    }
}

/// Vault backed by the system keyring
#[derive(Debug, Clone)]
pub struct KeyringVault {
    service: String,
}

impl KeyringVault {
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE_SECRET)
    }

    /// Use a custom keyring service name
    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key_id: &str) -> Result<Entry, OtpctlError> {
        Entry::new(&self.service, key_id)
            .map_err(|_| OtpctlError::Keyring(KeyringError::ServiceUnavailable))
    }
}

impl Default for KeyringVault {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretVault for KeyringVault {
    fn store_secret(&self, key_id: &str, secret: &OtpSecret) -> Result<(), OtpctlError> {
        self.entry(key_id)?
            .set_password(secret.expose())
            .map_err(|_| OtpctlError::Keyring(KeyringError::StoreFailed))
    }

    fn retrieve_secret(&self, key_id: &str) -> Result<OtpSecret, OtpctlError> {
        match self.entry(key_id)?.get_password() {
            Ok(secret) => Ok(OtpSecret::new(secret)),
            Err(keyring::Error::NoEntry) => Err(OtpctlError::Keyring(KeyringError::SecretNotFound {
                key: key_id.to_string(),
            })),
            Err(_) => Err(OtpctlError::Keyring(KeyringError::RetrieveFailed)),
        }
    }

    fn delete_secret(&self, key_id: &str) -> Result<(), OtpctlError> {
        match self.entry(key_id)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(_) => Err(OtpctlError::Keyring(KeyringError::StoreFailed)),
        }
    }
}
