//! In-memory secret vault
//!
//! Provides a vault that doesn't require system keyring access.
//! Used in CI environments and for testing.

use crate::error::{KeyringError, OtpctlError};
use crate::store::keyring::SecretVault;
use crate::types::OtpSecret;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryVault {
    secrets: Mutex<HashMap<String, String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored secrets
    pub fn len(&self) -> usize {
        self.secrets.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretVault for MemoryVault {
    fn store_secret(&self, key_id: &str, secret: &OtpSecret) -> Result<(), OtpctlError> {
        let mut secrets = self
            .secrets
            .lock()
            .map_err(|_| OtpctlError::Keyring(KeyringError::StoreFailed))?;
        secrets.insert(key_id.to_string(), secret.expose().to_string());
        Ok(())
    }

    fn retrieve_secret(&self, key_id: &str) -> Result<OtpSecret, OtpctlError> {
        let secrets = self
            .secrets
            .lock()
            .map_err(|_| OtpctlError::Keyring(KeyringError::RetrieveFailed))?;
        secrets
            .get(key_id)
            .cloned()
            .map(OtpSecret::new)
            .ok_or_else(|| {
                OtpctlError::Keyring(KeyringError::SecretNotFound {
                    key: key_id.to_string(),
                })
            })
    }

    fn delete_secret(&self, key_id: &str) -> Result<(), OtpctlError> {
        let mut secrets = self
            .secrets
            .lock()
            .map_err(|_| OtpctlError::Keyring(KeyringError::StoreFailed))?;
        secrets.remove(key_id);
        Ok(())
    }
}
