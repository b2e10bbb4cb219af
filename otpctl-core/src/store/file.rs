//! Plain-file secret vault
//!
//! Stores secrets in `secrets.toml` for systems without a keyring service.
//! The file is replaced atomically and created owner-only (mode 0600 on
//! Unix). Concurrent writers are serialized by the key store lock.

use crate::error::{KeyringError, OtpctlError, StoreError};
use crate::store::keyring::SecretVault;
use crate::store::persist::write_atomic;
use crate::types::OtpSecret;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default secrets file name
pub const SECRETS_FILE_NAME: &str = "secrets.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    secrets: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct FileVault {
    path: PathBuf,
}

impl FileVault {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<SecretsFile, OtpctlError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SecretsFile::default())
            }
            Err(e) => {
                return Err(OtpctlError::Store(StoreError::LoadFailed {
                    message: format!("{}: {}", self.path.display(), e),
                }))
            }
        };

        toml::from_str(&contents).map_err(|e| {
            OtpctlError::Store(StoreError::LoadFailed {
                message: format!("{}: {}", self.path.display(), e),
            })
        })
    }

    fn save(&self, file: &SecretsFile) -> Result<(), OtpctlError> {
        let contents = toml::to_string_pretty(file)?;

        write_atomic(&self.path, &contents).map_err(|e| {
            warn!("Failed to write {}: {}", self.path.display(), e);
            OtpctlError::Keyring(KeyringError::StoreFailed)
        })
    }
}

impl SecretVault for FileVault {
    fn store_secret(&self, key_id: &str, secret: &OtpSecret) -> Result<(), OtpctlError> {
        let mut file = self.load()?;
        file.secrets
            .insert(key_id.to_string(), secret.expose().to_string());
        self.save(&file)
    }

    fn retrieve_secret(&self, key_id: &str) -> Result<OtpSecret, OtpctlError> {
        let mut file = self.load()?;
        file.secrets
            .remove(key_id)
            .map(OtpSecret::new)
            .ok_or_else(|| {
                OtpctlError::Keyring(KeyringError::SecretNotFound {
                    key: key_id.to_string(),
                })
            })
    }

    fn delete_secret(&self, key_id: &str) -> Result<(), OtpctlError> {
        let mut file = self.load()?;
        if file.secrets.remove(key_id).is_some() {
            self.save(&file)?;
        }
        Ok(())
    }
}
