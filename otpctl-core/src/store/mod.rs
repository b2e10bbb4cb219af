//! Key store
//!
//! Owns everything the stateless engine does not: named keys, their
//! generation parameters and the persisted HOTP counters. Metadata is kept
//! in `keys.toml`; secrets go to a [`SecretVault`]. Every change holds an
//! exclusive lock on `keys.lock` from load to save.

use crate::error::{OtpctlError, StoreError};
use crate::otp::base32::encode_base32;
use crate::otp::hotp::compute_hotp;
use crate::otp::totp::{compute_totp, seconds_remaining};
use crate::otp::verify::{verify_hotp, verify_totp};
use crate::otp::{DEFAULT_DIGITS, DEFAULT_PERIOD};
use crate::types::{validate_digits, validate_period, KeyKind, OtpCode, OtpSecret};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod file;
pub mod keyring;
pub mod memory;
mod persist;
pub mod uri;

pub use self::file::FileVault;
pub use self::keyring::{KeyringVault, SecretVault};
pub use self::memory::MemoryVault;
use self::persist::{write_atomic, StoreLock};

/// Default key store file name
pub const KEYS_FILE_NAME: &str = "keys.toml";

/// Length in bytes of generated secrets (160 bits, as RFC 4226 recommends)
pub const GENERATED_SECRET_BYTES: usize = 20;

/// A stored key, without its secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub id: String,
    pub name: String,
    pub kind: KeyKind,

    /// Next HOTP counter to use (counter keys only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<u64>,

    pub digits: u32,

    /// TOTP period in seconds (time keys only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u64>,

    pub created_at: DateTime<Utc>,
}

impl KeyEntry {
    /// Stored HOTP counter, zero if never set
    pub fn counter(&self) -> u64 {
        self.counter.unwrap_or(0)
    }

    /// TOTP period, falling back to the RFC 6238 default
    pub fn period(&self) -> u64 {
        self.period.unwrap_or(DEFAULT_PERIOD)
    }
}

/// Parameters for enrolling a new key
#[derive(Debug, Clone)]
pub struct NewKey {
    pub name: String,
    pub secret: OtpSecret,
    pub kind: KeyKind,
    /// Initial HOTP counter
    pub counter: u64,
    pub digits: u32,
    pub period: u64,
}

impl NewKey {
    /// TOTP key with default digits and period
    pub fn time(name: &str, secret: OtpSecret) -> Self {
        Self {
            name: name.to_string(),
            secret,
            kind: KeyKind::Time,
            counter: 0,
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
        }
    }

    /// HOTP key starting at `counter`
    pub fn counter(name: &str, secret: OtpSecret, counter: u64) -> Self {
        Self {
            kind: KeyKind::Counter,
            counter,
            ..Self::time(name, secret)
        }
    }
}

/// A code produced for a stored key
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub code: OtpCode,
    pub kind: KeyKind,
    /// HOTP counter the code was computed for
    pub counter: Option<u64>,
    /// Seconds until a TOTP code expires
    pub seconds_remaining: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct KeysFile {
    #[serde(default, rename = "key")]
    keys: Vec<KeyEntry>,
}

/// File-backed key store
///
/// Every operation reloads `keys.toml` and atomically replaces it when it
/// changes, so a HOTP counter advance is persisted before the code leaves
/// the store. Stores opened on the same path in other threads or processes
/// never hand out the same counter twice.
#[derive(Debug)]
pub struct KeyStore<V: SecretVault> {
    path: PathBuf,
    vault: V,
}

impl<V: SecretVault> KeyStore<V> {
    pub fn new<P: AsRef<Path>>(path: P, vault: V) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            vault,
        }
    }

    /// Hold the store lock until the returned guard is dropped
    fn lock(&self) -> Result<StoreLock, OtpctlError> {
        StoreLock::acquire(&self.path.with_extension("lock"))
    }

    fn load(&self) -> Result<KeysFile, OtpctlError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Key store {:?} does not exist yet", self.path);
                return Ok(KeysFile::default());
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

    fn save(&self, file: &KeysFile) -> Result<(), OtpctlError> {
        let contents = toml::to_string_pretty(file)?;

        write_atomic(&self.path, &contents).map_err(|e| {
            OtpctlError::Store(StoreError::SaveFailed {
                message: format!("{}: {}", self.path.display(), e),
            })
        })
    }

    /// Enroll a new key
    ///
    /// Unlike the lenient generators, enrollment is strict: the secret must
    /// decode to at least one byte and digits/period must be in range.
    pub fn add_key(&self, new_key: NewKey) -> Result<KeyEntry, OtpctlError> {
        let name = new_key.name.trim().to_string();
        if name.is_empty() {
            return Err(OtpctlError::Store(StoreError::EmptyName));
        }
        if name.contains(':') {
            return Err(OtpctlError::Store(StoreError::InvalidName { name }));
        }

        let secret = new_key.secret.normalized();
        secret.validate()?;
        let digits = validate_digits(new_key.digits)?;

        let _lock = self.lock()?;
        let mut file = self.load()?;
        if file.keys.iter().any(|k| k.name == name) {
            return Err(OtpctlError::Store(StoreError::DuplicateName { name }));
        }

        let (counter, period) = match new_key.kind {
            KeyKind::Time => (None, Some(validate_period(new_key.period)?)),
            KeyKind::Counter => (Some(new_key.counter), None),
        };

        let entry = KeyEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            kind: new_key.kind,
            counter,
            digits,
            period,
            created_at: Utc::now(),
        };

        self.vault.store_secret(&entry.id, &secret)?;

        file.keys.push(entry.clone());
        if let Err(e) = self.save(&file) {
            if let Err(cleanup) = self.vault.delete_secret(&entry.id) {
                warn!("Failed to remove orphaned secret for {}: {}", entry.id, cleanup);
            }
            return Err(e);
        }

        info!("Added {} key '{}' ({})", entry.kind, entry.name, entry.id);
        Ok(entry)
    }

    /// All stored keys in enrollment order
    pub fn list_keys(&self) -> Result<Vec<KeyEntry>, OtpctlError> {
        Ok(self.load()?.keys)
    }

    /// Resolve a key reference to its position in the file
    ///
    /// Matches an exact id, then an exact name, then a unique id prefix.
    fn position(keys: &[KeyEntry], reference: &str) -> Result<usize, OtpctlError> {
        if let Some(index) = keys.iter().position(|k| k.id == reference) {
            return Ok(index);
        }

        if let Some(index) = keys.iter().position(|k| k.name == reference) {
            return Ok(index);
        }

        let prefixed: Vec<usize> = keys
            .iter()
            .enumerate()
            .filter(|(_, k)| !reference.is_empty() && k.id.starts_with(reference))
            .map(|(i, _)| i)
            .collect();

        match prefixed.as_slice() {
            [index] => Ok(*index),
            [] => Err(OtpctlError::Store(StoreError::KeyNotFound {
                key: reference.to_string(),
            })),
            many => Err(OtpctlError::Store(StoreError::AmbiguousKey {
                key: reference.to_string(),
                matches: many.len(),
            })),
        }
    }

    /// Look up a key by id, name or unique id prefix
    pub fn find_key(&self, reference: &str) -> Result<KeyEntry, OtpctlError> {
        let file = self.load()?;
        let index = Self::position(&file.keys, reference)?;
        Ok(file.keys[index].clone())
    }

    /// Secret of a stored key
    pub fn secret(&self, entry: &KeyEntry) -> Result<OtpSecret, OtpctlError> {
        self.vault.retrieve_secret(&entry.id)
    }

    /// Remove a key and its secret
    pub fn remove_key(&self, reference: &str) -> Result<KeyEntry, OtpctlError> {
        let _lock = self.lock()?;
        let mut file = self.load()?;
        let index = Self::position(&file.keys, reference)?;
        let removed = file.keys.remove(index);
        self.save(&file)?;

        if let Err(e) = self.vault.delete_secret(&removed.id) {
            warn!("Key '{}' removed but its secret could not be deleted: {}", removed.name, e);
        }

        info!("Removed key '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Produce the current code for a stored key
    ///
    /// For counter keys the stored counter is advanced by exactly one and
    /// written back before the code is returned.
    pub fn generate_code(&self, reference: &str, at_time: u64) -> Result<GeneratedCode, OtpctlError> {
        let _lock = self.lock()?;
        let mut file = self.load()?;
        let index = Self::position(&file.keys, reference)?;
        let entry = file.keys[index].clone();
        let secret = self.secret(&entry)?;

        match entry.kind {
            KeyKind::Time => {
                let period = entry.period();
                let code = compute_totp(secret.expose(), period, entry.digits, at_time);
                Ok(GeneratedCode {
                    code: OtpCode::new(code),
                    kind: KeyKind::Time,
                    counter: None,
                    seconds_remaining: Some(seconds_remaining(period, at_time)),
                })
            }
            KeyKind::Counter => {
                let counter = entry.counter();
                let next = counter.checked_add(1).ok_or_else(|| {
                    OtpctlError::Store(StoreError::CounterOverflow {
                        key: entry.id.clone(),
                    })
                })?;

                let code = compute_hotp(secret.expose(), counter, entry.digits);
                file.keys[index].counter = Some(next);
                self.save(&file)?;
                debug!("Advanced counter of '{}' to {}", entry.name, next);

                Ok(GeneratedCode {
                    code: OtpCode::new(code),
                    kind: KeyKind::Counter,
                    counter: Some(counter),
                    seconds_remaining: None,
                })
            }
        }
    }

    /// Check a code for a stored key
    ///
    /// TOTP codes are accepted within `window` steps of `at_time`. HOTP
    /// codes are searched up to `look_ahead` counters past the stored one;
    /// on a match the stored counter moves past the matched value.
    pub fn verify_code(
        &self,
        reference: &str,
        code: &str,
        at_time: u64,
        window: u64,
        look_ahead: u64,
    ) -> Result<bool, OtpctlError> {
        let _lock = self.lock()?;
        let mut file = self.load()?;
        let index = Self::position(&file.keys, reference)?;
        let entry = file.keys[index].clone();
        let secret = self.secret(&entry)?;

        match entry.kind {
            KeyKind::Time => Ok(verify_totp(
                secret.expose(),
                code,
                entry.period(),
                entry.digits,
                at_time,
                window,
            )),
            KeyKind::Counter => {
                let Some(matched) =
                    verify_hotp(secret.expose(), code, entry.counter(), entry.digits, look_ahead)
                else {
                    return Ok(false);
                };

                let next = matched.checked_add(1).ok_or_else(|| {
                    OtpctlError::Store(StoreError::CounterOverflow {
                        key: entry.id.clone(),
                    })
                })?;
                file.keys[index].counter = Some(next);
                self.save(&file)?;
                debug!("Resynchronized counter of '{}' to {}", entry.name, next);
                Ok(true)
            }
        }
    }
}

/// Generate a random Base32 secret
pub fn generate_secret() -> OtpSecret {
    let mut bytes = [0u8; GENERATED_SECRET_BYTES];
    rand::thread_rng().fill(&mut bytes);
    OtpSecret::new(encode_base32(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OtpError;
    use tempfile::{tempdir, TempDir};

    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn store() -> (TempDir, KeyStore<MemoryVault>) {
        let temp_dir = tempdir().unwrap();
        let store = KeyStore::new(temp_dir.path().join(KEYS_FILE_NAME), MemoryVault::new());
        (temp_dir, store)
    }

    fn secret(s: &str) -> OtpSecret {
        OtpSecret::new(s.to_string())
    }

    #[test]
    fn test_add_and_list() {
        let (_dir, store) = store();
        let added = store.add_key(NewKey::time("github", secret(RFC_SECRET))).unwrap();

        let keys = store.list_keys().unwrap();
        assert_eq!(keys, vec![added.clone()]);
        assert_eq!(added.period, Some(30));
        assert_eq!(added.counter, None);
        assert_eq!(store.secret(&added).unwrap().expose(), RFC_SECRET);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let (_dir, store) = store();

        let empty_name = store.add_key(NewKey::time("  ", secret(RFC_SECRET)));
        assert!(matches!(empty_name, Err(OtpctlError::Store(StoreError::EmptyName))));

        let colon_name = store.add_key(NewKey::time("acme:alice", secret(RFC_SECRET)));
        assert!(matches!(
            colon_name,
            Err(OtpctlError::Store(StoreError::InvalidName { .. }))
        ));

        let bad_secret = store.add_key(NewKey::time("x", secret("!!!")));
        assert!(matches!(bad_secret, Err(OtpctlError::Otp(OtpError::InvalidSecret))));

        let mut bad_digits = NewKey::time("x", secret(RFC_SECRET));
        bad_digits.digits = 3;
        assert!(matches!(
            store.add_key(bad_digits),
            Err(OtpctlError::Otp(OtpError::InvalidDigits { digits: 3 }))
        ));

        let mut bad_period = NewKey::time("x", secret(RFC_SECRET));
        bad_period.period = 0;
        assert!(matches!(
            store.add_key(bad_period),
            Err(OtpctlError::Otp(OtpError::InvalidPeriod))
        ));

        assert!(store.list_keys().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_dir, store) = store();
        store.add_key(NewKey::time("github", secret(RFC_SECRET))).unwrap();
        let result = store.add_key(NewKey::time("github", secret(RFC_SECRET)));
        assert!(matches!(
            result,
            Err(OtpctlError::Store(StoreError::DuplicateName { .. }))
        ));
    }

    #[test]
    fn test_secret_is_normalized() {
        let (_dir, store) = store();
        let added = store
            .add_key(NewKey::time("spaced", secret("gezd gnbv gy3t qojq")))
            .unwrap();
        assert_eq!(store.secret(&added).unwrap().expose(), "GEZDGNBVGY3TQOJQ");
    }

    #[test]
    fn test_hotp_counter_advances_once_per_code() {
        let (_dir, store) = store();
        store
            .add_key(NewKey::counter("bank", secret(RFC_SECRET), 0))
            .unwrap();

        let expected = ["755224", "287082", "359152"];
        for (i, code) in expected.iter().enumerate() {
            let generated = store.generate_code("bank", 0).unwrap();
            assert_eq!(generated.code.expose(), *code);
            assert_eq!(generated.counter, Some(i as u64));
        }

        assert_eq!(store.find_key("bank").unwrap().counter, Some(3));
    }

    #[test]
    fn test_hotp_counter_overflow() {
        let (_dir, store) = store();
        store
            .add_key(NewKey::counter("edge", secret(RFC_SECRET), u64::MAX))
            .unwrap();

        let result = store.generate_code("edge", 0);
        assert!(matches!(
            result,
            Err(OtpctlError::Store(StoreError::CounterOverflow { .. }))
        ));
        assert_eq!(store.find_key("edge").unwrap().counter, Some(u64::MAX));
    }

    #[test]
    fn test_totp_code_does_not_touch_store() {
        let (_dir, store) = store();
        let mut key = NewKey::time("rfc", secret(RFC_SECRET));
        key.digits = 8;
        let added = store.add_key(key).unwrap();

        let generated = store.generate_code(&added.id, 59).unwrap();
        assert_eq!(generated.code.expose(), "94287082");
        assert_eq!(generated.seconds_remaining, Some(1));
        assert_eq!(store.find_key(&added.id).unwrap(), added);
    }

    #[test]
    fn test_find_by_prefix() {
        let (_dir, store) = store();
        let added = store.add_key(NewKey::time("github", secret(RFC_SECRET))).unwrap();
        let found = store.find_key(&added.id[..8]).unwrap();
        assert_eq!(found, added);

        assert!(matches!(
            store.find_key("nope"),
            Err(OtpctlError::Store(StoreError::KeyNotFound { .. }))
        ));
        assert!(matches!(
            store.find_key(""),
            Err(OtpctlError::Store(StoreError::KeyNotFound { .. }))
        ));
    }

    #[test]
    fn test_remove_key() {
        let (_dir, store) = store();
        let added = store.add_key(NewKey::time("github", secret(RFC_SECRET))).unwrap();

        let removed = store.remove_key("github").unwrap();
        assert_eq!(removed, added);
        assert!(store.list_keys().unwrap().is_empty());
        assert!(store.secret(&added).is_err());

        assert!(matches!(
            store.remove_key("github"),
            Err(OtpctlError::Store(StoreError::KeyNotFound { .. }))
        ));
    }

    #[test]
    fn test_verify_hotp_resynchronizes() {
        let (_dir, store) = store();
        store
            .add_key(NewKey::counter("bank", secret(RFC_SECRET), 0))
            .unwrap();

        // code for counter 3 while the store is at 0
        assert!(store.verify_code("bank", "969429", 0, 1, 10).unwrap());
        assert_eq!(store.find_key("bank").unwrap().counter, Some(4));

        // replay is rejected
        assert!(!store.verify_code("bank", "969429", 0, 1, 10).unwrap());
    }

    #[test]
    fn test_verify_totp() {
        let (_dir, store) = store();
        let mut key = NewKey::time("rfc", secret(RFC_SECRET));
        key.digits = 8;
        store.add_key(key).unwrap();

        assert!(store.verify_code("rfc", "94287082", 89, 1, 0).unwrap());
        assert!(!store.verify_code("rfc", "94287082", 89, 0, 0).unwrap());
    }

    #[test]
    fn test_generate_secret() {
        let generated = generate_secret();
        assert_eq!(generated.expose().len(), 32);
        assert!(generated.validate().is_ok());
        assert_ne!(generated.expose(), generate_secret().expose());
    }
}
