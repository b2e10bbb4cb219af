//! otpauth:// provisioning URIs
//!
//! Builds the Key URI format understood by authenticator apps. Rendering the
//! URI as a QR image is left to external tools.

use crate::error::{ConfigError, OtpctlError, StoreError};
use crate::store::KeyEntry;
use crate::types::{KeyKind, OtpSecret};
use url::Url;

/// Build the provisioning URI for a stored key
///
/// The label is `issuer:name`, so neither part may contain `:`. Other
/// reserved characters (including `/`) are percent-encoded. TOTP keys carry
/// `period`, HOTP keys carry the current `counter`.
pub fn otpauth_uri(
    entry: &KeyEntry,
    secret: &OtpSecret,
    issuer: &str,
) -> Result<String, OtpctlError> {
    if issuer.trim().is_empty() || issuer.contains(':') {
        return Err(OtpctlError::Config(ConfigError::ValidationError {
            message: format!("Issuer '{}' must be non-empty and cannot contain ':'", issuer),
        }));
    }
    if entry.name.contains(':') {
        return Err(OtpctlError::Store(StoreError::InvalidName {
            name: entry.name.clone(),
        }));
    }

    let base = format!("otpauth://{}/", entry.kind.otpauth_type());
    let mut url = Url::parse(&base).expect("otpauth base URL is valid");

    url.path_segments_mut()
        .expect("otpauth URL has a hierarchical path")
        .clear()
        .push(&format!("{}:{}", issuer, entry.name));

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("secret", secret.normalized().expose())
            .append_pair("issuer", issuer)
            .append_pair("algorithm", "SHA1")
            .append_pair("digits", &entry.digits.to_string());

        match entry.kind {
            KeyKind::Time => {
                query.append_pair("period", &entry.period().to_string());
            }
            KeyKind::Counter => {
                query.append_pair("counter", &entry.counter().to_string());
            }
        }
    }

    Ok(url.to_string())
}
