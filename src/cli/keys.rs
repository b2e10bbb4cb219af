//! Stored key commands
//!
//! list, remove, code, uri and verify all operate on keys in the store.

use chrono::Local;
use otpctl_core::error::{OtpError, OtpctlError};
use otpctl_core::store::uri::otpauth_uri;
use otpctl_core::types::KeyKind;

/// Run the list command
pub fn run_list() -> Result<(), OtpctlError> {
    let (_config, store) = super::open_store()?;
    let keys = store.list_keys()?;

    if keys.is_empty() {
        println!("No keys stored. Add one with: otpctl add <name> --secret <base32>");
        return Ok(());
    }

    println!("{:<10} {:<24} {:<8} {:>6} {:>10}  ADDED", "ID", "NAME", "KIND", "DIGITS", "STATE");
    for key in keys {
        let state = match key.kind {
            KeyKind::Time => format!("{}s", key.period()),
            KeyKind::Counter => format!("#{}", key.counter()),
        };
        println!(
            "{:<10} {:<24} {:<8} {:>6} {:>10}  {}",
            key.id.get(..8).unwrap_or(&key.id),
            key.name,
            key.kind,
            key.digits,
            state,
            key.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

/// Run the remove command
pub fn run_remove(reference: &str) -> Result<(), OtpctlError> {
    let (_config, store) = super::open_store()?;
    let removed = store.remove_key(reference)?;
    println!("🗑  Removed key '{}' ({})", removed.name, removed.id);
    Ok(())
}

/// Run the code command
///
/// Outputs only the code to stdout. For counter keys the stored counter
/// has already been advanced when the code is printed.
pub fn run_code(reference: &str) -> Result<(), OtpctlError> {
    let (_config, store) = super::open_store()?;
    let generated = store.generate_code(reference, super::now()?)?;

    println!("{}", generated.code.expose());
    if let Some(remaining) = generated.seconds_remaining {
        eprintln!("valid for {}s", remaining);
    }

    Ok(())
}

/// Run the uri command
pub fn run_uri(reference: &str, issuer: Option<&str>) -> Result<(), OtpctlError> {
    let (config, store) = super::open_store()?;
    let entry = store.find_key(reference)?;
    let secret = store.secret(&entry)?;
    let issuer = issuer.unwrap_or(&config.defaults.issuer);

    println!("{}", otpauth_uri(&entry, &secret, issuer)?);
    Ok(())
}

/// Run the verify command
///
/// A rejected code is reported as an error so the process exits non-zero.
pub fn run_verify(reference: &str, code: &str) -> Result<(), OtpctlError> {
    let (config, store) = super::open_store()?;
    let accepted = store.verify_code(
        reference,
        code,
        super::now()?,
        config.verify.window,
        config.verify.look_ahead,
    )?;

    if !accepted {
        return Err(OtpctlError::Otp(OtpError::CodeRejected));
    }

    println!("✅ Code accepted");
    Ok(())
}
