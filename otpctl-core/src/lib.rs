//! Core library for the otpctl one-time password tool
//!
//! This crate provides the HOTP/TOTP code-generation engine together with
//! the key store that owns secrets and persisted HOTP counters.

pub mod error;
pub mod types;

pub mod config;
pub mod otp;
pub mod store;

/// Environment variable controlling log verbosity (error, warn, info, debug, trace)
pub const LOG_ENV_VAR: &str = "OTPCTL_LOG";

/// Initialize logging infrastructure
///
/// Sets up tracing with systemd journal logging when running under systemd.
/// Otherwise logs go to stderr so that stdout stays machine-parsable.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(filter)
                .try_init()?;
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .try_init()?;

    Ok(())
}
