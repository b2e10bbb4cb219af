//! TOML configuration file I/O
//!
//! Handles loading and saving otpctl configuration to/from TOML files
//! in the user's configuration directory.

use crate::config::OtpctlConfig;
use crate::error::{ConfigError, OtpctlError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV_VAR: &str = "OTPCTL_CONFIG_DIR";

/// Get the configuration directory
///
/// Returns ~/.config/otpctl, or OTPCTL_CONFIG_DIR if set
pub fn get_config_dir() -> Result<PathBuf, OtpctlError> {
    if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        OtpctlError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(".config").join("otpctl"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, OtpctlError> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from the default TOML file
pub fn load_config() -> Result<OtpctlConfig, OtpctlError> {
    let config_path = get_config_path()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific TOML file
///
/// A missing file is not an error; defaults are returned instead.
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<OtpctlConfig, OtpctlError> {
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No configuration at {:?}, using defaults", path.as_ref());
            return Ok(OtpctlConfig::default());
        }
        Err(e) => {
            return Err(OtpctlError::Config(ConfigError::IoError {
                message: format!("Failed to read config file: {}", e),
            }))
        }
    };

    let config: OtpctlConfig = toml::from_str(&contents).map_err(|e| {
        OtpctlError::Config(ConfigError::ValidationError {
            message: format!("Failed to parse config file: {}", e),
        })
    })?;

    config
        .validate()
        .map_err(|e| OtpctlError::Config(ConfigError::ValidationError { message: e }))?;

    debug!(
        "Loaded configuration: digits={}, period={}s, window={}, backend={:?}",
        config.defaults.digits,
        config.defaults.period,
        config.verify.window,
        config.storage.backend
    );

    Ok(config)
}

/// Save configuration to a specific TOML file
pub fn save_config_to_path<P: AsRef<Path>>(
    config: &OtpctlConfig,
    path: P,
) -> Result<(), OtpctlError> {
    config
        .validate()
        .map_err(|e| OtpctlError::Config(ConfigError::ValidationError { message: e }))?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            OtpctlError::Config(ConfigError::IoError {
                message: format!("Failed to create config directory: {}", e),
            })
        })?;
    }

    let contents = toml::to_string_pretty(config)?;

    std::fs::write(&path, contents).map_err(|_e| {
        OtpctlError::Config(ConfigError::SaveFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        })
    })?;

    Ok(())
}
