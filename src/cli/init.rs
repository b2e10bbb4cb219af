//! Init command implementation

use otpctl_core::config::toml_config::{get_config_path, save_config_to_path};
use otpctl_core::config::OtpctlConfig;
use otpctl_core::error::OtpctlError;

/// Write a default config.toml unless one already exists
pub fn run_init(force: bool) -> Result<(), OtpctlError> {
    let path = get_config_path()?;

    if path.exists() && !force {
        println!("Configuration already exists at {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    save_config_to_path(&OtpctlConfig::default(), &path)?;
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}
