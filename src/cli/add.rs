//! Add command implementation
//!
//! Enrolls a key in the store. The secret comes from `--secret`,
//! `--generate`, or an interactive prompt.

use clap::Args;
use otpctl_core::error::OtpctlError;
use otpctl_core::store::{generate_secret, NewKey};
use otpctl_core::types::{KeyKind, OtpSecret};
use std::io::{self, Write};

#[derive(Args)]
pub struct AddArgs {
    /// Display name of the key
    pub name: String,
    /// Base32-encoded secret (prompted for when omitted)
    #[arg(long, conflicts_with = "generate")]
    pub secret: Option<String>,
    /// Generate a random 160-bit secret
    #[arg(long)]
    pub generate: bool,
    /// Key kind: time (TOTP) or counter (HOTP)
    #[arg(long, default_value = "time")]
    pub kind: KeyKind,
    /// Initial HOTP counter
    #[arg(long, default_value_t = 0)]
    pub counter: u64,
    /// Code length (default from config)
    #[arg(long)]
    pub digits: Option<u32>,
    /// TOTP period in seconds (default from config)
    #[arg(long)]
    pub period: Option<u64>,
}

/// Run the add command
pub fn run_add(args: AddArgs) -> Result<(), OtpctlError> {
    let (config, store) = super::open_store()?;

    let secret = match (args.secret, args.generate) {
        (Some(secret), _) => OtpSecret::new(secret),
        (None, true) => generate_secret(),
        (None, false) => collect_secret()?,
    };

    let new_key = NewKey {
        name: args.name,
        secret: secret.clone(),
        kind: args.kind,
        counter: args.counter,
        digits: args.digits.unwrap_or(config.defaults.digits),
        period: args.period.unwrap_or(config.defaults.period),
    };

    let entry = store.add_key(new_key)?;

    println!("✅ Added {} key '{}'", entry.kind, entry.name);
    println!("   id: {}", entry.id);
    if args.generate {
        println!("   secret: {}", secret.expose());
    }

    Ok(())
}

/// Prompt for a Base32 secret until a usable one is entered
fn collect_secret() -> Result<OtpSecret, OtpctlError> {
    println!("Enter the Base32-encoded secret (e.g., JBSWY3DPEHPK3PXP)");

    loop {
        let input = prompt_input("Secret: ")?;
        if input.trim().is_empty() {
            println!("❌ Secret cannot be empty. Please try again.");
            continue;
        }

        let secret = OtpSecret::new(input);
        match secret.validate() {
            Ok(()) => return Ok(secret),
            Err(_) => {
                println!("❌ No valid Base32 characters found. Valid characters: A-Z, 2-7");
                continue;
            }
        }
    }
}

/// Low-level input prompting
fn prompt_input(prompt: &str) -> Result<String, OtpctlError> {
    print!("{}", prompt);
    io::stdout().flush().map_err(OtpctlError::Io)?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input).map_err(OtpctlError::Io)? == 0 {
        return Err(OtpctlError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no secret provided on stdin",
        )));
    }

    Ok(input.trim_end().to_string())
}
