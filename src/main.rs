//! otpctl - HOTP/TOTP one-time code generator
//!
//! A command-line tool for computing RFC 4226/6238 codes from Base32
//! secrets and for managing stored keys with persisted HOTP counters.

use clap::{Parser, Subcommand};
use otpctl_core::{
    error::{OtpError, OtpctlError},
    init_logging,
};

mod cli;

#[derive(Parser)]
#[command(name = "otpctl")]
#[command(version)]
#[command(about = "HOTP/TOTP one-time code generator with a local key store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute an HOTP code from a secret and counter
    Hotp {
        /// Base32-encoded secret
        #[arg(long)]
        secret: String,
        /// Counter value
        #[arg(long)]
        counter: u64,
        /// Code length (default from config)
        #[arg(long)]
        digits: Option<u32>,
    },
    /// Compute a TOTP code from a secret
    Totp {
        /// Base32-encoded secret
        #[arg(long)]
        secret: String,
        /// Time step in seconds (default from config)
        #[arg(long)]
        period: Option<u64>,
        /// Code length (default from config)
        #[arg(long)]
        digits: Option<u32>,
        /// Unix time in seconds (default: now)
        #[arg(long)]
        at: Option<u64>,
    },
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Add a key to the store
    Add(cli::add::AddArgs),
    /// List stored keys
    List,
    /// Remove a stored key
    Remove {
        /// Key id, id prefix or name
        key: String,
    },
    /// Generate the current code for a stored key
    Code {
        /// Key id, id prefix or name
        key: String,
    },
    /// Print the otpauth:// provisioning URI for a stored key
    Uri {
        /// Key id, id prefix or name
        key: String,
        /// Issuer label (default from config)
        #[arg(long)]
        issuer: Option<String>,
    },
    /// Check a code against a stored key
    Verify {
        /// Key id, id prefix or name
        key: String,
        /// Code to check
        code: String,
    },
}

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Hotp {
            secret,
            counter,
            digits,
        } => cli::code::run_hotp(&secret, counter, digits),
        Commands::Totp {
            secret,
            period,
            digits,
            at,
        } => cli::code::run_totp(&secret, period, digits, at),
        Commands::Init { force } => cli::init::run_init(force),
        Commands::Add(args) => cli::add::run_add(args),
        Commands::List => cli::keys::run_list(),
        Commands::Remove { key } => cli::keys::run_remove(&key),
        Commands::Code { key } => cli::keys::run_code(&key),
        Commands::Uri { key, issuer } => cli::keys::run_uri(&key, issuer.as_deref()),
        Commands::Verify { key, code } => cli::keys::run_verify(&key, &code),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // A rejected code is an ordinary negative answer (exit code 1)
                OtpctlError::Otp(OtpError::CodeRejected) => 1,
                // Configuration and input errors (exit code 2)
                OtpctlError::Config(_)
                | OtpctlError::Toml(_)
                | OtpctlError::TomlSerialize(_)
                | OtpctlError::Otp(_) => 2,
                // Secret storage unavailable or misconfigured (exit code 2)
                OtpctlError::Keyring(_) => 2,
                // Store and I/O failures (exit code 1 - runtime)
                OtpctlError::Store(_) | OtpctlError::Io(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
