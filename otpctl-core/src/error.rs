//! Error types for the otpctl tool
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.
//! The code-generation engine itself is infallible; these errors come from
//! validation, storage and configuration around it.

use thiserror::Error;

/// Main error type for the otpctl application
#[derive(Error, Debug)]
pub enum OtpctlError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to the key metadata store
    #[error("Key store error: {0}")]
    Store(#[from] StoreError),

    /// Errors related to secret storage
    #[error("Keyring error: {0}")]
    Keyring(#[from] KeyringError),

    /// Errors related to OTP input validation
    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Key store errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Key reference is ambiguous: {key} matches {matches} keys")]
    AmbiguousKey { key: String, matches: usize },

    #[error("A key named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Key name cannot be empty")]
    EmptyName,

    #[error("Key name '{name}' cannot contain ':'")]
    InvalidName { name: String },

    #[error("HOTP counter overflow for key {key}")]
    CounterOverflow { key: String },

    #[error("Failed to read key store: {message}")]
    LoadFailed { message: String },

    #[error("Failed to write key store: {message}")]
    SaveFailed { message: String },

    #[error("Failed to lock key store: {message}")]
    LockFailed { message: String },
}

/// Secret storage errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyringError {
    #[error("Keyring service unavailable")]
    ServiceUnavailable,

    #[error("Failed to store secret in keyring")]
    StoreFailed,

    #[error("Failed to retrieve secret from keyring")]
    RetrieveFailed,

    #[error("Secret not found for key {key}")]
    SecretNotFound { key: String },
}

/// OTP input validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid Base32 secret: no usable key bytes")]
    InvalidSecret,

    #[error("Invalid digit count {digits}: must be between 4 and 10")]
    InvalidDigits { digits: u32 },

    #[error("Invalid period: must be greater than zero")]
    InvalidPeriod,

    #[error("System time error")]
    TimeError,

    #[error("Code rejected")]
    CodeRejected,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OtpctlError>;
