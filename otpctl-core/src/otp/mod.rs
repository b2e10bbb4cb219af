//! One-time password engine
//!
//! Base32 decoding, HMAC-SHA1, dynamic truncation and the HOTP/TOTP
//! generators built from them. Everything here is stateless.

pub mod base32;
pub mod clock;
pub mod hmac;
pub mod hotp;
pub mod totp;
pub mod truncate;
pub mod verify;

pub use hotp::{compute_hotp, DEFAULT_DIGITS};
pub use totp::{compute_totp, DEFAULT_PERIOD};
