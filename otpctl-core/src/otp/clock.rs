//! Time sources for TOTP generation
//!
//! TOTP reads the current time through [`TimeSource`] rather than the global
//! clock so that callers and tests can pin the instant a code is computed for.

use crate::error::OtpError;
use std::time::{SystemTime, UNIX_EPOCH};

/// Provides the current Unix time in whole seconds
pub trait TimeSource {
    fn now(&self) -> Result<u64, OtpError>;
}

/// Wall-clock time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Result<u64, OtpError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .map_err(|_| OtpError::TimeError)
    }
}

/// A clock frozen at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl TimeSource for FixedClock {
    fn now(&self) -> Result<u64, OtpError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(59).now(), Ok(59));
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        let now = SystemClock.now().unwrap();
        assert!(now > 1_577_836_800);
    }
}
