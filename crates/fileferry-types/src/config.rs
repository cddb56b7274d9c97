//! Configuration value types for fileferry
//!
//! This module provides validated newtypes for the retry policy bounds and the
//! combined retry policy applied to every file action.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of attempts for a retried file action, with validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryAttempts(u32);

impl RetryAttempts {
    /// Minimum number of attempts
    pub const MIN: u32 = 1;
    /// Maximum number of attempts
    pub const MAX: u32 = 25;
    /// Default number of attempts
    pub const DEFAULT: u32 = 5;

    /// Create a new attempt count with validation
    pub fn new(attempts: u32) -> Result<Self, String> {
        if attempts < Self::MIN {
            Err(format!(
                "Retry attempts {} is below minimum {}",
                attempts,
                Self::MIN
            ))
        } else if attempts > Self::MAX {
            Err(format!(
                "Retry attempts {} exceeds maximum {}",
                attempts,
                Self::MAX
            ))
        } else {
            Ok(Self(attempts))
        }
    }

    /// Get the attempt count value
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RetryAttempts {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Fixed delay between retry attempts in seconds, with validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryDelay(u64);

impl RetryDelay {
    /// Minimum delay in seconds
    pub const MIN: u64 = 1;
    /// Maximum delay in seconds
    pub const MAX: u64 = 30;
    /// Default delay in seconds
    pub const DEFAULT: u64 = 3;

    /// Create a new retry delay with validation
    pub fn new(seconds: u64) -> Result<Self, String> {
        if seconds < Self::MIN {
            Err(format!(
                "Retry delay {}s is below minimum {}s",
                seconds,
                Self::MIN
            ))
        } else if seconds > Self::MAX {
            Err(format!(
                "Retry delay {}s exceeds maximum {}s",
                seconds,
                Self::MAX
            ))
        } else {
            Ok(Self(seconds))
        }
    }

    /// Get the delay in seconds
    pub fn get(self) -> u64 {
        self.0
    }

    /// Get the delay as a duration
    pub fn duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for RetryDelay {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Retry policy applied to each file action
///
/// The delay is fixed between attempts. The dominant failure mode is a
/// transient file lock expected to clear within seconds, so exponential
/// backoff would only stretch the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of invocation attempts
    #[serde(default)]
    pub attempts: RetryAttempts,
    /// Fixed delay between attempts
    #[serde(default)]
    pub delay: RetryDelay,
}

impl RetryPolicy {
    /// Create a new retry policy from validated parts
    pub fn new(attempts: RetryAttempts, delay: RetryDelay) -> Self {
        Self { attempts, delay }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_attempts_validation() {
        assert!(RetryAttempts::new(1).is_ok());
        assert!(RetryAttempts::new(25).is_ok());
        assert!(RetryAttempts::new(0).is_err());
        assert!(RetryAttempts::new(26).is_err());
        assert_eq!(RetryAttempts::default().get(), 5);
    }

    #[test]
    fn test_retry_delay_validation() {
        assert!(RetryDelay::new(1).is_ok());
        assert!(RetryDelay::new(30).is_ok());
        assert!(RetryDelay::new(0).is_err());
        assert!(RetryDelay::new(31).is_err());
        assert_eq!(RetryDelay::default().duration(), Duration::from_secs(3));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts.get(), 5);
        assert_eq!(policy.delay.get(), 3);
    }
}
