use chrono::Duration;

use crate::domain::error::ConfigurationError;

const MAX_WINDOW_DAYS: i64 = 30;

/// How many failures within which window lock a key out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_attempts: u32,
    window: Duration,
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, window: Duration) -> Result<Self, ConfigurationError> {
        if max_attempts == 0 {
            return Err(ConfigurationError::InvalidLockoutPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if window <= Duration::zero() {
            return Err(ConfigurationError::InvalidLockoutPolicy(
                "window must be positive".to_string(),
            ));
        }
        if window > Duration::days(MAX_WINDOW_DAYS) {
            return Err(ConfigurationError::InvalidLockoutPolicy(format!(
                "window must not exceed {MAX_WINDOW_DAYS} days"
            )));
        }
        Ok(Self {
            max_attempts,
            window,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window: Duration::minutes(15),
        }
    }
}
