//! # Watchdog configuration.
//!
//! Provides [`Config`] centralized settings for a [`TimeoutSupervisor`](crate::TimeoutSupervisor).
//!
//! ## Sentinel values
//! - `timeout = 0s` → invalid, rejected by [`Config::validate`]
//! - `bus_capacity = 0` → clamped to 1 by [`Config::bus_capacity_clamped`]

use std::time::Duration;

use crate::error::ConfigError;

/// Default countdown duration shared by every key.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration for the watchdog.
///
/// ## Field semantics
/// - `timeout`: Silence allowed on a key before its action fires (must be `> 0`)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
///
/// ## Notes
/// All fields are public. The supervisor copies the config at construction;
/// changing it afterwards has no effect on a running instance.
#[derive(Clone, Debug)]
pub struct Config {
    /// Countdown duration applied uniformly to every key.
    ///
    /// Fixed for the lifetime of the supervisor.
    pub timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Default configuration with the timeout given in whole seconds.
    ///
    /// ```
    /// use feedwatch::Config;
    /// use std::time::Duration;
    ///
    /// assert_eq!(Config::with_timeout_secs(5).timeout, Duration::from_secs(5));
    /// ```
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(secs),
            ..Self::default()
        }
    }

    /// Rejects configurations the supervisor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `timeout = 3s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout, Duration::from_secs(3));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert_eq!(
            Config::with_timeout_secs(0).validate(),
            Err(ConfigError::ZeroTimeout)
        );
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
