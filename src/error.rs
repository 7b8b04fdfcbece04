//! Error types used by the watchdog and its actions.
//!
//! This module defines two enums:
//!
//! - [`ConfigError`]: the supervisor could not be constructed.
//! - [`ActionError`]: an expiry action reported a failure.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Neither is ever returned from the registration API: once a supervisor exists,
//! every public operation absorbs failures instead of surfacing them.

use thiserror::Error;

/// # Errors produced while building a supervisor.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The countdown duration was zero; every key would expire immediately.
    #[error("timeout must be positive")]
    ZeroTimeout,

    /// No tokio runtime was available to drive countdown timers.
    #[error("no tokio runtime available; build inside a runtime or pass a handle")]
    NoRuntime,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use feedwatch::ConfigError;
    ///
    /// assert_eq!(ConfigError::ZeroTimeout.as_label(), "config_zero_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroTimeout => "config_zero_timeout",
            ConfigError::NoRuntime => "config_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::ZeroTimeout => "timeout: must be greater than zero".to_string(),
            ConfigError::NoRuntime => "runtime: no tokio runtime handle".to_string(),
        }
    }
}

/// # Errors produced by expiry actions.
///
/// An action returning `Err` is logged and published as
/// [`EventKind::ActionFailed`](crate::EventKind::ActionFailed); the countdown
/// stays dormant exactly as it would after a successful run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActionError {
    /// Recovery for the silent key did not succeed.
    #[error("action failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl ActionError {
    /// Shorthand for [`ActionError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ActionError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use feedwatch::ActionError;
    ///
    /// let err = ActionError::fail("reconnect refused");
    /// assert_eq!(err.as_label(), "action_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Fail { .. } => "action_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActionError::Fail { error } => format!("error: {error}"),
        }
    }
}
