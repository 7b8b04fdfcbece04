//! # Expiry action abstraction.
//!
//! An [`Action`] is the corrective procedure a supervisor runs when a key has
//! been silent for a full timeout. The common handle type is [`ActionRef`], an
//! `Arc<dyn Action>` that the supervisor keeps per key.
//!
//! ## Contract
//! - `run` is called on a timer task **while the supervisor lock is held**.
//!   Keep it brief and never call back into the same supervisor from it;
//!   the lock is not reentrant and the call would deadlock.
//! - Returning `Err` or panicking is absorbed by the supervisor and reported
//!   as an event; it never reaches the caller of the registration API.

use std::sync::Arc;

use crate::error::ActionError;

/// Shared handle to an action.
pub type ActionRef = Arc<dyn Action>;

/// # Synchronous recovery procedure for one key.
///
/// # Example
/// ```
/// use feedwatch::{Action, ActionError};
///
/// struct Resubscribe;
///
/// impl Action for Resubscribe {
///     fn run(&self, key: &str) -> Result<(), ActionError> {
///         if key.is_empty() {
///             return Err(ActionError::fail("empty key"));
///         }
///         // queue a re-subscription for `key`...
///         Ok(())
///     }
/// }
/// ```
pub trait Action: Send + Sync + 'static {
    /// Runs recovery for `key`, whose countdown just expired.
    fn run(&self, key: &str) -> Result<(), ActionError>;
}
