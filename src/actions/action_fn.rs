//! # Function-backed action (`ActionFn`)
//!
//! [`ActionFn`] wraps a zero-argument closure `F: Fn()`, the shape most
//! callers reach for ("re-request the snapshot", "reset the decoder"). Closures
//! that can fail use [`ActionFn::fallible`] instead.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use feedwatch::{Action, ActionFn, ActionRef};
//!
//! let resets = Arc::new(AtomicUsize::new(0));
//! let counter = resets.clone();
//! let action: ActionRef = ActionFn::arc(move || {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! action.run("Status").unwrap();
//! assert_eq!(resets.load(Ordering::Relaxed), 1);
//! ```

use std::sync::Arc;

use crate::actions::action::Action;
use crate::error::ActionError;

/// Function-backed action implementation.
#[derive(Debug, Clone)]
pub struct ActionFn<F> {
    f: F,
}

impl<F> ActionFn<F>
where
    F: Fn() + Send + Sync + 'static,
{
    /// Wraps an infallible closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wraps the closure and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> Action for ActionFn<F>
where
    F: Fn() + Send + Sync + 'static,
{
    fn run(&self, _key: &str) -> Result<(), ActionError> {
        (self.f)();
        Ok(())
    }
}

/// Function-backed action whose closure receives the key and may fail.
#[derive(Debug, Clone)]
pub struct FallibleActionFn<F> {
    f: F,
}

impl ActionFn<fn()> {
    /// Wraps a closure that receives the expired key and returns a `Result`.
    ///
    /// ```rust
    /// use feedwatch::{Action, ActionError, ActionFn, ActionRef};
    ///
    /// let action: ActionRef = ActionFn::fallible(|key: &str| {
    ///     Err(ActionError::fail(format!("no route for {key}")))
    /// });
    /// assert!(action.run("Status").is_err());
    /// ```
    pub fn fallible<G>(f: G) -> Arc<FallibleActionFn<G>>
    where
        G: Fn(&str) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Arc::new(FallibleActionFn { f })
    }
}

impl<F> Action for FallibleActionFn<F>
where
    F: Fn(&str) -> Result<(), ActionError> + Send + Sync + 'static,
{
    fn run(&self, key: &str) -> Result<(), ActionError> {
        (self.f)(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_fallible_receives_key() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let action = ActionFn::fallible(move |key: &str| {
            sink.lock().unwrap().push(key.to_string());
            Ok(())
        });

        action.run("Temperature").unwrap();
        action.run("Status").unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["Temperature", "Status"]);
    }
}
