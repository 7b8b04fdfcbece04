//! # Expiry actions.
//!
//! This module provides the action-related types:
//! - [`Action`] - trait for the procedure run when a key goes silent
//! - [`ActionFn`] - closure-backed action (`Fn()`), plus [`ActionFn::fallible`]
//! - [`ActionRef`] - shared reference to an action (`Arc<dyn Action>`)

mod action;
mod action_fn;

pub use action::{Action, ActionRef};
pub use action_fn::{ActionFn, FallibleActionFn};
