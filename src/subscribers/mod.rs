//! # Event subscribers for the watchdog.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and (with the `logging` feature) the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! TimeoutSupervisor ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                        │
//!                                                        ▼
//!                                                  SubscriberSet::emit
//!                                               ┌────────┼────────┐
//!                                               ▼        ▼        ▼
//!                                           LogWriter  Metrics  Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use set::panic_message;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
