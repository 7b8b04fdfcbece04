//! Watchdog core: countdowns, registry and the supervisor.
//!
//! The public API from this module is [`TimeoutSupervisor`], its
//! [`SupervisorBuilder`], [`Config`] and the [`CountdownState`] snapshot.
//!
//! Internal modules:
//! - [`countdown`]: countdown state and the timer task for one arming;
//! - [`registry`]: the guarded per-key state machine;
//! - [`supervisor`]: locking, expiry handling, event publishing, disposal;
//! - [`builder`]: construction with subscribers and up-front actions;
//! - [`config`]: settings and validation.

mod builder;
mod config;
mod countdown;
mod registry;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::{Config, DEFAULT_TIMEOUT};
pub use countdown::CountdownState;
pub use supervisor::TimeoutSupervisor;
