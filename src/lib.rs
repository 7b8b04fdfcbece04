//! # feedwatch
//!
//! **Feedwatch** is a per-key inactivity watchdog for Rust services that consume
//! several asynchronous data feeds.
//!
//! Every feed is identified by a string key. Each time data for a key arrives,
//! the consumer calls [`TimeoutSupervisor::register_receipt`], which restarts that
//! key's countdown. When a key stays silent for the configured timeout, the
//! [`Action`] installed for it runs, typically to re-request or re-initialize
//! the state that feed delivers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  feed "Temperature"      feed "Status"          feed "Position"
//!        │                      │                       │
//!        └── register_receipt ──┴── register_receipt ───┘
//!                               ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TimeoutSupervisor                                                │
//! │  - Mutex<Registry> (countdowns + actions + disposed flag)         │
//! │  - one timer task per armed countdown (tokio, cancellable)        │
//! │  - Bus (broadcast events)                                         │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        ▼ expiry (lock held)                           ▼
//!   Action::run(key)                           Bus ──► subscribers
//!   (errors / panics absorbed)                  (LogWriter, metrics, ...)
//! ```
//!
//! ### Per-key lifecycle
//! ```text
//! absent ──► dormant ──► armed ──► expired ──► dormant ... ──► removed
//!                         ▲   │
//!                         └───┘ register_receipt (restart)
//! ```
//!
//! The first receipt for a key arms its countdown **only if an action is already
//! installed**; every later receipt (re)starts it. Install actions up front
//! (see [`SupervisorBuilder::with_action`]) when supervision must begin with the
//! first receipt.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                        |
//! |-------------------|----------------------------------------------------------|-------------------------------------------|
//! | **Supervision**   | Per-key countdowns, bulk start/stop, disposal.           | [`TimeoutSupervisor`], [`CountdownState`] |
//! | **Actions**       | Recovery procedures run on expiry.                       | [`Action`], [`ActionFn`], [`ActionRef`]   |
//! | **Subscriber API**| Observe every state transition.                          | [`Subscribe`], [`Event`], [`EventKind`]   |
//! | **Errors**        | Typed construction and action errors.                    | [`ConfigError`], [`ActionError`]          |
//! | **Configuration** | Timeout and bus settings.                                | [`Config`], [`SupervisorBuilder`]         |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use feedwatch::{ActionFn, Config, Subscribe, TimeoutSupervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(feedwatch::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let watchdog = TimeoutSupervisor::builder(Config::with_timeout_secs(3))
//!         .with_subscribers(subs)
//!         .with_action("Status", ActionFn::arc(|| println!("status feed silent, re-subscribing")))
//!         .build()?;
//!
//!     // Forward every incoming message:
//!     watchdog.register_receipt("Status");
//!
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     watchdog.dispose();
//!     Ok(())
//! }
//! ```
mod actions;
mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use actions::{Action, ActionFn, ActionRef, FallibleActionFn};
pub use crate::core::{Config, CountdownState, DEFAULT_TIMEOUT, SupervisorBuilder, TimeoutSupervisor};
pub use error::{ActionError, ConfigError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a built-in subscriber that logs through `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
