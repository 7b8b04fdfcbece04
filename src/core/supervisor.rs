//! # TimeoutSupervisor: per-key inactivity watchdog.
//!
//! The [`TimeoutSupervisor`] owns one restartable, one-shot countdown per key
//! and the action to run when that countdown expires. Producers call
//! [`register_receipt`](TimeoutSupervisor::register_receipt) whenever data for a
//! key arrives; if a key stays silent for the configured timeout, its action runs.
//!
//! ## Key responsibilities
//! - keep countdowns and actions in one [`Registry`] behind a single mutex
//! - start a timer task for every arming and route its expiry back through the lock
//! - absorb action errors and panics, reporting them as [`Event`]s
//! - tear everything down exactly once on [`dispose`](TimeoutSupervisor::dispose) or drop
//!
//! ## High-level architecture
//! ```text
//! producers (any thread)                         tokio runtime
//!   register_receipt ─┐                      ┌── timer(key, epoch) ── sleep_until ─┐
//!   set_action       ─┼─► Mutex<Registry> ───┤                                      │
//!   remove_timeout   ─┤        ▲             └── timer(key, epoch) ...              │
//!   start/stop       ─┤        │                                                    │
//!   dispose          ─┘        └──────────── on_expiry(key, epoch) ◄────────────────┘
//!                                                 │ (lock held)
//!                                                 ├─ disposed? stale epoch? ─► ignore
//!                                                 └─ action.run(key) under catch_unwind
//!
//! every transition ──► Bus ──► subscriber_listener ──► SubscriberSet
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use feedwatch::{ActionFn, Config, TimeoutSupervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let watchdog = TimeoutSupervisor::new(Config::with_timeout_secs(3))?;
//!
//!     // Install actions first so the very first receipt already arms the countdown.
//!     watchdog.set_action("Temperature", ActionFn::arc(|| println!("temperature feed went silent")));
//!     watchdog.register_receipt("Temperature");
//!
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     watchdog.dispose();
//!     Ok(())
//! }
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast;

use crate::{
    actions::ActionRef,
    core::{
        builder::SupervisorBuilder,
        config::Config,
        countdown::{self, CountdownState, Ticket},
        registry::{Expiry, Receipt, Registry},
    },
    error::ConfigError,
    events::{Bus, Event, EventKind},
    subscribers::{SubscriberSet, panic_message},
};

/// State shared between the public handle and the timer tasks.
struct Shared {
    registry: Mutex<Registry>,
    timeout: Duration,
    bus: Bus,
    runtime: Handle,
}

/// Per-key inactivity watchdog.
///
/// All operations are synchronous and may be called from any thread. Only
/// construction can fail; afterwards every operation absorbs its failures.
///
/// ### Rules
/// - The first receipt for a key arms its countdown only if an action is
///   already installed; every later receipt (re)starts it unconditionally.
/// - Installing an action always leaves the key's countdown dormant.
/// - Expired countdowns stay dormant until the next receipt.
/// - After [`dispose`](Self::dispose) nothing fires and mutations are ignored.
/// - Actions run with the internal lock held: keep them short and never call
///   back into the same supervisor from an action.
///
/// Dropping the supervisor disposes it.
pub struct TimeoutSupervisor {
    shared: Arc<Shared>,
}

impl TimeoutSupervisor {
    /// Creates a supervisor on the current tokio runtime.
    ///
    /// Fails with [`ConfigError::ZeroTimeout`] for a zero timeout and with
    /// [`ConfigError::NoRuntime`] outside a runtime.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        Self::builder(cfg).build()
    }

    /// Starts a [`SupervisorBuilder`] for subscribers, up-front actions or an explicit runtime.
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    /// Wires the shared state; called by the builder once the config is validated.
    pub(crate) fn new_internal(
        cfg: &Config,
        runtime: Handle,
        bus: Bus,
        subs: Option<SubscriberSet>,
    ) -> Self {
        let shared = Arc::new(Shared {
            registry: Mutex::new(Registry::new(cfg.timeout)),
            timeout: cfg.timeout,
            bus,
            runtime,
        });
        if let Some(set) = subs {
            shared.subscriber_listener(set);
        }
        Self { shared }
    }

    /// Signals that data for `key` just arrived.
    ///
    /// - Unknown key: creates the countdown; arms it only if an action is installed.
    /// - Known key: restarts the countdown from now, whether or not an action exists.
    /// - No-op once disposed.
    pub fn register_receipt(&self, key: &str) {
        let mut reg = self.shared.registry.lock();
        match reg.register_receipt(key) {
            None => {}
            Some(Receipt::Dormant) => {
                self.shared
                    .bus
                    .publish(Event::new(EventKind::ReceiptIgnored).with_key(key));
            }
            Some(Receipt::Armed(ticket)) => {
                self.shared.publish_arming(EventKind::CountdownArmed, &ticket);
                self.shared.start(ticket);
            }
            Some(Receipt::Restarted(ticket)) => {
                self.shared
                    .publish_arming(EventKind::CountdownRestarted, &ticket);
                self.shared.start(ticket);
            }
        }
    }

    /// Installs or replaces the action run when `key` expires.
    ///
    /// Any in-flight countdown for `key` is discarded and replaced by a dormant
    /// one; the next [`register_receipt`](Self::register_receipt) arms it.
    /// No-op once disposed.
    pub fn set_action(&self, key: &str, action: ActionRef) {
        let mut reg = self.shared.registry.lock();
        if reg.set_action(key, action) {
            self.shared
                .bus
                .publish(Event::new(EventKind::ActionInstalled).with_key(key));
        }
    }

    /// Deletes the countdown and action for `key`.
    ///
    /// Unknown keys are ignored. Callable after disposal. Returns whether
    /// anything was removed.
    pub fn remove_timeout(&self, key: &str) -> bool {
        let mut reg = self.shared.registry.lock();
        let removed = reg.remove(key);
        if removed {
            self.shared
                .bus
                .publish(Event::new(EventKind::TimeoutRemoved).with_key(key));
        }
        removed
    }

    /// Arms every dormant countdown. Armed countdowns keep their deadline.
    ///
    /// Coarse-grained: this also arms keys whose first receipt arrived before
    /// their action was installed. No-op once disposed.
    pub fn start_monitoring(&self) {
        let mut reg = self.shared.registry.lock();
        if reg.is_disposed() {
            return;
        }

        let tickets = reg.start_all();
        let armed = tickets.len();
        for ticket in tickets {
            self.shared.publish_arming(EventKind::CountdownArmed, &ticket);
            self.shared.start(ticket);
        }
        self.shared.bus.publish(
            Event::new(EventKind::MonitoringStarted).with_reason(armed.to_string()),
        );
    }

    /// Disarms every countdown. Always permitted.
    pub fn stop_monitoring(&self) {
        let mut reg = self.shared.registry.lock();
        let stopped = reg.stop_all();
        if !reg.is_disposed() {
            self.shared.bus.publish(
                Event::new(EventKind::MonitoringStopped).with_reason(stopped.to_string()),
            );
        }
    }

    /// Cancels every countdown and drops all keys. Idempotent.
    ///
    /// An expiry racing with disposal observes the disposed flag under the
    /// same lock and does not run its action.
    pub fn dispose(&self) {
        let mut reg = self.shared.registry.lock();
        if reg.dispose() {
            tracing::debug!("timeout supervisor disposed");
            self.shared.bus.publish(Event::new(EventKind::Disposed));
        }
    }

    /// Current countdown state of `key`, `None` if the key has no countdown.
    pub fn state(&self, key: &str) -> Option<CountdownState> {
        self.shared.registry.lock().state(key)
    }

    /// Sorted list of supervised keys.
    pub fn keys(&self) -> Vec<String> {
        self.shared.registry.lock().keys()
    }

    /// True once [`dispose`](Self::dispose) ran.
    pub fn is_disposed(&self) -> bool {
        self.shared.registry.lock().is_disposed()
    }

    /// The countdown duration shared by every key.
    pub fn timeout(&self) -> Duration {
        self.shared.timeout
    }

    /// Raw receiver of all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }
}

impl Drop for TimeoutSupervisor {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Shared {
    /// Starts the timer task for `ticket`. The task holds only a weak reference.
    fn start(self: &Arc<Self>, ticket: Ticket) {
        let me: Weak<Self> = Arc::downgrade(self);
        countdown::spawn(&self.runtime, ticket, move |key, epoch| {
            if let Some(me) = me.upgrade() {
                me.on_expiry(&key, epoch);
            }
        });
    }

    /// Timer report: fire the action if this arming is still current.
    fn on_expiry(&self, key: &str, epoch: u64) {
        let mut reg = self.registry.lock();
        let action = match reg.expire(key, epoch) {
            Expiry::Stale => return,
            Expiry::Fired(action) => action,
        };

        let fired = Event::new(EventKind::TimeoutFired)
            .with_key(key)
            .with_timeout(self.timeout);
        let Some(action) = action else {
            self.bus.publish(fired.with_reason("no_action"));
            return;
        };
        self.bus.publish(fired);

        match panic::catch_unwind(AssertUnwindSafe(|| action.run(key))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(key, error = %err, "timeout action failed");
                self.bus.publish(
                    Event::new(EventKind::ActionFailed)
                        .with_key(key)
                        .with_reason(err.as_message()),
                );
            }
            Err(payload) => {
                let info = panic_message(&*payload);
                tracing::warn!(key, %info, "timeout action panicked");
                self.bus.publish(
                    Event::new(EventKind::ActionPanicked)
                        .with_key(key)
                        .with_reason(info),
                );
            }
        }
        drop(reg);
    }

    fn publish_arming(&self, kind: EventKind, ticket: &Ticket) {
        self.bus.publish(
            Event::new(kind)
                .with_key(Arc::clone(&ticket.key))
                .with_timeout(self.timeout),
        );
    }

    /// Forwards bus events to the subscriber set until the supervisor is disposed.
    fn subscriber_listener(&self, set: SubscriberSet) {
        let mut rx = self.bus.subscribe();
        self.runtime.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        set.emit(&ev);
                        if ev.kind == EventKind::Disposed {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        });
    }
}
