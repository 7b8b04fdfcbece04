//! # Event bus for broadcasting watchdog events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the supervisor, its timer tasks and the
//! subscriber workers.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                     Receivers:
//!   register_receipt ──┐
//!   set_action       ──┼──────► Bus ───┬──► subscriber_listener ──► SubscriberSet
//!   expiry handler   ──┤  (broadcast)  │
//!   SubscriberSet    ──┘               └──► TimeoutSupervisor::subscribe() callers
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: safe to call while holding the registry lock.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for watchdog events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::Disposed));
    }

    #[test]
    fn test_receiver_sees_events_after_subscribe() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::MonitoringStarted));
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::Disposed).with_key("k"));

        let ev = rx.try_recv().expect("event");
        assert_eq!(ev.kind, EventKind::Disposed);
        assert!(rx.try_recv().is_err());
    }
}
