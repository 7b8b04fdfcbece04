//! # Watchdog events emitted by the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Registration events**: actions installed, receipts, removals
//! - **Countdown events**: arming, restarts, bulk start/stop, expiry
//! - **Failure events**: action errors/panics and subscriber trouble
//!
//! The [`Event`] struct carries additional metadata such as timestamps, key,
//! reasons, and the configured timeout.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Events for the same key are published under the supervisor lock, so their `seq`
//! order matches the order in which the state changed.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use feedwatch::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TimeoutFired)
//!     .with_key("Temperature")
//!     .with_timeout(Duration::from_secs(3));
//!
//! assert_eq!(ev.kind, EventKind::TimeoutFired);
//! assert_eq!(ev.key.as_deref(), Some("Temperature"));
//! assert_eq!(ev.timeout_ms, Some(3000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of watchdog events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registration events ===
    /// An action was installed or replaced; the key's countdown is now dormant.
    ///
    /// Sets:
    /// - `key`: key name
    ActionInstalled,

    /// First receipt for a key without an action; the countdown was created dormant.
    ///
    /// Sets:
    /// - `key`: key name
    ReceiptIgnored,

    /// A key's countdown and action were removed.
    ///
    /// Sets:
    /// - `key`: key name
    TimeoutRemoved,

    // === Countdown events ===
    /// A dormant countdown started ticking.
    ///
    /// Sets:
    /// - `key`: key name
    /// - `timeout_ms`: countdown duration (ms)
    CountdownArmed,

    /// An armed countdown was restarted by a new receipt.
    ///
    /// Sets:
    /// - `key`: key name
    /// - `timeout_ms`: countdown duration (ms)
    CountdownRestarted,

    /// `start_monitoring` armed every dormant countdown.
    ///
    /// Sets:
    /// - `reason`: number of countdowns armed
    MonitoringStarted,

    /// `stop_monitoring` disarmed every countdown.
    ///
    /// Sets:
    /// - `reason`: number of countdowns disarmed
    MonitoringStopped,

    /// An armed countdown elapsed without a reset.
    ///
    /// Sets:
    /// - `key`: key name
    /// - `timeout_ms`: countdown duration (ms)
    /// - `reason`: `"no_action"` when nothing was installed for the key
    TimeoutFired,

    // === Failure events ===
    /// The expiry action returned an error (absorbed).
    ///
    /// Sets:
    /// - `key`: key name
    /// - `reason`: error message
    ActionFailed,

    /// The expiry action panicked (absorbed).
    ///
    /// Sets:
    /// - `key`: key name
    /// - `reason`: panic payload, when it is a string
    ActionPanicked,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `key`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `key`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Lifecycle ===
    /// The supervisor was disposed; no action fires afterwards.
    Disposed,
}

/// Watchdog event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Key the event concerns, if applicable.
    pub key: Option<Arc<str>>,
    /// Human-readable reason (errors, counts, overflow details).
    pub reason: Option<Arc<str>>,
    /// Countdown duration in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            key: None,
            reason: None,
            timeout_ms: None,
        }
    }

    /// Attaches a key.
    #[inline]
    pub fn with_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a countdown duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_key(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_key(subscriber)
            .with_reason(info)
    }

    /// True for events the watchdog raises about its own failure handling.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ActionFailed
                | EventKind::ActionPanicked
                | EventKind::SubscriberPanicked
                | EventKind::SubscriberOverflow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::CountdownArmed);
        let b = Event::new(EventKind::CountdownArmed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_timeout_saturates() {
        let ev = Event::new(EventKind::CountdownArmed).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn test_failure_classification() {
        assert!(Event::new(EventKind::ActionPanicked).is_failure());
        assert!(Event::subscriber_overflow("log", "full").is_failure());
        assert!(!Event::new(EventKind::TimeoutFired).is_failure());
    }
}
