//! # Registry - the guarded per-key state machine.
//!
//! Holds every countdown and action of one supervisor plus the disposed flag.
//! The registry never spawns or sleeps: operations that arm a countdown hand
//! back a [`Ticket`] and the supervisor starts the timer task for it. All
//! calls happen under the supervisor's mutex.
//!
//! ## Per-key transitions
//! ```text
//!            receipt (no action)                 receipt / start_all
//!  absent ───────────────────────► dormant ──────────────────────────► armed
//!    │        set_action               ▲  ▲                              │ │
//!    └─────────────────────────────────┘  └── expire / stop_all / ───────┘ │
//!    │  receipt (action installed)             set_action                  │
//!    └─────────────────────────────────────────────────────────────────────┘
//!
//!  armed ──receipt──► armed (new epoch)      any ──remove──► absent
//! ```
//!
//! ## Rules
//! - At most one countdown and one action per key
//! - Removing a key drops countdown and action together
//! - Once disposed, mutating operations are ignored and both maps stay empty
//! - Every arming gets a fresh epoch; expiry reports with an older epoch are stale

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::actions::ActionRef;
use crate::core::countdown::{Countdown, CountdownState, Ticket};

/// Outcome of [`Registry::register_receipt`].
#[derive(Debug)]
pub(crate) enum Receipt {
    /// First receipt without an installed action; countdown created dormant.
    Dormant,
    /// A dormant or new countdown started ticking.
    Armed(Ticket),
    /// An armed countdown was restarted.
    Restarted(Ticket),
}

/// Outcome of [`Registry::expire`].
pub(crate) enum Expiry {
    /// Disposed, removed, disarmed or re-armed since the timer started.
    Stale,
    /// The countdown went dormant; run the action if there is one.
    Fired(Option<ActionRef>),
}

pub(crate) struct Registry {
    timeout: Duration,
    root: CancellationToken,
    countdowns: HashMap<String, Countdown>,
    actions: HashMap<String, ActionRef>,
    disposed: bool,
    next_epoch: u64,
}

impl Registry {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            root: CancellationToken::new(),
            countdowns: HashMap::new(),
            actions: HashMap::new(),
            disposed: false,
            next_epoch: 0,
        }
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Data for `key` just arrived. `None` once disposed.
    pub(crate) fn register_receipt(&mut self, key: &str) -> Option<Receipt> {
        if self.disposed {
            return None;
        }

        match self.countdowns.get(key) {
            None if !self.actions.contains_key(key) => {
                self.countdowns.insert(key.to_string(), Countdown::Dormant);
                Some(Receipt::Dormant)
            }
            None | Some(Countdown::Dormant) => Some(Receipt::Armed(self.arm(key))),
            Some(Countdown::Armed { .. }) => Some(Receipt::Restarted(self.arm(key))),
        }
    }

    /// Installs or replaces the action for `key` and leaves a fresh dormant
    /// countdown in place. Returns `false` once disposed.
    pub(crate) fn set_action(&mut self, key: &str, action: ActionRef) -> bool {
        if self.disposed {
            return false;
        }

        self.actions.insert(key.to_string(), action);
        if let Some(previous) = self.countdowns.insert(key.to_string(), Countdown::Dormant) {
            previous.cancel();
        }
        true
    }

    /// Drops countdown and action for `key`. Returns whether anything existed.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        let countdown = self.countdowns.remove(key);
        let action = self.actions.remove(key);
        if let Some(c) = &countdown {
            c.cancel();
        }
        countdown.is_some() || action.is_some()
    }

    /// Arms every dormant countdown; armed ones keep their current deadline.
    pub(crate) fn start_all(&mut self) -> Vec<Ticket> {
        if self.disposed {
            return Vec::new();
        }

        let dormant: Vec<String> = self
            .countdowns
            .iter()
            .filter(|(_, c)| c.state() == CountdownState::Dormant)
            .map(|(k, _)| k.clone())
            .collect();

        dormant.iter().map(|key| self.arm(key)).collect()
    }

    /// Disarms every countdown. Returns how many were ticking.
    pub(crate) fn stop_all(&mut self) -> usize {
        let mut stopped = 0;
        for countdown in self.countdowns.values_mut() {
            if let Countdown::Armed { .. } = countdown {
                countdown.cancel();
                *countdown = Countdown::Dormant;
                stopped += 1;
            }
        }
        stopped
    }

    /// Handles a timer report for `(key, epoch)`.
    pub(crate) fn expire(&mut self, key: &str, epoch: u64) -> Expiry {
        if self.disposed {
            return Expiry::Stale;
        }

        match self.countdowns.get_mut(key) {
            Some(countdown) if countdown.is_armed_by(epoch) => {
                *countdown = Countdown::Dormant;
                Expiry::Fired(self.actions.get(key).cloned())
            }
            _ => Expiry::Stale,
        }
    }

    /// First call cancels every timer and clears both maps; later calls return `false`.
    pub(crate) fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }

        self.disposed = true;
        self.root.cancel();
        self.countdowns.clear();
        self.actions.clear();
        true
    }

    pub(crate) fn state(&self, key: &str) -> Option<CountdownState> {
        self.countdowns.get(key).map(Countdown::state)
    }

    /// Returns sorted list of keys that have a countdown or an action.
    pub(crate) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .countdowns
            .keys()
            .chain(self.actions.keys().filter(|k| !self.countdowns.contains_key(*k)))
            .cloned()
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Replaces whatever countdown `key` has with a freshly armed one.
    fn arm(&mut self, key: &str) -> Ticket {
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        let cancel = self.root.child_token();

        let armed = Countdown::Armed {
            epoch,
            cancel: cancel.clone(),
        };
        match self.countdowns.entry(key.to_string()) {
            Entry::Occupied(mut slot) => slot.insert(armed).cancel(),
            Entry::Vacant(slot) => {
                slot.insert(armed);
            }
        }

        Ticket {
            key: Arc::from(key),
            epoch,
            deadline: Instant::now() + self.timeout,
            cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionFn;

    fn noop() -> ActionRef {
        ActionFn::arc(|| {})
    }

    fn registry() -> Registry {
        Registry::new(Duration::from_secs(1))
    }

    fn epoch_of(receipt: Option<Receipt>) -> u64 {
        match receipt {
            Some(Receipt::Armed(t)) | Some(Receipt::Restarted(t)) => t.epoch,
            other => panic!("expected an arming, got {other:?}"),
        }
    }

    #[test]
    fn test_first_receipt_without_action_stays_dormant() {
        let mut reg = registry();
        assert!(matches!(reg.register_receipt("Y"), Some(Receipt::Dormant)));
        assert_eq!(reg.state("Y"), Some(CountdownState::Dormant));

        assert!(matches!(reg.register_receipt("Y"), Some(Receipt::Armed(_))));
        assert_eq!(reg.state("Y"), Some(CountdownState::Armed));
    }

    #[test]
    fn test_first_receipt_with_action_arms() {
        let mut reg = registry();
        reg.actions.insert("X".into(), noop());
        assert!(matches!(reg.register_receipt("X"), Some(Receipt::Armed(_))));
    }

    #[test]
    fn test_receipt_after_set_action_arms() {
        let mut reg = registry();
        assert!(reg.set_action("X", noop()));
        assert_eq!(reg.state("X"), Some(CountdownState::Dormant));
        assert!(matches!(reg.register_receipt("X"), Some(Receipt::Armed(_))));
    }

    #[test]
    fn test_restart_cancels_previous_arming() {
        let mut reg = registry();
        reg.set_action("X", noop());
        let first = match reg.register_receipt("X") {
            Some(Receipt::Armed(t)) => t,
            other => panic!("unexpected {other:?}"),
        };
        let second = match reg.register_receipt("X") {
            Some(Receipt::Restarted(t)) => t,
            other => panic!("unexpected {other:?}"),
        };

        assert!(first.cancel.is_cancelled());
        assert!(!second.cancel.is_cancelled());
        assert!(second.epoch > first.epoch);
        assert!(matches!(reg.expire("X", first.epoch), Expiry::Stale));
        assert!(matches!(reg.expire("X", second.epoch), Expiry::Fired(Some(_))));
    }

    #[test]
    fn test_expire_is_one_shot() {
        let mut reg = registry();
        reg.set_action("X", noop());
        let epoch = epoch_of(reg.register_receipt("X"));

        assert!(matches!(reg.expire("X", epoch), Expiry::Fired(Some(_))));
        assert_eq!(reg.state("X"), Some(CountdownState::Dormant));
        assert!(matches!(reg.expire("X", epoch), Expiry::Stale));
    }

    #[test]
    fn test_set_action_resets_armed_countdown() {
        let mut reg = registry();
        reg.set_action("X", noop());
        let armed = match reg.register_receipt("X") {
            Some(Receipt::Armed(t)) => t,
            other => panic!("unexpected {other:?}"),
        };

        reg.set_action("X", noop());
        assert!(armed.cancel.is_cancelled());
        assert_eq!(reg.state("X"), Some(CountdownState::Dormant));
        assert!(matches!(reg.expire("X", armed.epoch), Expiry::Stale));
    }

    #[test]
    fn test_keys_are_isolated() {
        let mut reg = registry();
        reg.set_action("A", noop());
        reg.set_action("B", noop());
        let a = epoch_of(reg.register_receipt("A"));
        let b = epoch_of(reg.register_receipt("B"));
        epoch_of(reg.register_receipt("A"));

        assert!(matches!(reg.expire("A", a), Expiry::Stale));
        assert!(matches!(reg.expire("B", b), Expiry::Fired(Some(_))));
    }

    #[test]
    fn test_remove_drops_both_and_tolerates_unknown() {
        let mut reg = registry();
        reg.set_action("Y", noop());
        let epoch = epoch_of(reg.register_receipt("Y"));

        assert!(reg.remove("Y"));
        assert_eq!(reg.state("Y"), None);
        assert!(reg.keys().is_empty());
        assert!(matches!(reg.expire("Y", epoch), Expiry::Stale));
        assert!(!reg.remove("never-seen"));
    }

    #[test]
    fn test_start_all_arms_only_dormant() {
        let mut reg = registry();
        reg.register_receipt("dormant");
        reg.set_action("armed", noop());
        let armed_epoch = epoch_of(reg.register_receipt("armed"));

        let tickets = reg.start_all();
        assert_eq!(tickets.len(), 1);
        assert_eq!(&*tickets[0].key, "dormant");
        assert_eq!(reg.state("dormant"), Some(CountdownState::Armed));
        assert!(reg.countdowns["armed"].is_armed_by(armed_epoch));
    }

    #[test]
    fn test_expire_without_action_fires_empty() {
        let mut reg = registry();
        reg.register_receipt("Y");
        let tickets = reg.start_all();
        assert!(matches!(reg.expire("Y", tickets[0].epoch), Expiry::Fired(None)));
    }

    #[test]
    fn test_stop_all_disarms() {
        let mut reg = registry();
        reg.set_action("A", noop());
        reg.set_action("B", noop());
        let a = epoch_of(reg.register_receipt("A"));

        assert_eq!(reg.stop_all(), 1);
        assert_eq!(reg.state("A"), Some(CountdownState::Dormant));
        assert!(matches!(reg.expire("A", a), Expiry::Stale));
    }

    #[test]
    fn test_dispose_is_idempotent_and_final() {
        let mut reg = registry();
        reg.set_action("Z", noop());
        let ticket = match reg.register_receipt("Z") {
            Some(Receipt::Armed(t)) => t,
            other => panic!("unexpected {other:?}"),
        };

        assert!(reg.dispose());
        assert!(!reg.dispose());
        assert!(ticket.cancel.is_cancelled());
        assert!(reg.keys().is_empty());
        assert!(matches!(reg.expire("Z", ticket.epoch), Expiry::Stale));

        assert!(reg.register_receipt("Z").is_none());
        assert!(!reg.set_action("Z", noop()));
        assert!(reg.start_all().is_empty());
        assert_eq!(reg.stop_all(), 0);
        assert!(!reg.remove("Z"));
    }

    #[test]
    fn test_keys_sorted_and_unique() {
        let mut reg = registry();
        reg.register_receipt("b");
        reg.set_action("a", noop());
        reg.actions.insert("c".into(), noop());
        assert_eq!(reg.keys(), vec!["a", "b", "c"]);
    }
}
