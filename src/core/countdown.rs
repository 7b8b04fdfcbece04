//! # Per-key countdowns and their timer tasks.
//!
//! A countdown is either **dormant** (exists, not ticking) or **armed**
//! (a timer task is sleeping towards its deadline). Arming is identified by an
//! `epoch` taken from a registry-wide counter; the timer reports
//! `(key, epoch)` back on elapse, and the registry ignores the report unless
//! that exact arming is still current.
//!
//! ```text
//! Registry::arm(key) ──► Ticket { key, epoch, deadline, cancel }
//!                               │
//!                               ▼
//!                        spawn(ticket, on_elapsed)
//!                               │
//!               select! ────────┼───────────────┐
//!                  cancel.cancelled()     sleep_until(deadline)
//!                        │                      │
//!                      (exit)         on_elapsed(key, epoch)
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// Observable state of a key's countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// The countdown exists but is not ticking.
    Dormant,
    /// The countdown is ticking towards expiry.
    Armed,
}

/// Countdown held by the registry, one per key.
#[derive(Debug)]
pub(crate) enum Countdown {
    Dormant,
    Armed {
        epoch: u64,
        cancel: CancellationToken,
    },
}

impl Countdown {
    pub(crate) fn state(&self) -> CountdownState {
        match self {
            Countdown::Dormant => CountdownState::Dormant,
            Countdown::Armed { .. } => CountdownState::Armed,
        }
    }

    /// True if this countdown is armed by exactly `epoch`.
    pub(crate) fn is_armed_by(&self, epoch: u64) -> bool {
        matches!(self, Countdown::Armed { epoch: current, .. } if *current == epoch)
    }

    /// Stops the timer task, if any. Leaves the value untouched.
    pub(crate) fn cancel(&self) {
        if let Countdown::Armed { cancel, .. } = self {
            cancel.cancel();
        }
    }
}

/// Everything a timer task needs for one arming.
#[derive(Debug)]
pub(crate) struct Ticket {
    pub key: Arc<str>,
    pub epoch: u64,
    pub deadline: Instant,
    pub cancel: CancellationToken,
}

/// Spawns the timer task for `ticket` on `runtime`.
///
/// `on_elapsed` runs on the timer task once the deadline passes, unless the
/// ticket's token was cancelled first.
pub(crate) fn spawn<F>(runtime: &Handle, ticket: Ticket, on_elapsed: F)
where
    F: FnOnce(Arc<str>, u64) + Send + 'static,
{
    let Ticket {
        key,
        epoch,
        deadline,
        cancel,
    } = ticket;

    runtime.spawn(async move {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {}
            _ = time::sleep_until(deadline) => on_elapsed(key, epoch),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    fn ticket(epoch: u64, after: Duration) -> Ticket {
        Ticket {
            key: Arc::from("k"),
            epoch,
            deadline: Instant::now() + after,
            cancel: CancellationToken::new(),
        }
    }

    #[test]
    fn test_armed_epoch_matching() {
        let c = Countdown::Armed {
            epoch: 7,
            cancel: CancellationToken::new(),
        };
        assert!(c.is_armed_by(7));
        assert!(!c.is_armed_by(6));
        assert!(!Countdown::Dormant.is_armed_by(7));
        assert_eq!(c.state(), CountdownState::Armed);
    }

    #[test]
    fn test_cancel_trips_token() {
        let token = CancellationToken::new();
        let c = Countdown::Armed {
            epoch: 1,
            cancel: token.clone(),
        };
        c.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_reports_epoch_after_deadline() {
        let seen = Arc::new(AtomicU64::new(0));
        let sink = seen.clone();
        spawn(&Handle::current(), ticket(42, Duration::from_secs(1)), move |_, epoch| {
            sink.store(epoch, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(900)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_reports() {
        let seen = Arc::new(AtomicU64::new(0));
        let sink = seen.clone();
        let t = ticket(9, Duration::from_secs(1));
        let token = t.cancel.clone();
        spawn(&Handle::current(), t, move |_, epoch| {
            sink.store(epoch, Ordering::SeqCst);
        });

        token.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
