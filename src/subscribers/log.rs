//! # LogWriter: event renderer on top of `tracing`
//!
//! A minimal subscriber that turns incoming [`Event`]s into `tracing` records.
//! Install a `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output
//! ```text
//! INFO  feedwatch: action installed key="Temperature"
//! DEBUG feedwatch: countdown armed key="Temperature" timeout_ms=3000
//! WARN  feedwatch: timeout fired key="Temperature" timeout_ms=3000
//! ERROR feedwatch: action failed key="Temperature" reason="reconnect refused"
//! INFO  feedwatch: supervisor disposed
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let key = e.key.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::ActionInstalled => {
                tracing::info!(target: "feedwatch", key, "action installed");
            }
            EventKind::ReceiptIgnored => {
                tracing::debug!(target: "feedwatch", key, "first receipt without action; countdown dormant");
            }
            EventKind::TimeoutRemoved => {
                tracing::info!(target: "feedwatch", key, "timeout removed");
            }
            EventKind::CountdownArmed => {
                tracing::debug!(target: "feedwatch", key, timeout_ms = e.timeout_ms, "countdown armed");
            }
            EventKind::CountdownRestarted => {
                tracing::trace!(target: "feedwatch", key, timeout_ms = e.timeout_ms, "countdown restarted");
            }
            EventKind::MonitoringStarted => {
                tracing::info!(target: "feedwatch", armed = reason, "monitoring started");
            }
            EventKind::MonitoringStopped => {
                tracing::info!(target: "feedwatch", disarmed = reason, "monitoring stopped");
            }
            EventKind::TimeoutFired => {
                tracing::warn!(target: "feedwatch", key, timeout_ms = e.timeout_ms, "timeout fired");
            }
            EventKind::ActionFailed => {
                tracing::error!(target: "feedwatch", key, reason, "action failed");
            }
            EventKind::ActionPanicked => {
                tracing::error!(target: "feedwatch", key, reason, "action panicked");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "feedwatch", subscriber = key, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::warn!(target: "feedwatch", subscriber = key, reason, "subscriber panicked");
            }
            EventKind::Disposed => {
                tracing::info!(target: "feedwatch", "supervisor disposed");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
