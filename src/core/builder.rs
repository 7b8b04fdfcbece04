use std::sync::Arc;

use tokio::runtime::Handle;

use super::{config::Config, supervisor::TimeoutSupervisor};
use crate::{
    actions::ActionRef,
    error::ConfigError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`TimeoutSupervisor`] with optional features.
///
/// ```rust
/// use feedwatch::{ActionFn, Config, CountdownState, TimeoutSupervisor};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), feedwatch::ConfigError> {
/// let sup = TimeoutSupervisor::builder(Config::with_timeout_secs(2))
///     .with_action("Temperature", ActionFn::arc(|| {}))
///     .with_action("Status", ActionFn::arc(|| {}))
///     .build()?;
///
/// sup.register_receipt("Temperature");
/// assert_eq!(sup.state("Temperature"), Some(CountdownState::Armed));
/// # Ok(())
/// # }
/// ```
pub struct SupervisorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    actions: Vec<(String, ActionRef)>,
    runtime: Option<Handle>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            actions: Vec::new(),
            runtime: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive watchdog events through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Installs an action before any receipt can arrive.
    ///
    /// Keys configured here are armed by their very first receipt.
    pub fn with_action(mut self, key: impl Into<String>, action: ActionRef) -> Self {
        self.actions.push((key.into(), action));
        self
    }

    /// Runs countdown timers and subscriber workers on `runtime` instead of
    /// the runtime current at [`build`](Self::build) time.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds and returns the supervisor.
    ///
    /// Fails if the config is invalid or no runtime is available.
    pub fn build(self) -> Result<TimeoutSupervisor, ConfigError> {
        self.cfg.validate()?;
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| ConfigError::NoRuntime)?,
        };

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = (!self.subscribers.is_empty())
            .then(|| SubscriberSet::new(self.subscribers, bus.clone(), &runtime));

        let sup = TimeoutSupervisor::new_internal(&self.cfg, runtime, bus, subs);
        for (key, action) in self.actions {
            sup.set_action(&key, action);
        }
        Ok(sup)
    }
}
