use std::sync::Arc;
use std::time::Duration;

use crate::{
    core::config::Config,
    core::poller::{ListenerSeed, LoopErrorHandler, Poller},
    error::{PollerError, TickError},
    events::Bus,
    subscribers::Subscribe,
    ticks::TickRef,
};

/// Builder for a [`Poller`] with optional features.
#[derive(Clone)]
pub struct PollerBuilder {
    tick: TickRef,
    interval: Duration,
    startup_delay: Option<Duration>,
    cfg: Config,
    handler: Option<LoopErrorHandler>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus: Option<Bus>,
}

impl PollerBuilder {
    /// Creates a new builder for a poller running `tick` every `interval`.
    pub fn new(tick: TickRef, interval: Duration) -> Self {
        Self {
            tick,
            interval,
            startup_delay: None,
            cfg: Config::default(),
            handler: None,
            subscribers: Vec::new(),
            bus: None,
        }
    }

    /// Sets runtime configuration (bus capacity, cadence policies).
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Schedules a one-time early tick after `delay` on each start.
    ///
    /// The early tick fires before the regular interval cadence begins and
    /// is tagged [`TickSource::Startup`](crate::TickSource::Startup) in events.
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = Some(delay);
        self
    }

    /// Sets the loop-failure handler.
    ///
    /// Invoked at most once per run, after the loop has torn down, when a
    /// tick fails or panics. Cooperative cancellation never reaches it.
    pub fn with_error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(TickError) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(f));
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (loop lifecycle, tick outcomes)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Shares an external event bus instead of creating an owned one.
    ///
    /// Several pollers publishing to one bus gives a single merged event
    /// stream; `Config::bus_capacity` is ignored in that case.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Validates parameters and builds the [`Poller`].
    ///
    /// # Errors
    /// - [`PollerError::InvalidInterval`] when the interval is zero
    /// - [`PollerError::InvalidStartupDelay`] when a startup delay is set to zero
    pub fn build(self) -> Result<Poller, PollerError> {
        if self.interval.is_zero() {
            return Err(PollerError::InvalidInterval {
                interval: self.interval,
            });
        }
        if let Some(delay) = self.startup_delay {
            if delay.is_zero() {
                return Err(PollerError::InvalidStartupDelay { delay });
            }
        }

        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));

        // The fan-out pump is seeded here and spawned on the first start(),
        // so building never requires a runtime. The receiver exists from now
        // on; pre-start events are buffered up to the bus capacity.
        let listener = if self.subscribers.is_empty() {
            None
        } else {
            Some(ListenerSeed {
                rx: bus.subscribe(),
                subscribers: self.subscribers,
                bus: bus.clone(),
            })
        };

        Ok(Poller::assemble(
            self.tick,
            self.interval,
            self.startup_delay,
            self.cfg,
            bus,
            self.handler,
            listener,
        ))
    }
}
