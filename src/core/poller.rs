//! # Poller: periodic tick-loop runner with cooperative cancellation.
//!
//! A [`Poller`] owns one [`Tick`](crate::Tick) and runs it on a fixed
//! interval in a background loop. The loop is started fire-and-forget,
//! stopped by signaling (never by waiting), and disposed terminally.
//!
//! ## State machine
//! ```text
//!            start()                    stop() / dispose() / tick error
//!   Idle ───────────────► Running ───────────────────────────► (teardown)
//!    ▲                                                              │
//!    └──────────────────────────────────────────────────────────────┘
//!                     (loop exits, cancel slot vacated)
//!
//!   dispose() from any state ──► Disposed (terminal, idempotent)
//! ```
//!
//! ## Concurrency model
//! - Exactly one loop run (one [`CancellationToken`]) is live per poller;
//!   the token lives in a slot that only the exiting loop vacates
//! - `start()` while Running is a no-op; `start()` after `dispose()` fails
//! - Ticks are **single-flight**: awaited inline, never overlapping
//! - `stop()` only signals. A tick already in flight may run to completion
//!   after `stop()` returns; observe events or [`Poller::state`] to learn
//!   when the loop has actually exited
//!
//! ## Failure semantics
//! A tick returning [`TickError::Canceled`](crate::TickError::Canceled) ends
//! the loop cleanly. Any other error, or a panic, aborts the loop; the
//! configured failure handler is invoked exactly once, after teardown, and
//! the poller can be started again.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickloop::{Poller, TickFn, TickRef};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tick: TickRef = TickFn::arc("heartbeat", |_ctx: CancellationToken| async move {
//!         // poll something
//!         Ok(())
//!     });
//!
//!     let poller = Poller::builder(tick, Duration::from_millis(50)).build()?;
//!
//!     poller.start()?;
//!     tokio::time::sleep(Duration::from_millis(160)).await;
//!     poller.stop(false)?;
//!
//!     poller.dispose();
//!     assert!(poller.start().is_err());
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{builder::PollerBuilder, config::Config, driver::Driver},
    error::{PollerError, TickError},
    events::{Bus, Event, EventKind},
    subscribers::{Subscribe, SubscriberSet},
    ticks::TickRef,
};

/// Loop-failure callback, invoked once after teardown when a tick fails or panics.
pub(crate) type LoopErrorHandler = Arc<dyn Fn(TickError) + Send + Sync>;

/// Deferred bus→subscribers pump, spawned on the first `start()`.
///
/// The receiver is created at build time, so events published between
/// construction and the first start are buffered up to the bus capacity.
/// Worker tasks are only spawned here, keeping construction runtime-free.
pub(crate) struct ListenerSeed {
    pub(crate) rx: broadcast::Receiver<Event>,
    pub(crate) subscribers: Vec<Arc<dyn Subscribe>>,
    pub(crate) bus: Bus,
}

impl ListenerSeed {
    /// Spawns the subscriber workers and the fan-out pump (fire-and-forget).
    ///
    /// Lagged receivers skip ahead; the pump exits when the bus fully closes.
    pub(crate) fn spawn(self) {
        let ListenerSeed {
            mut rx,
            subscribers,
            bus,
        } = self;
        let set = SubscriberSet::new(subscribers, bus);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

/// Observable lifecycle state of a [`Poller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// No loop run is alive; `start()` will spawn one.
    Idle,
    /// A loop run is alive (possibly winding down after a stop signal).
    Running,
    /// Terminal; the poller can never run again.
    Disposed,
}

/// Periodic tick-loop runner.
///
/// Construct via [`Poller::new`] for defaults or [`Poller::builder`] for
/// startup delay, cadence policies, failure handler, and subscribers.
/// All methods take `&self`; wrap in [`Arc`] to share across tasks.
pub struct Poller {
    /// Tick to run on each firing.
    tick: TickRef,
    /// Interval between ticks (validated > 0 at build time).
    interval: Duration,
    /// Optional delay before a one-time early tick on each start.
    startup_delay: Option<Duration>,
    /// Cadence and bus knobs.
    cfg: Config,
    /// Event bus (owned or shared, per the builder).
    bus: Bus,
    /// Slot for the live run's token; `Some` exactly while a run is alive.
    cancel: Arc<Mutex<Option<CancellationToken>>>,
    /// Failure handler; cleared on dispose.
    handler: Arc<Mutex<Option<LoopErrorHandler>>>,
    /// Terminal flag.
    disposed: Arc<AtomicBool>,
    /// 1-based tick counter, monotonic across restarts.
    ticks: Arc<AtomicU64>,
    /// Subscriber pump, consumed by the first `start()`.
    listener: Mutex<Option<ListenerSeed>>,
}

impl fmt::Debug for Poller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poller")
            .field("name", &self.tick.name())
            .field("interval", &self.interval)
            .field("startup_delay", &self.startup_delay)
            .field("cfg", &self.cfg)
            .field("disposed", &self.disposed.load(Ordering::SeqCst))
            .field("ticks", &self.ticks.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Poller {
    /// Creates a poller with default configuration.
    ///
    /// Shorthand for `Poller::builder(tick, interval).build()`.
    pub fn new(tick: TickRef, interval: Duration) -> Result<Self, PollerError> {
        Self::builder(tick, interval).build()
    }

    /// Returns a builder for a poller running `tick` every `interval`.
    pub fn builder(tick: TickRef, interval: Duration) -> PollerBuilder {
        PollerBuilder::new(tick, interval)
    }

    /// Assembled by [`PollerBuilder::build`] after validation.
    pub(crate) fn assemble(
        tick: TickRef,
        interval: Duration,
        startup_delay: Option<Duration>,
        cfg: Config,
        bus: Bus,
        handler: Option<LoopErrorHandler>,
        listener: Option<ListenerSeed>,
    ) -> Self {
        Self {
            tick,
            interval,
            startup_delay,
            cfg,
            bus,
            cancel: Arc::new(Mutex::new(None)),
            handler: Arc::new(Mutex::new(handler)),
            disposed: Arc::new(AtomicBool::new(false)),
            ticks: Arc::new(AtomicU64::new(0)),
            listener: Mutex::new(listener),
        }
    }

    /// Starts the polling loop (fire-and-forget).
    ///
    /// Spawns the loop on the current Tokio runtime and returns immediately;
    /// it never waits for the first tick.
    ///
    /// - Already running → `Ok(())`, no second loop is spawned
    /// - After [`Poller::dispose`] → `Err(PollerError::Disposed)`
    ///
    /// A poller stopped moments ago may still be tearing down; until the old
    /// run vacates its slot this call is a no-op. Wait for
    /// [`PollerState::Idle`] (or the `PollerStopped` event) to restart
    /// deterministically.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime context.
    pub fn start(&self) -> Result<(), PollerError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(PollerError::Disposed);
        }

        let token = {
            let mut slot = self.cancel.lock().unwrap();
            if slot.is_some() {
                return Ok(());
            }
            let token = CancellationToken::new();
            *slot = Some(token.clone());
            token
        };

        if let Some(seed) = self.listener.lock().unwrap().take() {
            seed.spawn();
        }

        let driver = Driver {
            tick: self.tick.clone(),
            interval: self.interval,
            startup_delay: self.startup_delay,
            missed_tick: self.cfg.missed_tick,
            jitter: self.cfg.jitter,
            bus: self.bus.clone(),
            token,
            ticks: Arc::clone(&self.ticks),
            cancel_slot: Arc::clone(&self.cancel),
            handler: Arc::clone(&self.handler),
            disposed: Arc::clone(&self.disposed),
        };
        tokio::spawn(driver.run());
        Ok(())
    }

    /// Signals the polling loop to stop; never waits for it.
    ///
    /// With `clear = true`, also invokes the tick's
    /// [`clear()`](crate::Tick::clear) hook and publishes `StateCleared`
    /// (even when the poller was not running).
    ///
    /// A tick already in flight is **not** interrupted beyond cancellation
    /// of its token: it may run to completion after this call returns. The
    /// loop exits before dispatching the next tick.
    ///
    /// Errors with [`PollerError::Disposed`] after [`Poller::dispose`].
    pub fn stop(&self, clear: bool) -> Result<(), PollerError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(PollerError::Disposed);
        }

        if let Some(token) = self.cancel.lock().unwrap().clone() {
            token.cancel();
        }

        if clear {
            self.tick.clear();
            self.bus
                .publish(Event::now(EventKind::StateCleared).with_poller(self.tick.name()));
        }
        Ok(())
    }

    /// Disposes the poller: signals the loop, clears tick state, and makes
    /// every later `start()`/`stop()` fail with [`PollerError::Disposed`].
    ///
    /// Idempotent and infallible; repeat calls are no-ops. Like
    /// [`Poller::stop`], it only signals — an in-flight tick may still run
    /// to completion while the loop tears down. The failure handler is
    /// dropped, so a tick error during that teardown is not forwarded.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(token) = self.cancel.lock().unwrap().clone() {
            token.cancel();
        }

        self.tick.clear();
        self.bus
            .publish(Event::now(EventKind::StateCleared).with_poller(self.tick.name()));

        *self.handler.lock().unwrap() = None;
    }

    /// Current lifecycle state.
    ///
    /// `Running` covers the whole life of a loop run, including the window
    /// between a stop signal and the loop actually exiting.
    pub fn state(&self) -> PollerState {
        if self.disposed.load(Ordering::SeqCst) {
            return PollerState::Disposed;
        }
        if self.cancel.lock().unwrap().is_some() {
            PollerState::Running
        } else {
            PollerState::Idle
        }
    }

    /// True while a loop run is alive.
    pub fn is_running(&self) -> bool {
        self.state() == PollerState::Running
    }

    /// Number of tick invocations dispatched so far.
    ///
    /// 1-based and monotonic: the counter never resets, including across
    /// stop/start cycles.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Name of the underlying tick (used as the poller identity in events).
    pub fn name(&self) -> &str {
        self.tick.name()
    }

    /// Subscribes to the poller's event bus.
    ///
    /// Only events published after this call are delivered. For push-style
    /// consumption, register [`Subscribe`](crate::Subscribe) implementations
    /// on the builder instead.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}
