//! # Driver: owns one run of the polling loop.
//!
//! A [`Driver`] is spawned by [`Poller::start`](crate::Poller::start) and runs
//! until stop, dispose, or a tick failure. Exactly one driver is alive per
//! poller at any time; the cancel slot it vacates on exit is the liveness
//! marker [`Poller`](crate::Poller) uses for idempotent starts.
//!
//! ## Loop flow
//! ```text
//! Poller::start() ──► tokio::spawn(Driver::run())
//!
//! run():
//!   ├─► publish PollerStarted
//!   ├─► drive():
//!   │     ├─► exit if disposed
//!   │     ├─► optional startup delay ──► early tick (source = Startup)
//!   │     └─► loop {
//!   │           ├─► exit if disposed
//!   │           ├─► select: cancelled ─► exit   |   interval elapsed
//!   │           └─► run tick (source = Interval)
//!   │                 ├─► Ok            → continue
//!   │                 ├─► Err(Canceled) → exit clean
//!   │                 └─► Err(other)    → abort loop
//!   │         }
//!   ├─► teardown: cancel token (idempotent), vacate cancel slot
//!   └─► publish PollerStopped (clean) / LoopAborted + invoke handler (abort)
//! ```
//!
//! ## Rules
//! - Ticks run **inline and sequentially**; a tick is never dispatched while
//!   the previous one is still in flight
//! - Cancellation wins over a due interval (`biased` select)
//! - The cancel slot is vacated **before** terminal events are published, so
//!   an observer of `PollerStopped`/`LoopAborted` can immediately restart
//! - The failure handler runs **after** teardown, at most once per run

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{exec::run_once, interval::IntervalSource, poller::LoopErrorHandler},
    error::TickError,
    events::{Bus, Event, EventKind, TickSource},
    policies::{JitterPolicy, MissedTickPolicy},
    ticks::TickRef,
};

/// One run of the polling loop, from `start()` to teardown.
pub(crate) struct Driver {
    /// Tick to invoke on each firing.
    pub(crate) tick: TickRef,
    /// Interval between ticks.
    pub(crate) interval: Duration,
    /// Optional delay before a one-time early tick.
    pub(crate) startup_delay: Option<Duration>,
    /// Catch-up behavior for the steady interval.
    pub(crate) missed_tick: MissedTickPolicy,
    /// Randomization of interval waits.
    pub(crate) jitter: JitterPolicy,
    /// Event bus for lifecycle and tick events.
    pub(crate) bus: Bus,
    /// This run's cancellation token (the one stored in the cancel slot).
    pub(crate) token: CancellationToken,
    /// 1-based tick counter, shared with the poller; never resets.
    pub(crate) ticks: Arc<AtomicU64>,
    /// Slot holding the live token; vacated only here, at teardown.
    pub(crate) cancel_slot: Arc<Mutex<Option<CancellationToken>>>,
    /// Failure handler, invoked once after teardown on abort.
    pub(crate) handler: Arc<Mutex<Option<LoopErrorHandler>>>,
    /// Terminal flag; a disposed poller's loop exits at the next safe point.
    pub(crate) disposed: Arc<AtomicBool>,
}

impl Driver {
    /// Runs the loop to completion and performs teardown.
    ///
    /// Teardown re-cancels the token (harmless if already cancelled) and
    /// vacates the cancel slot; only then are terminal events published and,
    /// on abort, the failure handler invoked. A handler that panics cannot
    /// leave the slot occupied.
    pub(crate) async fn run(self) {
        self.bus
            .publish(Event::now(EventKind::PollerStarted).with_poller(self.tick.name()));

        let outcome = self.drive().await;

        self.token.cancel();
        // Safe unconditionally: the slot holds this run's token for the
        // driver's entire lifetime, and only the driver vacates it.
        *self.cancel_slot.lock().unwrap() = None;

        match outcome {
            Ok(()) => {
                self.bus
                    .publish(Event::now(EventKind::PollerStopped).with_poller(self.tick.name()));
            }
            Err(e) => {
                self.bus.publish(
                    Event::now(EventKind::LoopAborted)
                        .with_poller(self.tick.name())
                        .with_reason(e.to_string()),
                );

                let handler = self.handler.lock().unwrap().clone();
                if let Some(h) = handler {
                    h(e);
                }
            }
        }
    }

    /// The loop body: startup tick, then interval ticks until an exit condition.
    ///
    /// Returns `Ok(())` for every clean exit (stop, dispose, canceled tick)
    /// and `Err` only when a tick failed or panicked.
    async fn drive(&self) -> Result<(), TickError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Ok(());
        }

        if let Some(delay) = self.startup_delay {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return Ok(()),
                _ = time::sleep(delay) => {}
            }
            if let Err(e) = self.run_tick(TickSource::Startup).await {
                return if e.is_canceled() { Ok(()) } else { Err(e) };
            }
        }

        let mut interval = IntervalSource::new(self.interval, self.missed_tick, self.jitter);
        loop {
            if self.disposed.load(Ordering::SeqCst) {
                return Ok(());
            }
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return Ok(()),
                _ = interval.wait() => {}
            }
            if let Err(e) = self.run_tick(TickSource::Interval).await {
                return if e.is_canceled() { Ok(()) } else { Err(e) };
            }
        }
    }

    /// Claims the next counter value and executes one tick inline.
    async fn run_tick(&self, source: TickSource) -> Result<(), TickError> {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        run_once(self.tick.as_ref(), &self.token, n, source, &self.bus).await
    }
}
