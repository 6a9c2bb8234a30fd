//! # Run a single tick invocation.
//!
//! Executes one invocation of a [`Tick`], publishes per-tick events to [`Bus`],
//! and contains panics so a misbehaving tick cannot tear down the runtime.
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   tick.tick() → Ok(())        → publish TickCompleted
//!
//! Cancellation:
//!   tick.tick() → Err(Canceled) → publish TickCompleted (graceful exit)
//!
//! Failure:
//!   tick.tick() → Err(Failed)   → publish TickFailed
//!
//! Panic:
//!   tick.tick() → panic!        → caught → publish TickFailed
//!                               → return Panicked error
//! ```
//!
//! ## Rules
//! - Publishes exactly one `TickStarted` and exactly one terminal event
//! - `Canceled` is treated as graceful exit → `TickCompleted` (not `TickFailed`)
//! - Panics are converted to [`TickError::Panicked`] via `catch_unwind`
//! - Elapsed time covers the tick body only, not the interval wait

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    error::TickError,
    events::{Bus, Event, EventKind, TickSource},
    ticks::Tick,
};

/// Executes a single invocation of `tick`, publishing per-tick events to `bus`.
///
/// ### Flow
/// 1. Publish `TickStarted` with the counter value and source
/// 2. Run the tick body under `catch_unwind`
/// 3. Publish the terminal event based on the result
///
/// ### Cancellation semantics
/// - The tick receives a clone of the loop token and **should** return
///   `Err(TickError::Canceled)` when it detects cancellation
/// - `Canceled` is graceful: publishes `TickCompleted`, never `TickFailed`
///
/// ### Panic semantics
/// A panicking tick is caught and surfaces as `Err(TickError::Panicked)`;
/// the payload message is preserved when it is a `&str` or `String`.
pub(crate) async fn run_once<T: Tick + ?Sized>(
    tick: &T,
    token: &CancellationToken,
    n: u64,
    source: TickSource,
    bus: &Bus,
) -> Result<(), TickError> {
    bus.publish(
        Event::now(EventKind::TickStarted)
            .with_poller(tick.name())
            .with_tick(n)
            .with_source(source),
    );

    let started = Instant::now();
    let res = match AssertUnwindSafe(tick.tick(token.clone())).catch_unwind().await {
        Ok(r) => r,
        Err(payload) => Err(TickError::Panicked {
            panic: panic_message(payload),
        }),
    };
    let elapsed = started.elapsed();

    match res {
        Ok(()) => {
            publish_completed(bus, tick.name(), n, source, elapsed);
            Ok(())
        }
        Err(TickError::Canceled) => {
            publish_completed(bus, tick.name(), n, source, elapsed);
            Err(TickError::Canceled)
        }
        Err(e) => {
            publish_failed(bus, tick.name(), n, &e);
            Err(e)
        }
    }
}

/// Publishes `TickCompleted` (success or graceful cancellation).
fn publish_completed(bus: &Bus, name: &str, n: u64, source: TickSource, elapsed: std::time::Duration) {
    bus.publish(
        Event::now(EventKind::TickCompleted)
            .with_poller(name)
            .with_tick(n)
            .with_source(source)
            .with_elapsed(elapsed),
    );
}

/// Publishes `TickFailed` with error details.
fn publish_failed(bus: &Bus, name: &str, n: u64, err: &TickError) {
    bus.publish(
        Event::now(EventKind::TickFailed)
            .with_poller(name)
            .with_tick(n)
            .with_reason(err.to_string()),
    );
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticks::TickFn;

    fn test_bus() -> Bus {
        Bus::new(64)
    }

    #[tokio::test]
    async fn test_success_publishes_completed() {
        let bus = test_bus();
        let mut rx = bus.subscribe();
        let tick = TickFn::new("ok", |_ctx: CancellationToken| async {
            Ok::<_, TickError>(())
        });

        let res = run_once(&tick, &CancellationToken::new(), 1, TickSource::Interval, &bus).await;
        assert!(res.is_ok());

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::TickStarted);
        let done = rx.recv().await.unwrap();
        assert_eq!(done.kind, EventKind::TickCompleted);
        assert_eq!(done.tick, Some(1));
        assert!(done.elapsed_ms.is_some());
    }

    #[tokio::test]
    async fn test_canceled_is_graceful() {
        let bus = test_bus();
        let mut rx = bus.subscribe();
        let tick = TickFn::new("bail", |_ctx: CancellationToken| async {
            Err::<(), _>(TickError::Canceled)
        });

        let res = run_once(&tick, &CancellationToken::new(), 3, TickSource::Interval, &bus).await;
        assert!(matches!(res, Err(TickError::Canceled)));

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::TickStarted);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::TickCompleted);
    }

    #[tokio::test]
    async fn test_failure_publishes_failed() {
        let bus = test_bus();
        let mut rx = bus.subscribe();
        let tick = TickFn::new("bad", |_ctx: CancellationToken| async {
            Err::<(), _>(TickError::failed("boom"))
        });

        let res = run_once(&tick, &CancellationToken::new(), 2, TickSource::Startup, &bus).await;
        assert!(matches!(res, Err(TickError::Failed { .. })));

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::TickStarted);
        let failed = rx.recv().await.unwrap();
        assert_eq!(failed.kind, EventKind::TickFailed);
        assert_eq!(failed.reason.as_deref(), Some("tick failed: boom"));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let bus = test_bus();
        let mut rx = bus.subscribe();
        let tick = TickFn::new("explode", |_ctx: CancellationToken| async {
            panic!("kaboom")
        });

        let res = run_once(&tick, &CancellationToken::new(), 1, TickSource::Interval, &bus).await;
        match res {
            Err(TickError::Panicked { panic }) => assert_eq!(panic, "kaboom"),
            other => panic!("expected Panicked, got {other:?}"),
        }

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::TickStarted);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::TickFailed);
    }
}
