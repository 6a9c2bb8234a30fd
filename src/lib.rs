//! # tickloop
//!
//! **Tickloop** is a lightweight periodic polling library for Rust.
//!
//! It runs one async tick on a fixed interval in a background loop, with
//! cooperative cancellation, single-flight dispatch, and panic containment.
//! The crate is designed as a building block for pollers, heartbeats, cache
//! refreshers, and watchdog-style services.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                  ┌────────────────────────────┐
//!                  │        Tick (user)         │  impl Tick / TickFn closure
//!                  └─────────────┬──────────────┘
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Poller (lifecycle: Idle ◄──► Running, Disposed terminal)        │
//! │  - cancel slot (exactly one live CancellationToken per run)      │
//! │  - tick counter (1-based, survives restarts)                     │
//! │  - Bus (broadcast events, owned or shared)                       │
//! └──────────────────────────────┬───────────────────────────────────┘
//!                                │ start() spawns
//!                                ▼
//!                  ┌────────────────────────────┐
//!                  │     Driver (one run)       │
//!                  │  - startup delay + early   │
//!                  │    tick (optional)         │
//!                  │  - interval wait (steady   │
//!                  │    or jittered)            │
//!                  │  - single-flight tick,     │
//!                  │    panics contained        │
//!                  └─────────────┬──────────────┘
//!                                │ publishes
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     Bus (broadcast channel)                      │
//! │                  (capacity: Config::bus_capacity)                │
//! └──────────────────────────────┬───────────────────────────────────┘
//!                                ▼
//!                    ┌────────────────────────┐
//!                    │    fan-out listener    │
//!                    │ (spawned on 1st start) │
//!                    └───┬────────────────┬───┘
//!                        ▼                ▼
//!                   [queue S1]  ...  [queue SN]
//!                        │                │
//!                    worker S1        worker SN
//!                        ▼                ▼
//!                 sub1.on_event()  subN.on_event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! Poller::start() ──► tokio::spawn(Driver::run())
//!
//! run():
//!   ├─► publish PollerStarted
//!   ├─► optional: sleep(startup_delay) ──► tick #n (source = Startup)
//!   └─► loop {
//!         ├─► exit if cancelled or disposed
//!         ├─► wait interval (MissedTickPolicy, JitterPolicy)
//!         └─► tick #n (inline, never overlapping)
//!               ├─ Ok            ──► publish TickCompleted, continue
//!               ├─ Err(Canceled) ──► publish TickCompleted, exit clean
//!               ├─ Err(Failed)   ──► publish TickFailed, abort
//!               └─ panic         ──► contained ─► publish TickFailed, abort
//!       }
//!
//! On exit: cancel token (idempotent), vacate cancel slot, then
//!   ├─ clean ──► publish PollerStopped
//!   └─ abort ──► publish LoopAborted ──► error handler (at most once)
//!
//! stop() only signals; an in-flight tick may finish after it returns.
//! dispose() is terminal: the poller can never be started again.
//! ```
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits                         |
//! |-------------------|----------------------------------------------------------------------|--------------------------------------------|
//! | **Polling**       | Run one async tick on a fixed interval with single-flight dispatch.  | [`Poller`], [`PollerBuilder`], [`PollerState`] |
//! | **Ticks**         | Define tick bodies as trait impls or closures.                       | [`Tick`], [`TickFn`], [`TickRef`]          |
//! | **Cadence**       | Shape the interval: missed-tick catch-up, per-wait jitter.           | [`MissedTickPolicy`], [`JitterPolicy`]     |
//! | **Events**        | Observe loop and tick lifecycle via broadcast bus or subscribers.    | [`Event`], [`EventKind`], [`Bus`], [`Subscribe`] |
//! | **Tracking**      | Ready-made per-poller status snapshots.                              | [`TickTracker`]                            |
//! | **Errors**        | Typed errors for lifecycle and tick outcomes.                        | [`PollerError`], [`TickError`]             |
//! | **Configuration** | Centralize runtime settings.                                         | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use tickloop::{Poller, TickError, TickFn, TickRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn tickloop::Subscribe>> = {
//!         use tickloop::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn tickloop::Subscribe>> = Vec::new();
//!
//!     // Define the tick body; it observes the token cooperatively
//!     let probe: TickRef = TickFn::arc("probe", |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(TickError::Canceled);
//!         }
//!         // poll something...
//!         Ok(())
//!     });
//!
//!     let poller = Poller::builder(probe, Duration::from_millis(50))
//!         .with_startup_delay(Duration::from_millis(10))
//!         .with_subscribers(subs)
//!         .build()?;
//!
//!     poller.start()?;
//!     tokio::time::sleep(Duration::from_millis(180)).await;
//!     poller.stop(false)?;
//!
//!     poller.dispose();
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod ticks;

// ---- Public re-exports ----

pub use core::{Config, Poller, PollerBuilder, PollerState};
pub use error::{PollerError, TickError};
pub use events::{Bus, Event, EventKind, TickSource};
pub use policies::{JitterPolicy, MissedTickPolicy};
pub use subscribers::{Subscribe, SubscriberSet, TickTracker};
pub use ticks::{Tick, TickFn, TickRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
