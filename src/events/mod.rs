//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the polling loop, the tick
//! executor, and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`TickSource`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the loop driver (`PollerStarted`/`PollerStopped`/`LoopAborted`),
//!   the tick executor (`TickStarted`/`TickCompleted`/`TickFailed`), the poller's
//!   lifecycle methods (`StateCleared`), and `SubscriberSet` workers (faults).
//! - **Consumers**: the per-poller bus listener (fans out to `SubscriberSet`)
//!   and ad-hoc receivers from [`Poller::subscribe`](crate::Poller::subscribe).
//!
//! See the crate-level docs for the system-level wiring diagram.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, TickSource};
