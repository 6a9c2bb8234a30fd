//! Cadence policies.
//!
//! This module groups the knobs that shape **when** the next tick is allowed
//! to fire once a poller is running.
//!
//! ## Contents
//! - [`MissedTickPolicy`] what to do when a tick runs longer than the interval
//! - [`JitterPolicy`]    randomization of each interval wait to avoid thundering herd
//!
//! ## Quick wiring
//! ```text
//! Config { missed_tick: MissedTickPolicy, jitter: JitterPolicy }
//!      └─► core::interval::IntervalSource uses:
//!           - missed_tick to configure the steady tokio interval
//!           - jitter.apply(period) to randomize each wait (sleep-based path)
//! ```
//!
//! ## Defaults
//! - `MissedTickPolicy::Skip` — missed intervals are coalesced into one tick,
//!   the behavior of a coalescing repeating timer.
//! - `JitterPolicy::None` — exact cadence; consider `Equal` when many pollers
//!   share a downstream resource.

mod jitter;
mod missed;

pub use jitter::JitterPolicy;
pub use missed::MissedTickPolicy;
