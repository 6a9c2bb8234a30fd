//! # Missed-tick policy for slow ticks.
//!
//! A tick is awaited inline (single-flight), so a tick that runs longer than
//! the interval makes the loop miss one or more scheduled firings.
//! [`MissedTickPolicy`] decides how the steady interval catches up.
//!
//! - [`MissedTickPolicy::Skip`] missed firings are coalesced into one; the
//!   next tick waits for the next full multiple of the period (default).
//! - [`MissedTickPolicy::Delay`] the schedule shifts: the next tick fires one
//!   full period after the slow tick finished.
//! - [`MissedTickPolicy::Burst`] missed firings are replayed back-to-back
//!   until the schedule catches up.
//!
//! Only the steady (unjittered) interval path consults this policy; jittered
//! waits recompute a fresh delay per tick, so there is no fixed schedule to
//! miss.

use tokio::time::MissedTickBehavior;

/// Policy controlling how the interval catches up after a slow tick.
///
/// Maps directly onto [`tokio::time::MissedTickBehavior`]; the names are kept
/// close so the tokio documentation applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissedTickPolicy {
    /// Coalesce missed firings into a single tick (default).
    ///
    /// Matches the behavior of a coalescing repeating timer: no matter how
    /// late a tick finished, at most one catch-up tick fires, aligned to the
    /// original schedule.
    #[default]
    Skip,

    /// Shift the schedule: the next tick fires one full period after the
    /// previous tick completed.
    Delay,

    /// Replay every missed firing back-to-back until caught up.
    ///
    /// Preserves the average tick rate at the cost of dense bursts after a
    /// stall.
    Burst,
}

impl MissedTickPolicy {
    /// The equivalent tokio behavior for the steady interval.
    pub(crate) fn as_tokio(&self) -> MissedTickBehavior {
        match self {
            MissedTickPolicy::Skip => MissedTickBehavior::Skip,
            MissedTickPolicy::Delay => MissedTickBehavior::Delay,
            MissedTickPolicy::Burst => MissedTickBehavior::Burst,
        }
    }
}
