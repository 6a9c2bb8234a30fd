//! Interval wait source for the polling loop.
//!
//! Two shapes:
//! - **Steady**: a [`tokio::time::Interval`] anchored one period after
//!   creation, with a configurable missed-tick behavior. Keeps cadence
//!   aligned to the period even when ticks take time.
//! - **Jittered**: an independent randomized sleep per wait. No alignment,
//!   each gap is drawn fresh from the jitter policy.

use std::time::Duration;

use tokio::time::{Instant, Interval, interval_at};

use crate::policies::{JitterPolicy, MissedTickPolicy};

/// One wait between ticks.
///
/// Constructed per loop run; the steady variant owns the tokio interval so
/// cadence state survives across iterations.
pub(crate) enum IntervalSource {
    /// Fixed-period tokio interval.
    Steady(Interval),
    /// Fresh randomized sleep per wait.
    Jittered {
        period: Duration,
        jitter: JitterPolicy,
    },
}

impl IntervalSource {
    /// Builds a wait source for `period` under the given policies.
    ///
    /// The steady interval is anchored at `now + period` so the first wait
    /// is a full period (no immediate fire).
    pub(crate) fn new(period: Duration, missed: MissedTickPolicy, jitter: JitterPolicy) -> Self {
        if jitter.is_none() {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(missed.as_tokio());
            Self::Steady(interval)
        } else {
            Self::Jittered { period, jitter }
        }
    }

    /// Waits until the next tick is due.
    pub(crate) async fn wait(&mut self) {
        match self {
            Self::Steady(interval) => {
                interval.tick().await;
            }
            Self::Jittered { period, jitter } => {
                tokio::time::sleep(jitter.apply(*period)).await;
            }
        }
    }
}
