//! # Runtime configuration.
//!
//! Provides [`Config`] centralized settings for a poller.
//!
//! Config is consumed by [`PollerBuilder`](crate::PollerBuilder); the cadence
//! itself (interval, startup delay) is not part of it because those are
//! per-poller construction arguments with their own validation.

use crate::policies::{JitterPolicy, MissedTickPolicy};

/// Runtime knobs for a poller.
///
/// Defines:
/// - **Event system**: bus capacity for event delivery
/// - **Cadence shape**: missed-tick catch-up and per-wait jitter
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `missed_tick`: How the steady interval catches up after a slow tick
/// - `jitter`: Randomization of each interval wait
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to
/// avoid sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,

    /// What to do when a tick runs longer than the interval.
    ///
    /// Only consulted by the steady (unjittered) interval path.
    pub missed_tick: MissedTickPolicy,

    /// Randomization of each interval wait.
    ///
    /// With [`JitterPolicy::None`] the poller keeps an exact cadence.
    pub jitter: JitterPolicy,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` should use this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024` (good baseline)
    /// - `missed_tick = MissedTickPolicy::Skip` (coalesce missed firings)
    /// - `jitter = JitterPolicy::None` (exact cadence)
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            missed_tick: MissedTickPolicy::default(),
            jitter: JitterPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.bus_capacity, 1024);
        assert_eq!(cfg.missed_tick, MissedTickPolicy::Skip);
        assert_eq!(cfg.jitter, JitterPolicy::None);
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
