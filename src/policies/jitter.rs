//! # Jitter policy for interval waits.
//!
//! [`JitterPolicy`] adds randomness to each interval wait to prevent
//! thundering herd effects when many pollers with the same cadence hit a
//! shared resource (an API, a database, a file system).
//!
//! - [`JitterPolicy::None`] — no randomization, exact cadence
//! - [`JitterPolicy::Full`] — random wait in [0, period] (most aggressive)
//! - [`JitterPolicy::Equal`] — wait = period/2 + random[0, period/2] (balanced)
//!
//! Jitter is applied independently per wait; the randomized value never feeds
//! back into subsequent waits, so the cadence cannot drift shorter over time.

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of interval waits.
///
/// Prevents synchronized ticks across multiple pollers by adding controlled
/// randomness to each wait.
///
/// ## Trade-offs
/// - **None**: Predictable cadence, but risks thundering herd
/// - **Full**: Maximum randomness, aggressive load spreading
/// - **Equal**: Balanced (recommended when jitter is wanted at all)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: wait exactly one period.
    ///
    /// Use when:
    /// - Only one poller targets the resource (no herd risk)
    /// - Predictable timing is required
    /// - Testing/debugging
    #[default]
    None,

    /// Full jitter: random wait in [0, period].
    ///
    /// Most aggressive jitter, can significantly shorten a wait.
    /// Use when maximum load spreading is needed.
    Full,

    /// Equal jitter: wait = period/2 + random[0, period/2].
    ///
    /// Balances predictability with randomness; preserves ~75% of the
    /// period on average.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to one interval wait.
    ///
    /// [`JitterPolicy::None`] returns the period unchanged, so the steady
    /// unjittered cadence is the identity case.
    pub fn apply(&self, period: Duration) -> Duration {
        match self {
            JitterPolicy::None => period,
            JitterPolicy::Full => self.full_jitter(period),
            JitterPolicy::Equal => self.equal_jitter(period),
        }
    }

    /// True when waits go through the steady interval path (no randomization).
    pub fn is_none(&self) -> bool {
        matches!(self, JitterPolicy::None)
    }

    /// Full jitter: random[0, period]
    fn full_jitter(&self, period: Duration) -> Duration {
        let mut rng = rand::rng();
        let ms = period.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.random_range(0..=ms))
    }

    /// Equal jitter: period/2 + random[0, period/2]
    fn equal_jitter(&self, period: Duration) -> Duration {
        let mut rng = rand::rng();
        let ms = period.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        let half = ms / 2;
        let jitter = if half == 0 {
            0
        } else {
            rng.random_range(0..=half)
        };
        Duration::from_millis(half + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let period = Duration::from_millis(250);
        for _ in 0..10 {
            assert_eq!(JitterPolicy::None.apply(period), period);
        }
    }

    #[test]
    fn test_full_jitter_within_bounds() {
        let period = Duration::from_millis(100);
        for _ in 0..100 {
            let d = JitterPolicy::Full.apply(period);
            assert!(d <= period, "full jitter {:?} exceeds period", d);
        }
    }

    #[test]
    fn test_equal_jitter_within_bounds() {
        let period = Duration::from_millis(100);
        let half = Duration::from_millis(50);
        for _ in 0..100 {
            let d = JitterPolicy::Equal.apply(period);
            assert!(d >= half, "equal jitter {:?} below half period", d);
            assert!(d <= period, "equal jitter {:?} exceeds period", d);
        }
    }

    #[test]
    fn test_zero_period_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(JitterPolicy::Equal.apply(Duration::ZERO), Duration::ZERO);
    }
}
