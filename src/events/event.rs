//! # Runtime events emitted by the polling loop.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Loop events**: the polling loop entered, exited cleanly, or aborted
//! - **Tick events**: per-invocation flow (started, completed, failed)
//! - **Plumbing events**: subscriber faults and state-clear notifications
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! poller name, tick counter, and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use tickloop::{Event, EventKind, TickSource};
//!
//! let ev = Event::now(EventKind::TickFailed)
//!     .with_poller("watcher")
//!     .with_tick(3)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TickFailed);
//! assert_eq!(ev.poller.as_deref(), Some("watcher"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `poller`: subscriber name
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `poller`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberOverflow,

    // === Loop events ===
    /// The polling loop task entered.
    ///
    /// Sets:
    /// - `poller`: poller name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    PollerStarted,

    /// The polling loop exited cleanly (stop, dispose, or a canceled tick).
    ///
    /// Sets:
    /// - `poller`: poller name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    PollerStopped,

    /// The polling loop terminated because a tick failed or panicked.
    ///
    /// The loop does not restart on its own; call `start()` again to resume.
    ///
    /// Sets:
    /// - `poller`: poller name
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    LoopAborted,

    // === Tick events ===
    /// A tick invocation begins.
    ///
    /// Sets:
    /// - `poller`: poller name
    /// - `tick`: tick counter (1-based, monotonic per poller across restarts)
    /// - `source`: `Startup` for the one-time early tick, `Interval` otherwise
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TickStarted,

    /// A tick finished, successfully or by observing cancellation.
    ///
    /// Sets:
    /// - `poller`: poller name
    /// - `tick`: tick counter
    /// - `source`: `Startup` or `Interval`
    /// - `elapsed_ms`: wall time the tick took (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TickCompleted,

    /// A tick returned a non-cancellation error or panicked.
    ///
    /// Always followed by [`EventKind::LoopAborted`] for the same poller.
    ///
    /// Sets:
    /// - `poller`: poller name
    /// - `tick`: tick counter
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TickFailed,

    // === State events ===
    /// The tick's `clear()` hook ran (stop-with-clear or dispose).
    ///
    /// Sets:
    /// - `poller`: poller name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StateCleared,
}

/// What scheduled a tick invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// The one-time early tick fired after the configured startup delay.
    Startup,
    /// A regular interval elapse.
    Interval,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the poller (or subscriber, for subscriber faults), if applicable.
    pub poller: Option<Arc<str>>,
    /// Tick counter (1-based, monotonic per poller across restarts).
    pub tick: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// What scheduled the tick (startup delay vs. regular interval).
    pub source: Option<TickSource>,
    /// Wall time the tick took, in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            poller: None,
            tick: None,
            reason: None,
            source: None,
            elapsed_ms: None,
        }
    }

    /// Attaches a poller name.
    #[inline]
    pub fn with_poller(mut self, poller: impl Into<Arc<str>>) -> Self {
        self.poller = Some(poller.into());
        self
    }

    /// Attaches a tick counter value.
    #[inline]
    pub fn with_tick(mut self, n: u64) -> Self {
        self.tick = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the tick source.
    #[inline]
    pub fn with_source(mut self, source: TickSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Attaches a tick duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.elapsed_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_poller(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_poller(subscriber)
            .with_reason(info)
    }

    /// True for subscriber-plumbing fault events.
    ///
    /// The fan-out set uses this to avoid reporting faults about fault events,
    /// which would loop under sustained overflow.
    #[inline]
    pub fn is_subscriber_fault(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::PollerStarted);
        let b = Event::now(EventKind::PollerStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_combinators_set_fields() {
        let ev = Event::now(EventKind::TickCompleted)
            .with_poller("demo")
            .with_tick(7)
            .with_source(TickSource::Interval)
            .with_elapsed(Duration::from_millis(12));

        assert_eq!(ev.poller.as_deref(), Some("demo"));
        assert_eq!(ev.tick, Some(7));
        assert_eq!(ev.source, Some(TickSource::Interval));
        assert_eq!(ev.elapsed_ms, Some(12));
        assert!(ev.reason.is_none());
    }

    #[test]
    fn test_elapsed_saturates_at_u32_max() {
        let ev = Event::now(EventKind::TickCompleted)
            .with_elapsed(Duration::from_secs(u64::from(u32::MAX)));
        assert_eq!(ev.elapsed_ms, Some(u32::MAX));
    }

    #[test]
    fn test_fault_detection() {
        assert!(Event::subscriber_overflow("s", "full").is_subscriber_fault());
        assert!(Event::subscriber_panicked("s", "p".into()).is_subscriber_fault());
        assert!(!Event::now(EventKind::TickStarted).is_subscriber_fault());
    }
}
