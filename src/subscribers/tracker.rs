//! # Poller lifecycle tracker with sequence-based ordering.
//!
//! Maintains authoritative state of which pollers are currently running,
//! how many ticks each has executed, and the last failure seen, using event
//! sequence numbers to handle out-of-order delivery.
//!
//! ## Architecture
//! ```text
//! driver loop ──► Bus ──► bus listener ──► TickTracker::update()
//!                                                 │
//!                                                 ▼
//!                                   HashMap<String, PollerStatus>
//!                              (name → {seq, running, ticks, last_error})
//! ```
//!
//! ## Rules
//! - `PollerStarted` / `TickStarted` / `TickCompleted` mark the poller running
//! - `PollerStopped` / `LoopAborted` mark it stopped
//! - `TickFailed` records the failure reason (the loop abort follows)
//! - Read operations (`snapshot`, `is_running`, ...) are **eventually consistent**
//! - Events with `seq <= last_seq` for a poller are **rejected** (stale)

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Per-poller state for ordering validation.
#[derive(Debug, Clone, Default)]
struct PollerStatus {
    /// Last seen sequence number for this poller.
    last_seq: u64,
    /// Current status (true = loop running, false = idle/aborted).
    running: bool,
    /// Highest tick counter observed.
    ticks: u64,
    /// Reason of the most recent `TickFailed`, if any.
    last_error: Option<Arc<str>>,
}

/// Thread-safe tracker of running pollers.
///
/// Attach it as a subscriber (or feed it events manually through
/// [`TickTracker::update`]) to get queryable lifecycle state without parsing
/// the raw event stream.
///
/// ### Rules
/// - **Ordering**: events with `seq <= last_seq` are rejected
/// - **Tick counts**: monotonic, taken from the event's `tick` field
#[derive(Default)]
pub struct TickTracker {
    state: RwLock<HashMap<String, PollerStatus>>,
}

impl TickTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Updates poller state if the event is newer than the last seen.
    ///
    /// Returns `true` when the event changed the running flag, the tick
    /// counter, or the recorded error; `false` for stale or irrelevant events.
    ///
    /// ### Ordering guarantees
    /// Events are applied only if `ev.seq > last_seq` for this poller.
    /// This prevents out-of-order delivery from corrupting state:
    /// ```text
    /// update(PollerStopped, seq=100) → running=false, last_seq=100
    /// update(TickStarted,   seq=99)  → rejected (stale)
    /// ```
    pub async fn update(&self, ev: &Event) -> bool {
        let name = match ev.poller.as_deref() {
            Some(n) => n,
            None => return false,
        };

        let mut state = self.state.write().await;
        let entry = state.entry(name.to_string()).or_default();

        if ev.seq <= entry.last_seq {
            return false;
        }
        entry.last_seq = ev.seq;

        match ev.kind {
            EventKind::PollerStarted => {
                entry.running = true;
                true
            }
            EventKind::TickStarted | EventKind::TickCompleted => {
                entry.running = true;
                if let Some(n) = ev.tick {
                    entry.ticks = entry.ticks.max(n);
                }
                true
            }
            EventKind::TickFailed => {
                entry.last_error = ev.reason.clone();
                true
            }
            EventKind::PollerStopped | EventKind::LoopAborted => {
                entry.running = false;
                true
            }
            _ => false,
        }
    }

    /// Returns true if the named poller's loop is currently running.
    pub async fn is_running(&self, name: &str) -> bool {
        self.state
            .read()
            .await
            .get(name)
            .map(|st| st.running)
            .unwrap_or(false)
    }

    /// Returns the highest tick counter observed for the named poller.
    pub async fn ticks(&self, name: &str) -> u64 {
        self.state
            .read()
            .await
            .get(name)
            .map(|st| st.ticks)
            .unwrap_or(0)
    }

    /// Returns the reason of the most recent tick failure, if any.
    pub async fn last_error(&self, name: &str) -> Option<Arc<str>> {
        self.state
            .read()
            .await
            .get(name)
            .and_then(|st| st.last_error.clone())
    }

    /// Returns a sorted list of currently running poller names.
    pub async fn snapshot(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut running: Vec<String> = state
            .iter()
            .filter(|(_, st)| st.running)
            .map(|(name, _)| name.clone())
            .collect();
        running.sort_unstable();
        running
    }
}

#[async_trait]
impl Subscribe for TickTracker {
    async fn on_event(&self, event: &Event) {
        self.update(event).await;
    }

    fn name(&self) -> &'static str {
        "tick-tracker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TickSource;

    #[tokio::test]
    async fn test_lifecycle_transitions() {
        let tracker = TickTracker::new();

        tracker
            .update(&Event::now(EventKind::PollerStarted).with_poller("w"))
            .await;
        assert!(tracker.is_running("w").await);

        tracker
            .update(
                &Event::now(EventKind::TickStarted)
                    .with_poller("w")
                    .with_tick(1)
                    .with_source(TickSource::Interval),
            )
            .await;
        assert_eq!(tracker.ticks("w").await, 1);

        tracker
            .update(&Event::now(EventKind::PollerStopped).with_poller("w"))
            .await;
        assert!(!tracker.is_running("w").await);
        assert_eq!(tracker.ticks("w").await, 1);
    }

    #[tokio::test]
    async fn test_stale_events_rejected() {
        let tracker = TickTracker::new();

        let newer = Event::now(EventKind::PollerStopped).with_poller("w");
        let stale = Event {
            seq: newer.seq.saturating_sub(1),
            ..Event::now(EventKind::PollerStarted).with_poller("w")
        };

        assert!(tracker.update(&newer).await);
        assert!(!tracker.update(&stale).await);
        assert!(!tracker.is_running("w").await);
    }

    #[tokio::test]
    async fn test_failure_reason_recorded() {
        let tracker = TickTracker::new();

        tracker
            .update(
                &Event::now(EventKind::TickFailed)
                    .with_poller("w")
                    .with_tick(4)
                    .with_reason("boom"),
            )
            .await;
        tracker
            .update(
                &Event::now(EventKind::LoopAborted)
                    .with_poller("w")
                    .with_reason("boom"),
            )
            .await;

        assert!(!tracker.is_running("w").await);
        assert_eq!(tracker.last_error("w").await.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_snapshot_is_sorted_and_filtered() {
        let tracker = TickTracker::new();
        for name in ["zeta", "alpha", "mid"] {
            tracker
                .update(&Event::now(EventKind::PollerStarted).with_poller(name))
                .await;
        }
        tracker
            .update(&Event::now(EventKind::PollerStopped).with_poller("mid"))
            .await;

        assert_eq!(tracker.snapshot().await, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_events_without_poller_ignored() {
        let tracker = TickTracker::new();
        assert!(!tracker.update(&Event::now(EventKind::PollerStarted)).await);
        assert!(tracker.snapshot().await.is_empty());
    }
}
