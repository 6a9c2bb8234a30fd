//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from multiple sources (the loop driver, the
//! subscriber workers, the poller's lifecycle methods).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                  Subscribers (many):
//!   driver loop ──┐            ┌────► Poller::subscribe() receivers (tests, ad-hoc)
//!   run_once    ──┼──► Bus ────┤
//!   Poller      ──┘            └────► bus listener ────► SubscriberSet
//! ```
//!
//! Several pollers may share one `Bus` (see
//! [`PollerBuilder::with_bus`](crate::PollerBuilder::with_bus)), in which case
//! their events interleave on the same stream, distinguishable by the `poller`
//! field.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] that provides `publish`/`subscribe` API.
/// Multiple publishers can publish concurrently; subscribers receive clones of each event.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// ### Notes
    /// - Capacity is **shared** across all receivers (not per-subscriber).
    /// - When receivers lag, they will observe `RecvError::Lagged`.
    /// - The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// - Takes ownership of the event; the broadcast channel clones it for each receiver.
    /// - If there are no receivers, the event is dropped (this function still returns immediately).
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// - Each call creates an **independent** receiver.
    /// - A receiver only gets events **sent after** it subscribes.
    /// - Slow receivers get `RecvError::Lagged(n)` and skip over missed items.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::now(EventKind::PollerStarted).with_poller("p"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::PollerStarted);
        assert_eq!(ev.poller.as_deref(), Some("p"));
    }

    #[tokio::test]
    async fn test_receiver_only_sees_later_events() {
        let bus = Bus::new(8);
        bus.publish(Event::now(EventKind::PollerStarted));

        let mut rx = bus.subscribe();
        bus.publish(Event::now(EventKind::PollerStopped));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::PollerStopped);
    }

    #[tokio::test]
    async fn test_capacity_clamped_to_one() {
        // Capacity 0 must not panic; it is clamped internally.
        let bus = Bus::new(0);
        let mut rx = bus.subscribe();
        bus.publish(Event::now(EventKind::PollerStarted));
        assert!(rx.recv().await.is_ok());
    }
}
