//! # Example: custom_subscriber
//!
//! Demonstrates how to build and attach a custom event subscriber, and how
//! two pollers can share one event bus.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait.
//! - Inspect [`Event`] / [`EventKind`] for tick lifecycle details.
//! - Share a [`Bus`] between pollers with [`PollerBuilder::with_bus`].
//! - Query live state through a [`TickTracker`].
//!
//! ## Flow
//! ```text
//! Poller("fast") ──┐
//!                  ├─► shared Bus ──► listener ─┬─► ConsoleSubscriber.on_event()
//! Poller("slow") ──┘                            └─► TickTracker.update()
//! ```
//!
//! Only the first poller attaches the subscriber set: with a shared bus a
//! second set would receive every event twice.
//!
//! ## Run
//! ```bash
//! cargo run --example custom_subscriber
//! ```

use std::{sync::Arc, time::Duration};

use tickloop::{
    Bus, Event, EventKind, Poller, Subscribe, TickError, TickFn, TickRef, TickSource, TickTracker,
};
use tokio_util::sync::CancellationToken;

/// A simple console subscriber that prints selected events.
/// In real life, you could export metrics, ship logs, or trigger alerts.
struct ConsoleSubscriber;

#[async_trait::async_trait]
impl Subscribe for ConsoleSubscriber {
    async fn on_event(&self, ev: &Event) {
        let name = ev.poller.as_deref().unwrap_or("<unknown>");
        match ev.kind {
            // === Lifecycle ===
            EventKind::PollerStarted => println!("[sub] started:  {name}"),
            EventKind::PollerStopped => println!("[sub] stopped:  {name}"),
            EventKind::LoopAborted => println!(
                "[sub] aborted:  {name} reason={}",
                ev.reason.as_deref().unwrap_or("<none>")
            ),
            EventKind::StateCleared => println!("[sub] cleared:  {name}"),

            // === Ticks ===
            EventKind::TickStarted => {
                let src = match ev.source {
                    Some(TickSource::Startup) => "startup",
                    Some(TickSource::Interval) => "interval",
                    None => "unknown",
                };
                println!("[sub] tick:     {name} #{} ({src})", ev.tick.unwrap_or(0));
            }
            EventKind::TickCompleted => println!(
                "[sub] done:     {name} #{} in {}ms",
                ev.tick.unwrap_or(0),
                ev.elapsed_ms.unwrap_or(0)
            ),
            EventKind::TickFailed => println!(
                "[sub] failed:   {name} #{} reason={}",
                ev.tick.unwrap_or(0),
                ev.reason.as_deref().unwrap_or("<none>")
            ),

            // === Ignored ===
            EventKind::SubscriberPanicked | EventKind::SubscriberOverflow => {}
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }

    fn queue_capacity(&self) -> usize {
        1024
    }
}

/// Tick that simulates a short unit of work.
fn probe(name: &'static str) -> TickRef {
    TickFn::arc(name, |_ctx: CancellationToken| async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<(), TickError>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let bus = Bus::new(256);
    let tracker = Arc::new(TickTracker::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(ConsoleSubscriber), tracker.clone()];

    // The first poller owns the subscriber set; through the shared bus it
    // observes the second poller's events as well.
    let fast = Poller::builder(probe("fast"), Duration::from_millis(250))
        .with_bus(bus.clone())
        .with_subscribers(subs)
        .build()?;
    let slow = Poller::builder(probe("slow"), Duration::from_millis(600))
        .with_bus(bus.clone())
        .with_startup_delay(Duration::from_millis(50))
        .build()?;

    fast.start()?;
    slow.start()?;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    println!("\nrunning pollers: {:?}", tracker.snapshot().await);
    println!(
        "fast={} ticks, slow={} ticks\n",
        tracker.ticks("fast").await,
        tracker.ticks("slow").await
    );

    fast.stop(false)?;
    slow.stop(false)?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    println!("\nrunning pollers after stop: {:?}", tracker.snapshot().await);

    fast.dispose();
    slow.dispose();
    Ok(())
}
