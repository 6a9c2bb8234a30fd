//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [poller-started] poller="heartbeat"
//! [tick-started] poller="heartbeat" tick=1 source=startup
//! [tick-completed] poller="heartbeat" tick=1 elapsed=3ms
//! [tick-failed] poller="heartbeat" tick=4 err="connection refused"
//! [loop-aborted] poller="heartbeat" err="connection refused"
//! [poller-stopped] poller="heartbeat"
//! [state-cleared] poller="heartbeat"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind, TickSource};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event descriptions
/// to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn source_label(source: Option<TickSource>) -> &'static str {
    match source {
        Some(TickSource::Startup) => "startup",
        Some(TickSource::Interval) => "interval",
        None => "unknown",
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::PollerStarted => {
                println!("[poller-started] poller={:?}", e.poller);
            }
            EventKind::PollerStopped => {
                println!("[poller-stopped] poller={:?}", e.poller);
            }
            EventKind::LoopAborted => {
                println!("[loop-aborted] poller={:?} err={:?}", e.poller, e.reason);
            }
            EventKind::TickStarted => {
                println!(
                    "[tick-started] poller={:?} tick={:?} source={}",
                    e.poller,
                    e.tick,
                    source_label(e.source)
                );
            }
            EventKind::TickCompleted => {
                println!(
                    "[tick-completed] poller={:?} tick={:?} elapsed={:?}ms",
                    e.poller, e.tick, e.elapsed_ms
                );
            }
            EventKind::TickFailed => {
                println!(
                    "[tick-failed] poller={:?} tick={:?} err={:?}",
                    e.poller, e.tick, e.reason
                );
            }
            EventKind::StateCleared => {
                println!("[state-cleared] poller={:?}", e.poller);
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.poller, e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.poller.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
