//! # Example: heartbeat
//!
//! Minimal polling loop: one tick, one console subscriber.
//!
//! Shows how to:
//! - Build a [`Poller`] from a [`TickFn`] closure.
//! - Fire an early tick with [`PollerBuilder::with_startup_delay`].
//! - Attach the built-in [`LogWriter`] to watch lifecycle events.
//!
//! ## Flow
//! ```text
//! TickFn("heartbeat") ──► Poller::start()
//!     ├─► startup tick after 100ms
//!     ├─► interval ticks every 500ms
//!     └─► Bus ──► LogWriter ──► stdout
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogWriter`].
//! ```bash
//! cargo run --example heartbeat --features logging
//! ```

use std::{sync::Arc, time::Duration};

use tickloop::{LogWriter, Poller, Subscribe, TickError, TickFn, TickRef};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let tick: TickRef = TickFn::arc("heartbeat", |ctx: CancellationToken| async move {
        if ctx.is_cancelled() {
            return Err(TickError::Canceled);
        }
        println!("[heartbeat] thump");
        Ok::<(), TickError>(())
    });

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let poller = Poller::builder(tick, Duration::from_millis(500))
        .with_startup_delay(Duration::from_millis(100))
        .with_subscribers(subs)
        .build()?;

    poller.start()?;
    tokio::time::sleep(Duration::from_secs(2)).await;

    poller.stop(false)?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    poller.dispose();

    println!("\ndone after {} ticks", poller.ticks());
    Ok(())
}
