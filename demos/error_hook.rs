//! # Example: error_hook
//!
//! A failing tick aborts the loop. The error handler observes the failure,
//! and the caller decides whether to start the loop again.
//!
//! ## Flow
//! ```text
//! tick #3 ──► Err(Failed) ──► loop aborts
//!                  │
//!                  ├─► Bus: TickFailed + LoopAborted
//!                  └─► error handler (at most once per run)
//!                           │
//!                           └─► main() restarts the poller
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example error_hook
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tickloop::{Poller, PollerState, TickError, TickFn, TickRef};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicU64::new(0));
    let c = calls.clone();
    let tick: TickRef = TickFn::arc("brittle", move |_ctx: CancellationToken| {
        let c = c.clone();
        async move {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 3 {
                return Err(TickError::failed("third time is not the charm"));
            }
            println!("[brittle] tick {n} ok");
            Ok(())
        }
    });

    let poller = Poller::builder(tick, Duration::from_millis(150))
        .with_error_handler(|e| println!("[hook] loop aborted: {e}"))
        .build()?;

    poller.start()?;
    while poller.state() == PollerState::Running {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    println!("aborted after {} ticks; restarting\n", poller.ticks());

    // Recovery is explicit: the loop never restarts itself.
    poller.start()?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    poller.stop(false)?;
    poller.dispose();

    println!("\nfinal tick count: {}", poller.ticks());
    Ok(())
}
