//! # Example: stop_resume
//!
//! Stop a running poller, then start it again: the loop halts between the
//! two phases and the tick counter carries over instead of resetting.
//!
//! ## Flow
//! ```text
//! Poller::start() ──► ticks 1..N ──► Poller::stop(false)
//!        │                                  │
//!        └── counter kept ──► Poller::start() ──► ticks N+1..
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example stop_resume
//! ```

use std::time::Duration;

use tickloop::{Poller, PollerState, TickError, TickFn, TickRef};
use tokio_util::sync::CancellationToken;

async fn wait_idle(poller: &Poller) {
    while poller.state() != PollerState::Idle {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let tick: TickRef = TickFn::arc("pulse", |_ctx: CancellationToken| async {
        println!("[pulse] tick");
        Ok::<(), TickError>(())
    });
    let poller = Poller::new(tick, Duration::from_millis(200))?;

    println!("phase 1: running for 1s");
    poller.start()?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    poller.stop(false)?;
    wait_idle(&poller).await;
    println!(
        "phase 1 done: {} ticks, state={:?}\n",
        poller.ticks(),
        poller.state()
    );

    println!("phase 2: resumed for 1s");
    poller.start()?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    poller.stop(false)?;
    wait_idle(&poller).await;
    println!("phase 2 done: {} ticks total", poller.ticks());

    poller.dispose();
    Ok(())
}
