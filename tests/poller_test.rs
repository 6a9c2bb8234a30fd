//! Lifecycle tests for the poller: construction, start/stop/dispose,
//! failure handling, and the clear hook.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickloop::{EventKind, Poller, PollerError, PollerState, TickError, TickFn, TickRef};
use tokio_util::sync::CancellationToken;

fn counting_tick(name: &'static str) -> (TickRef, Arc<AtomicU64>) {
    let count = Arc::new(AtomicU64::new(0));
    let c = count.clone();
    let tick: TickRef = TickFn::arc(name, move |_ctx: CancellationToken| {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    (tick, count)
}

async fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

#[tokio::test]
async fn test_zero_interval_rejected() {
    let (tick, _) = counting_tick("bad-interval");
    let err = Poller::new(tick, Duration::ZERO).unwrap_err();
    assert!(matches!(err, PollerError::InvalidInterval { .. }));
}

#[tokio::test]
async fn test_zero_startup_delay_rejected() {
    let (tick, _) = counting_tick("bad-delay");
    let err = Poller::builder(tick, Duration::from_millis(50))
        .with_startup_delay(Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(matches!(err, PollerError::InvalidStartupDelay { .. }));
}

#[tokio::test]
async fn test_start_twice_runs_single_loop() {
    let (tick, count) = counting_tick("idempotent");
    let poller = Poller::new(tick, Duration::from_millis(40)).unwrap();
    let mut rx = poller.subscribe();

    poller.start().unwrap();
    poller.start().unwrap(); // must be a no-op

    tokio::time::sleep(Duration::from_millis(220)).await;
    poller.stop(false).unwrap();

    // Single cadence: ~5 ticks for one loop; a duplicate loop would double it.
    let n = count.load(Ordering::SeqCst);
    assert!(n >= 1 && n <= 7, "tick count {n} suggests a duplicate loop");

    // Exactly one loop lifecycle on the event stream.
    let mut started = 0;
    loop {
        let ev = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("event stream stalled")
            .expect("bus closed");
        match ev.kind {
            EventKind::PollerStarted => started += 1,
            EventKind::PollerStopped => break,
            _ => {}
        }
    }
    assert_eq!(started, 1);
}

#[tokio::test]
async fn test_stop_start_roundtrip_resumes() {
    let (tick, count) = counting_tick("roundtrip");
    let poller = Poller::new(tick, Duration::from_millis(25)).unwrap();

    poller.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || count.load(Ordering::SeqCst) >= 2).await);

    poller.stop(false).unwrap();
    assert!(wait_until(Duration::from_secs(2), || poller.state() == PollerState::Idle).await);

    let after_stop = count.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(
        count.load(Ordering::SeqCst),
        after_stop,
        "ticks continued after stop"
    );

    // Restart resumes ticking; the counter keeps growing, never resets.
    poller.start().unwrap();
    assert!(
        wait_until(Duration::from_secs(2), || {
            count.load(Ordering::SeqCst) >= after_stop + 2
        })
        .await
    );
    assert!(poller.ticks() >= after_stop + 2);
    poller.stop(false).unwrap();
}

#[tokio::test]
async fn test_lifecycle_methods_fail_after_dispose() {
    let (tick, _) = counting_tick("disposed");
    let poller = Poller::new(tick, Duration::from_millis(50)).unwrap();
    poller.dispose();

    assert_eq!(poller.start().unwrap_err(), PollerError::Disposed);
    assert_eq!(poller.stop(false).unwrap_err(), PollerError::Disposed);
    assert_eq!(poller.state(), PollerState::Disposed);
}

#[tokio::test]
async fn test_dispose_twice_is_quiet() {
    let (tick, _) = counting_tick("double-dispose");
    let poller = Poller::new(tick, Duration::from_millis(50)).unwrap();
    poller.start().unwrap();

    poller.dispose();
    poller.dispose(); // second call must be a silent no-op
    assert_eq!(poller.state(), PollerState::Disposed);
}

#[tokio::test]
async fn test_failing_tick_reaches_handler_exactly_once() {
    let errors: Arc<Mutex<Vec<TickError>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();

    let tick: TickRef = TickFn::arc("faulty", |_ctx: CancellationToken| async {
        Err(TickError::failed("first tick boom"))
    });
    let poller = Poller::builder(tick, Duration::from_millis(20))
        .with_error_handler(move |e| sink.lock().unwrap().push(e))
        .build()
        .unwrap();

    poller.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || !errors.lock().unwrap().is_empty()).await);
    assert!(wait_until(Duration::from_secs(2), || poller.state() == PollerState::Idle).await);

    // Give a hypothetical second invocation time to appear.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let recorded = errors.lock().unwrap();
    assert_eq!(recorded.len(), 1, "handler must fire exactly once");
    assert_eq!(recorded[0], TickError::failed("first tick boom"));
    assert_eq!(poller.ticks(), 1, "no second tick after the abort");
}

#[tokio::test]
async fn test_panicking_tick_reaches_handler_as_panicked() {
    let errors: Arc<Mutex<Vec<TickError>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();

    let tick: TickRef = TickFn::arc("bomb", |_ctx: CancellationToken| async {
        panic!("tick blew up")
    });
    let poller = Poller::builder(tick, Duration::from_millis(20))
        .with_error_handler(move |e| sink.lock().unwrap().push(e))
        .build()
        .unwrap();
    let mut rx = poller.subscribe();

    poller.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || !errors.lock().unwrap().is_empty()).await);
    assert!(wait_until(Duration::from_secs(2), || poller.state() == PollerState::Idle).await);

    let recorded = errors.lock().unwrap();
    assert_eq!(recorded.len(), 1, "handler must fire exactly once");
    assert_eq!(
        recorded[0],
        TickError::Panicked { panic: "tick blew up".into() }
    );

    // Loop abort is published, the test process itself survives the panic.
    let mut aborted = false;
    while let Ok(ev) = rx.try_recv() {
        if ev.kind == EventKind::LoopAborted {
            aborted = true;
        }
    }
    assert!(aborted, "panicked tick must abort the loop");
}

#[tokio::test]
async fn test_canceled_tick_skips_handler() {
    let handler_hits = Arc::new(AtomicU64::new(0));
    let hits = handler_hits.clone();

    let entered = Arc::new(AtomicU64::new(0));
    let gate = entered.clone();
    let tick: TickRef = TickFn::arc("waiter", move |ctx: CancellationToken| {
        let gate = gate.clone();
        async move {
            gate.fetch_add(1, Ordering::SeqCst);
            ctx.cancelled().await;
            Err(TickError::Canceled)
        }
    });

    let poller = Poller::builder(tick, Duration::from_millis(10))
        .with_error_handler(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();
    let mut rx = poller.subscribe();

    poller.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || entered.load(Ordering::SeqCst) >= 1).await);
    poller.stop(false).unwrap();
    assert!(wait_until(Duration::from_secs(2), || poller.state() == PollerState::Idle).await);

    assert_eq!(
        handler_hits.load(Ordering::SeqCst),
        0,
        "cancellation must never reach the handler"
    );

    // The run ends with the clean-stop event, not an abort.
    let mut saw_stopped = false;
    while let Ok(Ok(ev)) = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await {
        match ev.kind {
            EventKind::PollerStopped => {
                saw_stopped = true;
                break;
            }
            EventKind::LoopAborted => panic!("canceled tick aborted the loop"),
            _ => {}
        }
    }
    assert!(saw_stopped);
}

#[tokio::test]
async fn test_clear_hook_on_stop_and_dispose() {
    let cleared = Arc::new(AtomicU64::new(0));
    let c = cleared.clone();
    let tick: TickRef = TickFn::with_clear(
        "stateful",
        |_ctx: CancellationToken| async { Ok(()) },
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
    );
    let poller = Poller::new(tick, Duration::from_millis(50)).unwrap();

    poller.stop(false).unwrap();
    assert_eq!(
        cleared.load(Ordering::SeqCst),
        0,
        "stop(false) must not clear"
    );

    poller.stop(true).unwrap();
    assert_eq!(cleared.load(Ordering::SeqCst), 1);

    poller.dispose();
    assert_eq!(cleared.load(Ordering::SeqCst), 2, "dispose clears too");
}

#[tokio::test]
async fn test_restart_after_abort_resumes() {
    let calls = Arc::new(AtomicU64::new(0));
    let c = calls.clone();
    let tick: TickRef = TickFn::arc("flaky", move |_ctx: CancellationToken| {
        let c = c.clone();
        async move {
            if c.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(TickError::failed("cold start"))
            } else {
                Ok(())
            }
        }
    });
    let poller = Poller::new(tick, Duration::from_millis(15)).unwrap();

    poller.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || poller.state() == PollerState::Idle).await);
    assert_eq!(poller.ticks(), 1);

    // Recovery is explicit: a fresh start() after the abort.
    poller.start().unwrap();
    assert!(wait_until(Duration::from_secs(2), || poller.ticks() >= 3).await);
    poller.stop(false).unwrap();
}

#[tokio::test]
async fn test_state_transitions() {
    let (tick, _count) = counting_tick("states");
    let poller = Poller::new(tick, Duration::from_millis(30)).unwrap();
    assert_eq!(poller.state(), PollerState::Idle);
    assert!(!poller.is_running());

    poller.start().unwrap();
    assert_eq!(poller.state(), PollerState::Running);
    assert!(poller.is_running());

    poller.stop(false).unwrap();
    assert!(wait_until(Duration::from_secs(2), || poller.state() == PollerState::Idle).await);

    poller.dispose();
    assert_eq!(poller.state(), PollerState::Disposed);
    assert!(!poller.is_running());
}
