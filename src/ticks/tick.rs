//! # Tick abstraction.
//!
//! This module defines the [`Tick`] trait: one asynchronous, cancelable unit of
//! work that a [`Poller`](crate::Poller) invokes once per interval. The common
//! handle type is [`TickRef`], an `Arc<dyn Tick>` suitable for sharing across
//! the runtime.
//!
//! A tick receives a [`CancellationToken`] and should check it wherever it
//! performs work that could run long; `stop()` cannot preempt a tick that
//! ignores the token.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TickError;

/// Shared handle to a tick (`Arc<dyn Tick>`).
pub type TickRef = std::sync::Arc<dyn Tick>;

/// # One asynchronous, cancelable unit of work.
///
/// A `Tick` has a stable [`name`](Tick::name) and an async [`tick`](Tick::tick)
/// method that receives a [`CancellationToken`]. The poller awaits each
/// invocation to completion before waiting for the next interval, so a single
/// poller never runs two ticks concurrently.
///
/// ## Error contract
/// - Return `Ok(())` for a completed unit of work; the loop keeps running.
/// - Return [`TickError::Canceled`] after observing the token; the loop treats
///   this as a clean stop, never as a failure.
/// - Any other error terminates the loop and is forwarded once to the
///   configured loop-error handler. Implementations that want the loop to
///   survive transient failures must catch and log those failures themselves.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use tickloop::{Tick, TickError};
///
/// struct Probe;
///
/// #[async_trait]
/// impl Tick for Probe {
///     fn name(&self) -> &str { "probe" }
///
///     async fn tick(&self, ctx: CancellationToken) -> Result<(), TickError> {
///         if ctx.is_cancelled() {
///             return Err(TickError::Canceled);
///         }
///         // do one round of work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Tick: Send + Sync + 'static {
    /// Returns a stable, human-readable name. Used in events.
    fn name(&self) -> &str;

    /// Performs one unit of work.
    ///
    /// Implementations should observe `ctx` cooperatively for anything that
    /// could block the loop past a `stop()` request.
    async fn tick(&self, ctx: CancellationToken) -> Result<(), TickError>;

    /// Resets accumulated internal state (buffers, caches, positions).
    ///
    /// Invoked by [`Poller::stop`](crate::Poller::stop) with `clear = true` and
    /// by [`Poller::dispose`](crate::Poller::dispose). Called without waiting
    /// for the loop to exit, so it must be safe to run while a straggling tick
    /// may still be completing. The default does nothing.
    fn clear(&self) {}
}
