//! # Function-backed tick (`TickFn`)
//!
//! [`TickFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a
//! fresh future per invocation. This avoids shared mutable state: each tick
//! owns its own future, and anything that must persist between ticks lives in
//! an explicit `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use tickloop::{TickFn, TickRef, TickError};
//!
//! let t: TickRef = TickFn::arc("worker", |ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(TickError::Canceled);
//!     }
//!     // do one round of work...
//!     Ok::<_, TickError>(())
//! });
//!
//! assert_eq!(t.name(), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TickError;
use crate::ticks::tick::Tick;

/// Function-backed tick implementation.
///
/// Wraps a closure that *creates* a new future per invocation, plus an
/// optional clear closure for the [`Tick::clear`] hook.
pub struct TickFn<F> {
    name: Cow<'static, str>,
    f: F,
    on_clear: Option<Box<dyn Fn() + Send + Sync>>,
}

impl<F> TickFn<F> {
    /// Creates a new function-backed tick.
    ///
    /// Prefer [`TickFn::arc`] when you immediately need a [`TickRef`](crate::TickRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            on_clear: None,
        }
    }

    /// Creates the tick and returns it as a shared handle (`Arc<dyn Tick>` compatible).
    ///
    /// ## Example
    /// ```rust
    /// use tokio_util::sync::CancellationToken;
    /// use tickloop::{TickFn, TickRef, TickError};
    ///
    /// let t: TickRef = TickFn::arc("hello", |_ctx: CancellationToken| async {
    ///     Ok::<_, TickError>(())
    /// });
    /// assert_eq!(t.name(), "hello");
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }

    /// Creates a shared tick with a clear closure wired to the [`Tick::clear`] hook.
    ///
    /// The closure runs when the owning poller is stopped with `clear = true`
    /// or disposed. It may race with an in-flight tick, so any state it resets
    /// must tolerate concurrent access.
    pub fn with_clear(
        name: impl Into<Cow<'static, str>>,
        f: F,
        clear: impl Fn() + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            f,
            on_clear: Some(Box::new(clear)),
        })
    }
}

#[async_trait]
impl<F, Fut> Tick for TickFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), TickError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn tick(&self, ctx: CancellationToken) -> Result<(), TickError> {
        (self.f)(ctx).await
    }

    fn clear(&self) {
        if let Some(clear) = &self.on_clear {
            clear();
        }
    }
}
