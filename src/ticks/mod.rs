//! # Tick abstractions.
//!
//! This module provides the core tick-related types:
//! - [`Tick`] - trait for implementing one async, cancelable unit of work
//! - [`TickFn`] - function-based tick implementation
//! - [`TickRef`] - shared reference to a tick (`Arc<dyn Tick>`)

mod tick;
mod tick_fn;

pub use tick::{Tick, TickRef};
pub use tick_fn::TickFn;
