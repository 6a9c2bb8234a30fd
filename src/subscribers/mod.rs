//! # Event subscribers for the tickloop runtime.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling runtime events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   driver loop ── publish(Event) ──► Bus ──► bus listener ──► SubscriberSet::emit(&Event)
//!                                                                  │
//!                                                       ┌──────────┼──────────┐
//!                                                       ▼          ▼          ▼
//!                                                  LogWriter  TickTracker  Custom...
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (logging, metrics, alerts)
//! - **Stateful subscribers** - maintain queryable state based on events ([`TickTracker`])
//!
//! ## Implementing custom subscribers
//! ```rust
//! use tickloop::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct MetricsSubscriber;
//!
//! #[async_trait]
//! impl Subscribe for MetricsSubscriber {
//!     async fn on_event(&self, event: &Event) {
//!         match event.kind {
//!             EventKind::TickFailed => {
//!                 // increment failure counter
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

mod set;
mod subscribe;
mod tracker;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;
pub use tracker::TickTracker;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
