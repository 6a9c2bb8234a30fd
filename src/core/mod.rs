//! Runtime core: the poller lifecycle and its loop.
//!
//! The public API from this module is [`Poller`] (with [`PollerBuilder`],
//! [`PollerState`], and [`Config`]); everything else is plumbing.
//!
//! Internal modules:
//! - [`driver`]: owns one run of the polling loop, teardown included;
//! - [`exec`]: executes one tick with panic containment and event publishing;
//! - [`interval`]: steady/jittered wait source between ticks.

mod builder;
mod config;
mod driver;
mod exec;
mod interval;
mod poller;

pub use builder::PollerBuilder;
pub use config::Config;
pub use poller::{Poller, PollerState};
