//! Error types used by the tickloop runtime and ticks.
//!
//! This module defines two main error enums:
//!
//! - [`PollerError`] — lifecycle and configuration errors raised by the poller itself.
//! - [`TickError`] — outcomes of individual tick executions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the poller lifecycle.
///
/// These are caller errors, surfaced synchronously from the offending call:
/// invalid construction parameters or use of a disposed instance.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollerError {
    /// The tick interval must be strictly positive.
    #[error("tick interval must be positive (got {interval:?})")]
    InvalidInterval {
        /// The rejected interval value.
        interval: Duration,
    },

    /// The startup delay, when supplied, must be strictly positive.
    #[error("startup delay must be positive (got {delay:?})")]
    InvalidStartupDelay {
        /// The rejected delay value.
        delay: Duration,
    },

    /// The poller was disposed; it can never run again.
    #[error("poller has been disposed")]
    Disposed,
}

impl PollerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickloop::PollerError;
    ///
    /// assert_eq!(PollerError::Disposed.as_label(), "poller_disposed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PollerError::InvalidInterval { .. } => "poller_invalid_interval",
            PollerError::InvalidStartupDelay { .. } => "poller_invalid_startup_delay",
            PollerError::Disposed => "poller_disposed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PollerError::InvalidInterval { interval } => {
                format!("invalid interval: {interval:?}")
            }
            PollerError::InvalidStartupDelay { delay } => {
                format!("invalid startup delay: {delay:?}")
            }
            PollerError::Disposed => "disposed".to_string(),
        }
    }
}

/// # Outcomes of a single tick execution.
///
/// A tick that observes its cancellation token should return
/// [`TickError::Canceled`]; the loop treats that as a clean stop, never as a
/// failure. Any other variant terminates the polling loop and is forwarded
/// once to the configured loop-error handler.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    /// Tick observed cancellation and exited early (clean stop, not an error).
    #[error("tick canceled")]
    Canceled,

    /// Tick execution failed.
    #[error("tick failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Tick panicked; the panic was contained by the loop.
    #[error("tick panicked: {panic}")]
    Panicked {
        /// Rendered panic payload.
        panic: String,
    },
}

impl TickError {
    /// Convenience constructor for [`TickError::Failed`].
    ///
    /// # Example
    /// ```
    /// use tickloop::TickError;
    ///
    /// let err = TickError::failed("connection refused");
    /// assert_eq!(err.as_label(), "tick_failed");
    /// ```
    pub fn failed(error: impl Into<String>) -> Self {
        TickError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickloop::TickError;
    ///
    /// assert_eq!(TickError::Canceled.as_label(), "tick_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TickError::Canceled => "tick_canceled",
            TickError::Failed { .. } => "tick_failed",
            TickError::Panicked { .. } => "tick_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TickError::Canceled => "canceled".to_string(),
            TickError::Failed { error } => format!("error: {error}"),
            TickError::Panicked { panic } => format!("panic: {panic}"),
        }
    }

    /// True for the cooperative-cancellation variant.
    ///
    /// The loop swallows canceled ticks as the normal stop path; everything
    /// else aborts the loop.
    ///
    /// # Example
    /// ```
    /// use tickloop::TickError;
    ///
    /// assert!(TickError::Canceled.is_canceled());
    /// assert!(!TickError::failed("boom").is_canceled());
    /// ```
    pub fn is_canceled(&self) -> bool {
        matches!(self, TickError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            PollerError::InvalidInterval {
                interval: Duration::ZERO
            }
            .as_label(),
            "poller_invalid_interval"
        );
        assert_eq!(
            PollerError::InvalidStartupDelay {
                delay: Duration::ZERO
            }
            .as_label(),
            "poller_invalid_startup_delay"
        );
        assert_eq!(TickError::failed("x").as_label(), "tick_failed");
        assert_eq!(
            TickError::Panicked {
                panic: "boom".into()
            }
            .as_label(),
            "tick_panicked"
        );
    }

    #[test]
    fn test_display_carries_detail() {
        let err = PollerError::InvalidInterval {
            interval: Duration::ZERO,
        };
        assert!(err.to_string().contains("positive"));

        let err = TickError::failed("socket reset");
        assert!(err.to_string().contains("socket reset"));
    }

    #[test]
    fn test_only_canceled_is_canceled() {
        assert!(TickError::Canceled.is_canceled());
        assert!(!TickError::failed("nope").is_canceled());
        assert!(
            !TickError::Panicked {
                panic: "p".into()
            }
            .is_canceled()
        );
    }
}
