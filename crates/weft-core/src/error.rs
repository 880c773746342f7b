//! Unified error types for the Weft routing core.
//!
//! Adapter- and runtime-level errors are defined in their own crates; this
//! module only covers delivery and reply correlation.

use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Delivery Errors
// =============================================================================

/// Errors that can occur while delivering a message on a channel.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// A bound handler returned an error.
    ///
    /// Delivery to the remaining bindings of the channel is aborted and the
    /// error propagates to the publisher.
    #[error("handler failed on channel '{channel}': {reason}")]
    Handler {
        /// The channel the failing handler was bound to.
        channel: String,
        /// Reason for failure.
        reason: String,
    },
}

// =============================================================================
// Reply Errors
// =============================================================================

/// Errors that can occur on either side of a reply correlation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    /// A reply was already sent through this sink.
    #[error("a reply was already sent for this request")]
    AlreadyReplied,

    /// The other side of the correlation is gone.
    ///
    /// On send: the caller stopped waiting (timed out or disconnected).
    /// On receive: every sink handle was dropped without a reply.
    #[error("reply correlation peer is gone")]
    Disconnected,

    /// No reply arrived within the configured bound.
    #[error("no reply within {0:?}")]
    TimedOut(Duration),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for channel delivery.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Result type for reply correlation.
pub type ReplyResult<T> = Result<T, ReplyError>;
