//! Error types for the HTTP gateway.

use thiserror::Error;

/// Errors that can occur while building or running the gateway.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The gateway was built without any routes.
    #[error("gateway requires at least one route")]
    NoRoutes,

    /// Binding the listen address failed.
    #[error("failed to bind {addr}: {reason}")]
    Bind {
        /// The address that failed to bind.
        addr: String,
        /// Reason for failure.
        reason: String,
    },

    /// The server terminated with an error.
    #[error("server error: {0}")]
    Serve(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
