//! Runtime error types.

use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Extraction from the layered sources failed.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// Errors that can occur during runtime operations.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP gateway failed.
    #[error("gateway error: {0}")]
    Gateway(#[from] weft_http::GatewayError),

    /// A file source failed to build.
    #[error("file source error: {0}")]
    Source(#[from] weft_file::SourceError),

    /// A spawned task ended abnormally.
    #[error("task failed: {0}")]
    Task(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
