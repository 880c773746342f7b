//! Error types for the filesystem source.

use thiserror::Error;

/// Errors that can occur while building or running a file source.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The polled directory does not exist or became unreadable.
    ///
    /// The poll loop logs this and retries on the next period; it never
    /// terminates on a failed scan.
    #[error("cannot scan '{directory}': {reason}")]
    Unavailable {
        /// The directory that failed to scan.
        directory: String,
        /// Reason for failure.
        reason: String,
    },

    /// A file name pattern failed to compile.
    #[error("invalid file pattern '{pattern}': {reason}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Reason for failure.
        reason: String,
    },

    /// The source builder was missing a required part.
    #[error("invalid file source configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for file source operations.
pub type SourceResult<T> = Result<T, SourceError>;
