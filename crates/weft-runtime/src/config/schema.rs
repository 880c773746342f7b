//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeftConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Inbound HTTP gateway settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// File polling sources.
    #[serde(default)]
    pub sources: Vec<FileSourceConfig>,
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Per-module level overrides (module path → level).
    #[serde(default)]
    pub filters: BTreeMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            filters: BTreeMap::new(),
        }
    }
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/// Log level (trace, debug, info, warn, error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output.
    #[default]
    Compact,
    /// Standard fmt output.
    Full,
    /// Multi-line human-readable output.
    Pretty,
}

// =============================================================================
// HTTP Gateway
// =============================================================================

/// Inbound HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// How long a call waits for its reply, in milliseconds.
    #[serde(default = "default_reply_timeout_ms")]
    pub reply_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            reply_timeout_ms: default_reply_timeout_ms(),
        }
    }
}

impl HttpConfig {
    /// The reply bound as a [`Duration`].
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_reply_timeout_ms() -> u64 {
    10_000
}

// =============================================================================
// File Sources
// =============================================================================

/// One file polling source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSourceConfig {
    /// Directory to watch.
    pub directory: PathBuf,

    /// Glob the file name must match.
    #[serde(default = "default_file_pattern")]
    pub pattern: String,

    /// Poll period in milliseconds.
    #[serde(default = "default_poll_period_ms")]
    pub poll_period_ms: u64,
}

impl FileSourceConfig {
    /// The poll period as a [`Duration`].
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_period_ms)
    }
}

fn default_file_pattern() -> String {
    "*.txt".to_string()
}

fn default_poll_period_ms() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WeftConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.http.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.http.reply_timeout(), Duration::from_secs(10));
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_period_conversions() {
        let source = FileSourceConfig {
            directory: PathBuf::from("data"),
            pattern: default_file_pattern(),
            poll_period_ms: 5_000,
        };
        assert_eq!(source.poll_period(), Duration::from_secs(5));
        assert_eq!(source.pattern, "*.txt");
    }
}
