//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Initialization is configuration-driven: the base level and per-module
//! overrides come from [`LoggingConfig`], while a `RUST_LOG` environment
//! variable, when set, takes precedence over the configured base level.
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Initializes logging from configuration.
///
/// Safe to call more than once; only the first initialization wins.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = try_init(config);
}

/// Tries to initialize logging, returning an error if a subscriber is
/// already installed.
pub fn try_init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(fmt::layer().compact())
            .with(filter)
            .try_init(),
        LogFormat::Full => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().pretty())
            .with(filter)
            .try_init(),
    }
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    // RUST_LOG wins over the configured base level.
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    for (module, level) in &config.filters {
        if let Ok(directive) = format!("{}={}", module, level.as_str()).parse() {
            filter = filter.add_directive(directive);
        }
    }

    filter
}
