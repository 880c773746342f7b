//! Configuration loader using figment.
//!
//! Sources are layered, later overriding earlier:
//!
//! 1. Built-in defaults
//! 2. TOML file (`weft.toml` in the current directory, or an explicit path)
//! 3. Environment variables (`WEFT_*`, `__` as section separator)
//!
//! # Environment Variable Mapping
//!
//! - `WEFT_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `WEFT_HTTP__BIND_ADDR=0.0.0.0:9000` → `http.bind_addr = "0.0.0.0:9000"`
//! - `WEFT_HTTP__REPLY_TIMEOUT_MS=2000` → `http.reply_timeout_ms = 2000`

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::debug;

use super::schema::WeftConfig;
use crate::error::{ConfigError, ConfigResult};

const DEFAULT_CONFIG_FILE: &str = "weft.toml";

/// Configuration loader with figment-based multi-source support.
///
/// # Example
///
/// ```rust,ignore
/// let config = ConfigLoader::new()
///     .file("config/weft.toml")
///     .load()?;
/// ```
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with the default search behavior.
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_env: true,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables the environment variable layer (enabled by default).
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Loads and extracts the configuration.
    ///
    /// A missing default file is not an error; defaults and the
    /// environment still apply. An explicitly-set file must exist.
    pub fn load(self) -> ConfigResult<WeftConfig> {
        let mut figment = Figment::from(Serialized::defaults(WeftConfig::default()));

        figment = match &self.config_file {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        };

        if self.load_env {
            figment = figment.merge(Env::prefixed("WEFT_").split("__"));
        }

        let config: WeftConfig = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        debug!(
            sources = config.sources.len(),
            bind_addr = %config.http.bind_addr,
            "configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_load_from_file_with_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "weft.toml",
                r#"
                    [logging]
                    level = "debug"

                    [http]
                    bind_addr = "127.0.0.1:9000"

                    [[sources]]
                    directory = "data"
                "#,
            )?;
            jail.set_env("WEFT_HTTP__REPLY_TIMEOUT_MS", "250");

            let config = ConfigLoader::new().load().unwrap();
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.http.bind_addr, "127.0.0.1:9000");
            assert_eq!(config.http.reply_timeout_ms, 250);

            assert_eq!(config.sources.len(), 1);
            let source = &config.sources[0];
            assert_eq!(source.directory, std::path::PathBuf::from("data"));
            assert_eq!(source.pattern, "*.txt");
            assert_eq!(source.poll_period_ms, 5_000);
            Ok(())
        });
    }

    #[test]
    fn test_missing_default_file_falls_back_to_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = ConfigLoader::new().load().unwrap();
            assert_eq!(config.http.bind_addr, "127.0.0.1:8080");
            assert!(config.sources.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        figment::Jail::expect_with(|_jail| {
            let result = ConfigLoader::new().file("nope.toml").load();
            assert!(result.is_err());
            Ok(())
        });
    }
}
