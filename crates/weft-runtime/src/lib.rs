//! # Weft Runtime
//!
//! Runtime orchestration for the Weft messaging framework.
//!
//! This crate owns the ambient concerns around the routing core:
//!
//! - **Configuration**: layered figment loading (TOML file + `WEFT_*`
//!   environment variables) into a typed schema ([`config`])
//! - **Logging**: configuration-driven `tracing-subscriber` setup
//!   ([`logging`])
//! - **Lifecycle**: spawning file sources, serving the gateway and
//!   propagating shutdown ([`WeftRuntime`])
//!
//! Assembly stays with the caller: channels are created and handlers bound
//! explicitly, then the lifecycled pieces are handed to the runtime.

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{
    ConfigLoader, FileSourceConfig, HttpConfig, LogFormat, LogLevel, LoggingConfig, WeftConfig,
};
pub use error::{ConfigError, ConfigResult, RuntimeError, RuntimeResult};
pub use runtime::WeftRuntime;
