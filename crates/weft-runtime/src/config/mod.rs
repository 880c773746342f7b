//! Configuration loading and schema.
//!
//! All configuration is supplied at startup and immutable thereafter: the
//! watched directories, file patterns and poll periods, the gateway bind
//! address and reply bound, and logging. Values come from a TOML file
//! layered under `WEFT_*` environment variables.

mod loader;
mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    FileSourceConfig, HttpConfig, LogFormat, LogLevel, LoggingConfig, WeftConfig,
};
