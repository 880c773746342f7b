//! # Weft
//!
//! A minimal, explicit, in-process message-routing framework for Rust.
//!
//! ## Overview
//!
//! Weft connects independent message sources (a directory poller, an
//! inbound HTTP gateway) to handlers through named channels. Delivery is a
//! synchronous hand-off on the publisher's task; chains are composed by
//! forwarding bindings; a single-use reply sink carried in the message
//! headers lets a synchronous external caller ride on the internal pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────┐     ┌──────────┐     ┌───────────┐
//! │ FileSource  │────▶│ Channel A │────▶│ Handler  │────▶│ Channel B │──▶ …
//! │ HttpGateway │     └───────────┘     └──────────┘     └───────────┘
//! └─────────────┘                 reply sink rides the headers back
//! ```
//!
//! - **weft-core**: channels, handlers, message envelopes, reply correlation
//! - **weft-file**: directory polling with pattern + accept-once filtering
//! - **weft-http**: the inbound HTTP gateway (request in, bounded reply out)
//! - **weft-runtime**: configuration, logging and lifecycle
//!
//! Everything is wired by explicit construction: channels are created,
//! handlers bound, sources and the gateway built, all in plain code the
//! reader can follow. There is no container and no reflection.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use weft::prelude::*;
//!
//! async fn greet(message: Message<Params>) -> HandlerResult<Params> {
//!     let name = message.payload().first("name").unwrap_or("stranger");
//!     if let Some(sink) = message.reply_sink() {
//!         sink.send(format!("Hi, {name}!"))?;
//!     }
//!     Ok(None)
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     let mut runtime = WeftRuntime::from_config(config);
//!
//!     let channel = Channel::new("greetings");
//!     channel.bind(handler_fn(greet));
//!
//!     let gateway = HttpGateway::builder()
//!         .get("/greet", channel)
//!         .build()?;
//!     runtime.set_gateway(gateway);
//!
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub use weft_core as core;
pub use weft_file as file;
pub use weft_http as http;
pub use weft_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use weft::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use weft_runtime::{ConfigLoader, WeftConfig, WeftRuntime};

    // Routing core - channels, envelopes, handlers
    pub use weft_core::{
        BoxError, Channel, DeliveryError, Handler, HandlerResult, Headers, Message, ReplyError,
        ReplySink, handler_fn,
    };

    // Filesystem source
    pub use weft_file::{FileEntry, FileSource, FileWriter};

    // Inbound HTTP gateway
    pub use weft_http::{HttpGateway, Params};
}
