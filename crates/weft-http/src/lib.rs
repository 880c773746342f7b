//! # Weft HTTP
//!
//! Inbound HTTP adapter for the Weft messaging framework: a synchronous
//! external protocol riding on the internal pipeline.
//!
//! The [`HttpGateway`] turns each matching `GET` request into a
//! [`Message<Params>`](weft_core::Message) carrying a fresh single-use reply
//! sink in its headers, publishes it on the route's request channel, and
//! holds the HTTP response open until a downstream handler sends to the
//! sink. If the configured bound elapses first, the caller gets a `504`
//! rather than a hang.
//!
//! ```text
//! GET /greet?name=Ann ──▶ gateway ──▶ channel ──▶ handler ──┐
//!        ▲                                                  │ sink.send
//!        └───────────────── reply receiver ◀────────────────┘
//! ```

pub mod error;
pub mod gateway;
pub mod params;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{HttpGateway, HttpGatewayBuilder};
pub use params::Params;
