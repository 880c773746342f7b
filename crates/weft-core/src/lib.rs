//! # Weft Core
//!
//! The routing engine of the Weft in-process messaging framework.
//!
//! This crate provides the delivery primitives everything else is built on:
//!
//! - **Message envelope**: immutable payload-plus-headers envelopes with a
//!   typed payload per pipeline ([`Message`], [`Headers`])
//! - **Channels**: named synchronous delivery points with ordered handler
//!   bindings ([`Channel`])
//! - **Handlers**: the one-message-in contract bound to a channel's input
//!   side ([`Handler`], [`handler_fn`])
//! - **Reply correlation**: single-use sinks that let a synchronous external
//!   caller ride on the internal pipeline ([`ReplySink`], [`ReplyReceiver`])
//!
//! Message sources live in their own crates: `weft-file` turns a polled
//! directory into messages, `weft-http` bridges inbound HTTP requests.
//! `weft-runtime` assembles and runs the whole thing.
//!
//! ## Delivery Model
//!
//! Everything flows through channels, on the publisher's task:
//!
//! ```text
//! ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌────────────┐
//! │  Source  │────▶│ Channel  │────▶│ Handler  │────▶│ Channel /  │
//! │          │     │          │────▶│ Handler  │     │ reply sink │
//! └──────────┘     └──────────┘────▶│ Handler  │     └────────────┘
//!                                   └──────────┘
//! ```
//!
//! A publish call returns only after every bound handler (and any downstream
//! hop they forwarded into) has run. There is no buffering, no re-threading
//! and no back-pressure: the channel is a synchronous hand-off.

pub mod channel;
pub mod error;
pub mod handler;
pub mod message;
pub mod reply;

pub use channel::Channel;
pub use error::{DeliveryError, DeliveryResult, ReplyError, ReplyResult};
pub use handler::{BoxError, FnHandler, Handler, HandlerResult, handler_fn};
pub use message::{Headers, Message};
pub use reply::{ReplyReceiver, ReplySink};
