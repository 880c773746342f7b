//! The handler contract for channel-bound message processing.
//!
//! A handler is bound to a channel's input side with
//! [`Channel::bind`](crate::channel::Channel::bind) during assembly; the
//! binding is an explicit, first-class relationship, not metadata discovered
//! by reflection. For each delivered message a handler either:
//!
//! - returns `Ok(None)`: terminal, nothing to forward (it may still have
//!   sent a reply through the sink it found in the headers);
//! - returns `Ok(Some(next))`: forward `next` on the binding's configured
//!   output channel;
//! - returns `Err(_)`: the error aborts delivery of this message to the
//!   channel's remaining bindings and propagates to the publisher.
//!
//! Free functions and closures become handlers via [`handler_fn`].

use std::future::Future;

use async_trait::async_trait;

use crate::message::Message;

/// Boxed error type returned by handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler produces for one message: optionally the next hop's
/// message.
pub type HandlerResult<P> = Result<Option<Message<P>>, BoxError>;

/// A function of one message, bound to a channel.
#[async_trait]
pub trait Handler<P>: Send + Sync {
    /// Processes one delivered message.
    async fn handle(&self, message: Message<P>) -> HandlerResult<P>;
}

/// Wraps an async function or closure as a [`Handler`].
///
/// # Example
///
/// ```rust,ignore
/// async fn log_entry(message: Message<FileEntry>) -> HandlerResult<FileEntry> {
///     info!(file = %message.payload().file_name(), "processing polled file");
///     Ok(None)
/// }
///
/// channel.bind(handler_fn(log_entry));
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler { f }
}

/// A [`Handler`] backed by a plain async function. Built by [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<P, F, Fut> Handler<P> for FnHandler<F>
where
    P: Send + 'static,
    F: Fn(Message<P>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult<P>> + Send,
{
    async fn handle(&self, message: Message<P>) -> HandlerResult<P> {
        (self.f)(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn double(message: Message<u32>) -> HandlerResult<u32> {
        Ok(Some(message.map(|n| n * 2)))
    }

    #[tokio::test]
    async fn test_fn_handler_forwards_output() {
        let handler = handler_fn(double);
        let out = handler.handle(Message::new(21)).await.unwrap();
        assert_eq!(*out.unwrap().payload(), 42);
    }

    #[tokio::test]
    async fn test_closure_handler() {
        let handler = handler_fn(|message: Message<String>| async move {
            if message.payload().is_empty() {
                return Err("empty payload".into());
            }
            Ok(None)
        });

        assert!(handler.handle(Message::new("x".to_string())).await.is_ok());
        assert!(handler.handle(Message::new(String::new())).await.is_err());
    }
}
