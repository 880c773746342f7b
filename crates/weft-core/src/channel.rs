//! Named channels and the dispatch discipline.
//!
//! A [`Channel`] is a named, synchronous, single-hop delivery point. Binding
//! order is significant: publishing a message invokes every bound handler in
//! the order the bindings were made, on the publisher's task, awaiting each
//! handler before the next. There is no internal buffering and no
//! re-threading: a slow handler stalls its own publisher and nothing else.
//!
//! A binding optionally names a downstream channel: when its handler returns
//! an output message, the channel publishes that message on the downstream
//! channel before moving to the next binding. This is how simple chains are
//! composed.
//!
//! ```text
//! ┌────────┐     ┌───────────┐     ┌─────────┐     ┌───────────┐
//! │ Source │────▶│ Channel A │────▶│ Handler │────▶│ Channel B │───▶ …
//! └────────┘     └───────────┘     └─────────┘     └───────────┘
//! ```
//!
//! Publishing on a channel with zero bindings silently drops the message
//! (logged at debug level). A handler error aborts delivery of that message
//! to the channel's remaining bindings and propagates to the publisher;
//! containing the failure to one message is the publisher's job.

use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{DeliveryError, DeliveryResult};
use crate::handler::Handler;
use crate::message::Message;

/// A named synchronous delivery point with zero or more handler bindings.
///
/// # Thread Safety
///
/// Channels are shared as `Arc<Channel<P>>` and are `Send + Sync`. Binding
/// happens at assembly time; dispatch takes a read snapshot of the binding
/// list, so publishing never blocks on registration.
pub struct Channel<P> {
    name: String,
    bindings: RwLock<Vec<Binding<P>>>,
}

/// One handler bound to a channel, with an optional output channel.
struct Binding<P> {
    handler: Arc<dyn Handler<P>>,
    forward_to: Option<Arc<Channel<P>>>,
}

impl<P> Clone for Binding<P> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            forward_to: self.forward_to.clone(),
        }
    }
}

impl<P> Channel<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Creates a new, empty channel with the given name.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            bindings: RwLock::new(Vec::new()),
        })
    }

    /// Returns the channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds a terminal handler. Dispatch order follows binding order.
    pub fn bind(&self, handler: impl Handler<P> + 'static) {
        self.bindings.write().push(Binding {
            handler: Arc::new(handler),
            forward_to: None,
        });
    }

    /// Binds a handler whose output messages are published on `downstream`.
    pub fn bind_forwarding(&self, handler: impl Handler<P> + 'static, downstream: Arc<Channel<P>>) {
        self.bindings.write().push(Binding {
            handler: Arc::new(handler),
            forward_to: Some(downstream),
        });
    }

    /// Number of handlers currently bound.
    pub fn handler_count(&self) -> usize {
        self.bindings.read().len()
    }

    /// Delivers `message` to every bound handler, in binding order, on the
    /// calling task.
    ///
    /// The returned future completes only after every handler, including any
    /// downstream hop a forwarding binding published into, has run.
    ///
    /// # Errors
    ///
    /// The first handler error aborts delivery to the remaining bindings
    /// and is returned as [`DeliveryError::Handler`].
    pub fn publish(&self, message: Message<P>) -> BoxFuture<'_, DeliveryResult<()>> {
        Box::pin(async move {
            let bindings: Vec<Binding<P>> = self.bindings.read().clone();
            if bindings.is_empty() {
                debug!(channel = %self.name, "no handlers bound, dropping message");
                return Ok(());
            }

            for (index, binding) in bindings.iter().enumerate() {
                let outcome = binding
                    .handler
                    .handle(message.clone())
                    .await
                    .map_err(|e| DeliveryError::Handler {
                        channel: self.name.clone(),
                        reason: e.to_string(),
                    })?;

                if let Some(next) = outcome {
                    match &binding.forward_to {
                        Some(downstream) => downstream.publish(next).await?,
                        None => warn!(
                            channel = %self.name,
                            binding = index,
                            "handler produced an output message but has no output channel, dropping it"
                        ),
                    }
                }
            }

            Ok(())
        })
    }
}

impl<P> std::fmt::Debug for Channel<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("handler_count", &self.bindings.read().len())
            .finish()
    }
}
