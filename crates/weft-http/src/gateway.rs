//! The inbound HTTP gateway.
//!
//! The gateway adapts an external synchronous request into a message plus a
//! blocking wait for a reply. For every matching `GET` request it:
//!
//! 1. extracts the query parameters into a [`Params`] payload,
//! 2. creates a fresh single-use [`ReplySink`] pair and attaches the sink to
//!    the message headers,
//! 3. publishes the message on the route's request channel, on the request
//!    task itself (the pipeline runs synchronously inside the request),
//! 4. suspends the response until a reply reaches the sink or the configured
//!    bound elapses.
//!
//! One call moves `Received → Dispatched → {Replied | TimedOut}`; both end
//! states are terminal. A handler failure surfaces as a `500` to the waiting
//! caller; a missing reply surfaces as a `504` within the bound, never a
//! hang. Dropping the connection drops the request future and with it the
//! reply receiver, so a late send becomes an inspectable no-op.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use weft_core::{Channel, Headers, Message, ReplyError, ReplySink};

use crate::error::{GatewayError, GatewayResult};
use crate::params::Params;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// The inbound HTTP gateway: `GET` routes bridged onto request channels.
///
/// # Example
///
/// ```rust,ignore
/// let gateway = HttpGateway::builder()
///     .bind_addr("127.0.0.1:8080")
///     .reply_timeout(Duration::from_secs(10))
///     .get("/greet", Arc::clone(&greet_channel))
///     .build()?;
///
/// gateway.serve(shutdown.child_token()).await?;
/// ```
pub struct HttpGateway {
    bind_addr: String,
    reply_timeout: Duration,
    routes: Vec<GatewayRoute>,
}

struct GatewayRoute {
    path: String,
    channel: Arc<Channel<Params>>,
}

impl HttpGateway {
    /// Creates a builder.
    pub fn builder() -> HttpGatewayBuilder {
        HttpGatewayBuilder::new()
    }

    /// The configured listen address.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Assembles the router for all configured routes.
    ///
    /// Exposed so embedders and tests can drive the gateway without a
    /// socket.
    pub fn router(&self) -> Router {
        let mut router = Router::new();
        for route in &self.routes {
            let path = if route.path.starts_with('/') {
                route.path.clone()
            } else {
                format!("/{}", route.path)
            };
            let channel = Arc::clone(&route.channel);
            let reply_timeout = self.reply_timeout;
            let handler_path = path.clone();
            router = router.route(
                &path,
                get(move |Query(pairs): Query<Vec<(String, String)>>| {
                    let channel = Arc::clone(&channel);
                    let path = handler_path.clone();
                    async move { dispatch_call(channel, path, reply_timeout, pairs).await }
                }),
            );
        }
        router
    }

    /// Binds the listen address and serves until `shutdown` is cancelled.
    pub async fn serve(self, shutdown: CancellationToken) -> GatewayResult<()> {
        let listener = tokio::net::TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| GatewayError::Bind {
                addr: self.bind_addr.clone(),
                reason: e.to_string(),
            })?;
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Serve(e.to_string()))?;

        info!(addr = %addr, routes = self.routes.len(), "HTTP gateway listening");

        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()))?;

        info!("HTTP gateway shut down");
        Ok(())
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("bind_addr", &self.bind_addr)
            .field("reply_timeout", &self.reply_timeout)
            .field("routes", &self.routes.len())
            .finish()
    }
}

/// Bridges one external call onto the request channel and awaits the reply.
async fn dispatch_call(
    channel: Arc<Channel<Params>>,
    path: String,
    reply_timeout: Duration,
    pairs: Vec<(String, String)>,
) -> Response {
    let params = Params::from_pairs(pairs);
    let (sink, receiver) = ReplySink::pair();
    let message = Message::with_headers(params, Headers::new().with_reply_sink(sink));

    debug!(path = %path, channel = channel.name(), "dispatching inbound request");
    if let Err(e) = channel.publish(message).await {
        error!(path = %path, error = %e, "request pipeline failed");
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    match receiver.recv_timeout(reply_timeout).await {
        Ok(body) => {
            debug!(path = %path, "request replied");
            (StatusCode::OK, body).into_response()
        }
        Err(ReplyError::TimedOut(bound)) => {
            warn!(path = %path, bound = ?bound, "no reply within the bound");
            (
                StatusCode::GATEWAY_TIMEOUT,
                format!("no reply within {bound:?}"),
            )
                .into_response()
        }
        Err(e) => {
            // Every sink handle was dropped without a send: no reply can
            // ever arrive, so answer as a timeout right away.
            warn!(path = %path, error = %e, "reply correlation abandoned");
            (StatusCode::GATEWAY_TIMEOUT, "reply abandoned".to_string()).into_response()
        }
    }
}

// =============================================================================
// HttpGatewayBuilder
// =============================================================================

/// Builder for an [`HttpGateway`].
pub struct HttpGatewayBuilder {
    bind_addr: String,
    reply_timeout: Duration,
    routes: Vec<GatewayRoute>,
}

impl HttpGatewayBuilder {
    fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            routes: Vec::new(),
        }
    }

    /// Sets the listen address (default `127.0.0.1:8080`).
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Sets how long a call waits for its reply (default 10 seconds).
    pub fn reply_timeout(mut self, bound: Duration) -> Self {
        self.reply_timeout = bound;
        self
    }

    /// Registers a `GET` route whose requests are published on `channel`.
    pub fn get(mut self, path: impl Into<String>, channel: Arc<Channel<Params>>) -> Self {
        self.routes.push(GatewayRoute {
            path: path.into(),
            channel,
        });
        self
    }

    /// Builds the gateway.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NoRoutes`] if no route was registered.
    pub fn build(self) -> GatewayResult<HttpGateway> {
        if self.routes.is_empty() {
            return Err(GatewayError::NoRoutes);
        }
        Ok(HttpGateway {
            bind_addr: self.bind_addr,
            reply_timeout: self.reply_timeout,
            routes: self.routes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use parking_lot::Mutex;
    use tower::ServiceExt;
    use weft_core::handler_fn;

    fn greet(name: Option<&str>) -> String {
        format!("Hi, {}!", name.unwrap_or("stranger"))
    }

    /// A channel whose single handler replies with a greeting.
    fn greeting_channel() -> Arc<Channel<Params>> {
        let channel = Channel::new("greet");
        channel.bind(handler_fn(|message: Message<Params>| async move {
            let body = greet(message.payload().first("name"));
            if let Some(sink) = message.reply_sink() {
                sink.send(body)?;
            }
            Ok(None)
        }));
        channel
    }

    /// The two-hop chain: first computes and re-publishes with the original
    /// headers, second replies with the carried value.
    fn chained_channels() -> Arc<Channel<Params>> {
        let first = Channel::new("first");
        let second = Channel::new("second");

        first.bind_forwarding(
            handler_fn(|message: Message<Params>| async move {
                let greeting = greet(message.payload().first("name"));
                Ok(Some(message.map(|mut params| {
                    params.set("name", greeting);
                    params
                })))
            }),
            Arc::clone(&second),
        );
        second.bind(handler_fn(|message: Message<Params>| async move {
            let body = message.payload().first("name").unwrap_or("").to_string();
            if let Some(sink) = message.reply_sink() {
                sink.send(body)?;
            }
            Ok(None)
        }));

        first
    }

    fn router_for(channel: Arc<Channel<Params>>, path: &str, reply_timeout: Duration) -> Router {
        HttpGateway::builder()
            .reply_timeout(reply_timeout)
            .get(path, channel)
            .build()
            .unwrap()
            .router()
    }

    async fn call(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_single_hop_reply() {
        let router = router_for(greeting_channel(), "/greet", Duration::from_secs(1));
        let (status, body) = call(router, "/greet?name=Ann").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hi, Ann!");
    }

    #[tokio::test]
    async fn test_concurrent_calls_correlate() {
        let router = router_for(greeting_channel(), "/greet", Duration::from_secs(1));

        let (a, b) = tokio::join!(
            call(router.clone(), "/greet?name=Ann"),
            call(router.clone(), "/greet?name=Ben"),
        );

        assert_eq!(a, (StatusCode::OK, "Hi, Ann!".to_string()));
        assert_eq!(b, (StatusCode::OK, "Hi, Ben!".to_string()));
    }

    #[tokio::test]
    async fn test_chained_route_carries_the_reply_sink() {
        let router = router_for(chained_channels(), "/greet2", Duration::from_secs(1));
        let (status, body) = call(router, "/greet2?name=Ada").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hi, Ada!");
    }

    #[tokio::test]
    async fn test_broken_chain_times_out_instead_of_misreplying() {
        let first = Channel::new("first");
        let second = Channel::new("second");

        // Fault injection: the first hop rebuilds the message from scratch,
        // losing the headers and with them the reply sink.
        first.bind_forwarding(
            handler_fn(|message: Message<Params>| async move {
                Ok(Some(Message::new(message.into_payload())))
            }),
            Arc::clone(&second),
        );
        second.bind(handler_fn(|message: Message<Params>| async move {
            if let Some(sink) = message.reply_sink() {
                sink.send("should never be sent")?;
            }
            Ok(None)
        }));

        let router = router_for(first, "/greet2", Duration::from_millis(50));
        let (status, body) = call(router, "/greet2?name=Ada").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_ne!(body, "should never be sent");
    }

    #[tokio::test]
    async fn test_unbound_channel_answers_within_the_bound() {
        let channel: Arc<Channel<Params>> = Channel::new("nobody-home");
        let router = router_for(channel, "/greet", Duration::from_millis(50));

        let (status, _body) = call(router, "/greet?name=Ann").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_silent_handler_times_out() {
        // The handler keeps the message (and so the sink) alive but never
        // replies: the gateway must wait out the bound, then answer 504.
        let stash: Arc<Mutex<Vec<Message<Params>>>> = Arc::new(Mutex::new(Vec::new()));
        let channel = Channel::new("silent");
        {
            let stash = Arc::clone(&stash);
            channel.bind(handler_fn(move |message: Message<Params>| {
                let stash = Arc::clone(&stash);
                async move {
                    stash.lock().push(message);
                    Ok(None)
                }
            }));
        }

        let router = router_for(channel, "/greet", Duration::from_millis(50));
        let (status, body) = call(router, "/greet?name=Ann").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body.contains("no reply"));

        // The receiver is gone; a late send through the stashed sink is a
        // checked no-op, not a second response.
        let late = stash.lock().pop().unwrap();
        let err = late.reply_sink().unwrap().send("late").unwrap_err();
        assert_eq!(err, ReplyError::Disconnected);
    }

    #[tokio::test]
    async fn test_handler_error_surfaces_as_500() {
        let channel = Channel::new("failing");
        channel.bind(handler_fn(|_message: Message<Params>| async move {
            Err("backend exploded".into())
        }));

        let router = router_for(channel, "/greet", Duration::from_secs(1));
        let (status, body) = call(router, "/greet?name=Ann").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_builder_rejects_empty_routes() {
        let err = HttpGateway::builder().build().unwrap_err();
        assert!(matches!(err, GatewayError::NoRoutes));
    }
}
