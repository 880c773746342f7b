//! Reply correlation for request/reply pipelines.
//!
//! A [`ReplySink`] is the single-use destination that correlates an
//! asynchronous internal reply with a synchronous external caller. The
//! inbound gateway creates a sink/receiver pair per call, attaches the sink
//! to the outgoing message headers, and waits on the receiver with a bound.
//! Whichever handler terminates the pipeline sends the reply through the
//! sink it finds in the headers.
//!
//! # Single Use
//!
//! A sink may be cloned freely (header propagation along a chain clones it),
//! but all clones share one underlying slot: the first [`ReplySink::send`]
//! consumes it, and every later send fails with
//! [`ReplyError::AlreadyReplied`]. A send after the caller has stopped
//! waiting fails with [`ReplyError::Disconnected`] and delivers nothing, so
//! one external request can never observe two responses.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::{ReplyError, ReplyResult};

/// The sending half of a reply correlation.
///
/// Cheap to clone; all clones refer to the same one-shot slot.
///
/// # Example
///
/// ```rust,ignore
/// let (sink, receiver) = ReplySink::pair();
///
/// sink.send("hello")?;
/// assert_eq!(sink.send("again"), Err(ReplyError::AlreadyReplied));
///
/// let body = receiver.recv_timeout(Duration::from_secs(1)).await?;
/// assert_eq!(body, "hello");
/// ```
#[derive(Clone)]
pub struct ReplySink {
    shared: Arc<SinkSlot>,
}

struct SinkSlot {
    tx: Mutex<Option<oneshot::Sender<String>>>,
}

impl ReplySink {
    /// Creates a connected sink/receiver pair for one call.
    pub fn pair() -> (Self, ReplyReceiver) {
        let (tx, rx) = oneshot::channel();
        let sink = Self {
            shared: Arc::new(SinkSlot {
                tx: Mutex::new(Some(tx)),
            }),
        };
        (sink, ReplyReceiver { rx })
    }

    /// Sends the reply body, consuming the shared slot.
    ///
    /// # Errors
    ///
    /// - [`ReplyError::AlreadyReplied`] if any clone of this sink has
    ///   already sent.
    /// - [`ReplyError::Disconnected`] if the receiver is gone (the caller
    ///   timed out or dropped the connection); the body is discarded.
    pub fn send(&self, body: impl Into<String>) -> ReplyResult<()> {
        let tx = self
            .shared
            .tx
            .lock()
            .take()
            .ok_or(ReplyError::AlreadyReplied)?;
        tx.send(body.into()).map_err(|_| ReplyError::Disconnected)
    }

    /// Returns `true` once a send has consumed the slot.
    pub fn is_spent(&self) -> bool {
        self.shared.tx.lock().is_none()
    }
}

impl fmt::Debug for ReplySink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplySink")
            .field("spent", &self.is_spent())
            .finish()
    }
}

/// The receiving half of a reply correlation, held by the waiting caller.
#[derive(Debug)]
pub struct ReplyReceiver {
    rx: oneshot::Receiver<String>,
}

impl ReplyReceiver {
    /// Waits for the reply body, up to `bound`.
    ///
    /// Dropping the receiver (including on timeout) releases the
    /// correlation: a late send then observes [`ReplyError::Disconnected`].
    ///
    /// # Errors
    ///
    /// - [`ReplyError::TimedOut`] if `bound` elapses first.
    /// - [`ReplyError::Disconnected`] if every sink handle was dropped
    ///   without sending; this resolves immediately instead of waiting out
    ///   the bound.
    pub async fn recv_timeout(self, bound: Duration) -> ReplyResult<String> {
        match tokio::time::timeout(bound, self.rx).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(_)) => Err(ReplyError::Disconnected),
            Err(_) => Err(ReplyError::TimedOut(bound)),
        }
    }

    /// Waits for the reply body without a bound.
    pub async fn recv(self) -> ReplyResult<String> {
        self.rx.await.map_err(|_| ReplyError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_and_recv() {
        let (sink, receiver) = ReplySink::pair();
        sink.send("hello").unwrap();
        assert!(sink.is_spent());

        let body = receiver.recv_timeout(Duration::from_secs(1)).await;
        assert_eq!(body, Ok("hello".to_string()));
    }

    #[tokio::test]
    async fn test_second_send_is_rejected() {
        let (sink, _receiver) = ReplySink::pair();
        sink.send("first").unwrap();
        assert_eq!(sink.send("second"), Err(ReplyError::AlreadyReplied));
    }

    #[tokio::test]
    async fn test_clones_share_the_slot() {
        let (sink, receiver) = ReplySink::pair();
        let carried = sink.clone();

        carried.send("from downstream").unwrap();
        assert_eq!(sink.send("upstream raced"), Err(ReplyError::AlreadyReplied));

        let body = receiver.recv().await.unwrap();
        assert_eq!(body, "from downstream");
    }

    #[tokio::test]
    async fn test_late_send_after_receiver_dropped() {
        let (sink, receiver) = ReplySink::pair();
        drop(receiver);
        assert_eq!(sink.send("too late"), Err(ReplyError::Disconnected));
    }

    #[tokio::test]
    async fn test_recv_times_out() {
        let (sink, receiver) = ReplySink::pair();
        let bound = Duration::from_millis(20);
        assert_eq!(
            receiver.recv_timeout(bound).await,
            Err(ReplyError::TimedOut(bound))
        );
        // The receiver is gone now, so the reply is dropped rather than
        // delivered twice somewhere else.
        assert_eq!(sink.send("too late"), Err(ReplyError::Disconnected));
    }

    #[tokio::test]
    async fn test_recv_fails_fast_when_all_sinks_dropped() {
        let (sink, receiver) = ReplySink::pair();
        drop(sink);
        assert_eq!(
            receiver.recv_timeout(Duration::from_secs(30)).await,
            Err(ReplyError::Disconnected)
        );
    }
}
