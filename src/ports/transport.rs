//! Transport Port - Server Communication Interface
//!
//! Defines the trait for everything the feed synchronizer needs from
//! the server: a one-shot historical fetch, a write path for new
//! messages, and a live push subscription delivered via a broadcast
//! channel. The synchronizer never sees HTTP or WebSocket details.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::domain::{ChatId, FeedScope, Message, MessageDraft, ValidationError};

/// Failures surfaced by transport implementations.
///
/// All variants are recoverable: callers report them and carry on.
/// Nothing here ever terminates the client.
#[derive(Debug, Error)]
pub enum TransportError {
  /// The request never completed (connect failure, timeout, DNS).
  #[error("transport failure: {0}")]
  Http(String),

  /// The server answered with a non-success status.
  #[error("server rejected request ({status}): {message}")]
  Status {
    /// HTTP status code.
    status: u16,
    /// Server-provided `error` body, or the status reason.
    message: String,
  },

  /// The response body could not be decoded.
  #[error("malformed server payload: {0}")]
  Decode(String),

  /// Client-side validation failed before any network call.
  #[error(transparent)]
  Invalid(#[from] ValidationError),

  /// The push channel is gone and will not deliver further events.
  #[error("push channel closed")]
  ChannelClosed,
}

/// Trait for server transports.
///
/// Implementors bundle the request/response API and the push channel
/// behind one handle so the synchronizer has a single collaborator.
/// The historical fetch and the push subscription race: no ordering
/// between them is guaranteed by the transport.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
  /// Fetch the full message history for a scope, in server order.
  async fn fetch_history(&self, scope: FeedScope) -> Result<Vec<Message>, TransportError>;

  /// Submit a new message. The caller must have validated the draft;
  /// the message becomes visible only when it echoes back through the
  /// push channel.
  async fn submit(&self, scope: FeedScope, draft: &MessageDraft) -> Result<(), TransportError>;

  /// Subscribe to live messages for a scope.
  ///
  /// Returns a broadcast receiver that yields each pushed message in
  /// delivery order. The subscription lives until shutdown; transports
  /// reconnect internally rather than ending the stream.
  fn subscribe(&self, scope: FeedScope) -> broadcast::Receiver<Message>;

  /// Announce room membership on the push channel.
  ///
  /// Required once per room scope before live delivery; a no-op for
  /// the global feed.
  async fn join(&self, chat_id: ChatId) -> Result<(), TransportError>;

  /// Check if the transport connection is healthy.
  async fn is_healthy(&self) -> bool;
}
