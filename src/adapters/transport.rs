//! Server Transport - HTTP + Push Channel Composition
//!
//! Binds the REST adapter (history, submit) and the WebSocket push
//! feed (live delivery, joins) into one `Transport` implementation,
//! so use cases hold a single collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::api::MessagesApi;
use super::push::SocketFeed;
use crate::domain::{ChatId, FeedScope, Message, MessageDraft};
use crate::ports::transport::{Transport, TransportError};

/// Transport over a PeerConnect server: REST for request/response,
/// WebSocket for push.
pub struct ServerTransport {
    /// Message endpoints (history, submit).
    messages: MessagesApi,
    /// Push channel, shared with its connection task.
    socket: Arc<SocketFeed>,
}

impl ServerTransport {
    pub fn new(messages: MessagesApi, socket: Arc<SocketFeed>) -> Self {
        Self { messages, socket }
    }
}

#[async_trait]
impl Transport for ServerTransport {
    async fn fetch_history(&self, scope: FeedScope) -> Result<Vec<Message>, TransportError> {
        self.messages.fetch_history(scope).await
    }

    async fn submit(
        &self,
        scope: FeedScope,
        draft: &MessageDraft,
    ) -> Result<(), TransportError> {
        self.messages.submit(scope, draft).await
    }

    fn subscribe(&self, scope: FeedScope) -> broadcast::Receiver<Message> {
        self.socket.subscribe(scope)
    }

    async fn join(&self, chat_id: ChatId) -> Result<(), TransportError> {
        self.socket
            .join(chat_id)
            .map_err(|_| TransportError::ChannelClosed)
    }

    async fn is_healthy(&self) -> bool {
        // Socket liveness first: it is free and gates the REST probe.
        self.socket.is_connected() && self.messages.is_reachable().await
    }
}
