//! Message Endpoints - History Fetch and Submission
//!
//! Covers both endpoint families behind one parameterized adapter:
//! the legacy global `/api/messages` and the room-scoped
//! `/api/chats/{id}/messages`. The scope picks the path.

use tracing::debug;

use super::client::ApiClient;
use super::types::{PostMessageRequest, WireMessage};
use crate::domain::{FeedScope, Message, MessageDraft};
use crate::ports::transport::TransportError;

/// Message API over the shared HTTP client.
#[derive(Debug, Clone)]
pub struct MessagesApi {
  client: ApiClient,
}

impl MessagesApi {
  pub fn new(client: ApiClient) -> Self {
    Self { client }
  }

  /// Resolve the endpoint path for a scope.
  fn path(scope: FeedScope) -> String {
    match scope.chat_id() {
      None => "/api/messages".to_string(),
      Some(id) => format!("/api/chats/{id}/messages"),
    }
  }

  /// Fetch the full history for a scope, in server response order.
  pub async fn fetch_history(
    &self,
    scope: FeedScope,
  ) -> Result<Vec<Message>, TransportError> {
    let response = self.client.get(&Self::path(scope)).await?;
    let wire: Vec<WireMessage> = response
      .json()
      .await
      .map_err(|e| TransportError::Decode(e.to_string()))?;

    debug!(scope = %scope, count = wire.len(), "History fetched");
    Ok(wire.into_iter().map(WireMessage::into_message).collect())
  }

  /// Submit a draft. The response body is ignored: the message becomes
  /// visible only when the server pushes it back.
  pub async fn submit(
    &self,
    scope: FeedScope,
    draft: &MessageDraft,
  ) -> Result<(), TransportError> {
    let body = PostMessageRequest {
      user: &draft.author,
      text: &draft.text,
    };
    self.client.post(&Self::path(scope), &body).await?;
    debug!(scope = %scope, author = %draft.author, "Message submitted");
    Ok(())
  }

  /// Check if the REST API answers at all.
  pub async fn is_reachable(&self) -> bool {
    self.client.health_check().await
  }
}
