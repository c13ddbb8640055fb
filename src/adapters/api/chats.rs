//! Chat Directory Endpoints
//!
//! Implements the `Directory` port over `/api/chats`: listing the
//! rooms the server knows and creating new ones.

use async_trait::async_trait;
use tracing::debug;

use super::client::ApiClient;
use super::types::{CreateChatRequest, WireChat};
use crate::domain::Chat;
use crate::ports::directory::Directory;
use crate::ports::transport::TransportError;

/// Chat directory API over the shared HTTP client.
#[derive(Debug, Clone)]
pub struct ChatsApi {
  client: ApiClient,
}

impl ChatsApi {
  pub fn new(client: ApiClient) -> Self {
    Self { client }
  }
}

#[async_trait]
impl Directory for ChatsApi {
  async fn list_chats(&self) -> Result<Vec<Chat>, TransportError> {
    let response = self.client.get("/api/chats").await?;
    let wire: Vec<WireChat> = response
      .json()
      .await
      .map_err(|e| TransportError::Decode(e.to_string()))?;

    debug!(count = wire.len(), "Chat list fetched");
    Ok(wire.into_iter().map(Chat::from).collect())
  }

  async fn create_chat(&self, name: &str) -> Result<Chat, TransportError> {
    let response = self
      .client
      .post("/api/chats", &CreateChatRequest { name })
      .await?;
    let wire: WireChat = response
      .json()
      .await
      .map_err(|e| TransportError::Decode(e.to_string()))?;

    debug!(id = wire.id, name = %wire.name, "Chat created");
    Ok(wire.into())
  }
}
