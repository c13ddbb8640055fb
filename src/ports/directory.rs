//! Directory Port - Chat Room Listing Interface
//!
//! Defines the trait for the chat directory: listing existing rooms
//! and creating new ones. Backed by the `/api/chats` endpoints.

use async_trait::async_trait;

use super::transport::TransportError;
use crate::domain::Chat;

/// Trait for chat directory providers.
#[async_trait]
pub trait Directory: Send + Sync + 'static {
  /// List all chats known to the server, in server order.
  async fn list_chats(&self) -> Result<Vec<Chat>, TransportError>;

  /// Create a new chat and return it with its assigned id.
  ///
  /// The name must already be validated; the server independently
  /// rejects empty names with a 400.
  async fn create_chat(&self, name: &str) -> Result<Chat, TransportError>;
}
