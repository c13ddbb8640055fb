//! Chat Directory - Room Listing and Creation
//!
//! Thin use case over the `Directory` port: validates room names
//! client-side before the server is ever contacted.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Chat, ValidationError};
use crate::ports::directory::Directory;
use crate::ports::transport::TransportError;

/// Chat directory operations.
pub struct ChatDirectory<D: Directory> {
    directory: Arc<D>,
}

impl<D: Directory> ChatDirectory<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// List all chats in server order.
    pub async fn list(&self) -> Result<Vec<Chat>, TransportError> {
        self.directory.list_chats().await
    }

    /// Create a chat after validating the name.
    ///
    /// An empty or whitespace-only name fails without a network call.
    pub async fn create(&self, name: &str) -> Result<Chat, TransportError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyChatName.into());
        }

        let chat = self.directory.create_chat(name.trim()).await?;
        info!(id = chat.id, name = %chat.name, "Chat created");
        Ok(chat)
    }
}
