//! Core chat domain types.
//!
//! Defines the entities shared by ports, adapters, and use cases:
//! messages, drafts, chats, and feed scopes. These types are the
//! foundation of the hexagonal architecture's inner ring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chat room identifier assigned by the server directory.
pub type ChatId = i64;

/// Which feed a synchronizer is bound to.
///
/// `Global` targets the legacy unscoped endpoints (`/api/messages`);
/// `Room` targets the per-chat endpoints (`/api/chats/{id}/messages`)
/// and requires a `join` on the push channel before live delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedScope {
    /// Single shared feed with no room routing.
    Global,
    /// Feed scoped to one chat room.
    Room(ChatId),
}

impl FeedScope {
    /// The chat id for room scopes, `None` for the global feed.
    pub fn chat_id(&self) -> Option<ChatId> {
        match self {
            Self::Global => None,
            Self::Room(id) => Some(*id),
        }
    }
}

impl std::fmt::Display for FeedScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Room(id) => write!(f, "chat_{id}"),
        }
    }
}

/// A single chat message. Immutable once created.
///
/// Carries no identity key: two messages with the same author, text,
/// and timestamp are indistinguishable, and the feed never dedups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the sender.
    pub author: String,
    /// Message body.
    pub text: String,
    /// Server timestamp, or receipt time when the wire omits it.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a message stamped with the current receipt time.
    pub fn received_now(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.author,
            self.text
        )
    }
}

/// An outbound message before submission.
///
/// Drafts are validated client-side; an invalid draft never reaches
/// the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDraft {
    /// Display name of the sender.
    pub author: String,
    /// Message body.
    pub text: String,
}

impl MessageDraft {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }

    /// Reject drafts with an empty or whitespace-only author or body.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.author.trim().is_empty() {
            return Err(ValidationError::EmptyAuthor);
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(())
    }
}

/// A chat room entry from the server directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Server-assigned room id.
    pub id: ChatId,
    /// Human-readable room name.
    pub name: String,
}

/// Client-side validation failures. Raised before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message author must not be empty")]
    EmptyAuthor,
    #[error("message text must not be empty")]
    EmptyText,
    #[error("chat name must not be empty")]
    EmptyChatName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_with_author_and_text_is_valid() {
        let draft = MessageDraft::new("alice", "hello");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn empty_author_is_rejected() {
        let draft = MessageDraft::new("", "hello");
        assert_eq!(draft.validate(), Err(ValidationError::EmptyAuthor));
    }

    #[test]
    fn whitespace_text_is_rejected() {
        let draft = MessageDraft::new("alice", "   ");
        assert_eq!(draft.validate(), Err(ValidationError::EmptyText));
    }

    #[test]
    fn scope_display_matches_room_naming() {
        assert_eq!(FeedScope::Room(7).to_string(), "chat_7");
        assert_eq!(FeedScope::Global.to_string(), "global");
        assert_eq!(FeedScope::Room(7).chat_id(), Some(7));
        assert_eq!(FeedScope::Global.chat_id(), None);
    }
}
