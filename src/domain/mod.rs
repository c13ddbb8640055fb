//! Domain layer - Core chat types and the append-only feed.
//!
//! This module contains the pure domain logic for the feed client.
//! No external dependencies allowed here (hexagonal architecture inner ring).
//! All types are serializable and testable in isolation.

pub mod feed;
pub mod message;

// Re-export core types for convenience
pub use feed::Feed;
pub use message::{Chat, ChatId, FeedScope, Message, MessageDraft, ValidationError};
