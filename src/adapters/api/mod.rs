//! PeerConnect REST API Adapter
//!
//! Implements the HTTP side of the transport: historical message
//! loads, message submission, and the chat directory.
//!
//! Sub-modules:
//! - `client`: thin reqwest wrapper with timeout and status mapping
//! - `chats`: chat directory endpoints (`/api/chats`)
//! - `messages`: message endpoints, global and room-scoped
//! - `types`: wire request/response type definitions

pub mod chats;
pub mod client;
pub mod messages;
pub mod types;

pub use chats::ChatsApi;
pub use client::{ApiClient, ApiClientConfig};
pub use messages::MessagesApi;
