//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, WebSocket). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: PeerConnect REST API client (history, submit, chats)
//! - `push`: WebSocket push channel for live message delivery
//! - `transport`: composition of both behind the `Transport` port

pub mod api;
pub mod push;
pub mod transport;

pub use transport::ServerTransport;
