//! Push Channel Adapter - Live Message Delivery
//!
//! WebSocket-based push channel that delivers `new_message` events
//! from the server and announces room membership with `join` events.
//! Connection lifecycle (reconnect, shutdown) lives here so the
//! subscription survives transient network failures.

pub mod socket;

pub use socket::{SocketFeed, SocketFeedConfig};
