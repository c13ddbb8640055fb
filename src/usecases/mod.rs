//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the client's core workflows. Each use case is a self-contained
//! operation over a port.
//!
//! Use cases:
//! - `FeedSynchronizer`: merge history load + live push into one feed
//! - `ChatDirectory`: chat room listing and creation

pub mod directory;
pub mod feed_synchronizer;

pub use directory::ChatDirectory;
pub use feed_synchronizer::{FeedEvent, FeedSynchronizer};
