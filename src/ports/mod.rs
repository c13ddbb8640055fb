//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `Transport`: history fetch, message submit, live push subscription
//! - `Directory`: chat room listing and creation

pub mod directory;
pub mod transport;
