//! Configuration Module - TOML-based Client Configuration
//!
//! Loads and validates configuration from `config.toml`. All server
//! endpoints and feed parameters are externalized here - nothing is
//! hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

/// Top-level client configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the client connects.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Client identity and metadata.
  pub client: ClientConfig,
  /// Server endpoints.
  pub api: ApiConfig,
  /// Feed and push channel tuning.
  #[serde(default)]
  pub feed: FeedConfig,
}

/// Client identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
  /// Human-readable client name, logged at startup.
  #[serde(default = "default_client_name")]
  pub name: String,
  /// Display name used as the author of submitted messages.
  pub author: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Server endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// REST API base URL, without a trailing slash.
  pub base_url: String,
  /// Push channel WebSocket URL.
  pub ws_url: String,
  /// Request timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
}

/// Feed tuning configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
  /// Chat room to follow; absent means the legacy global feed.
  pub chat_id: Option<i64>,
  /// Broadcast buffer per scope on the push channel.
  #[serde(default = "default_channel_capacity")]
  pub channel_capacity: usize,
  /// Seconds to wait before reconnecting a dropped push channel.
  #[serde(default = "default_reconnect_delay")]
  pub reconnect_delay_secs: u64,
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      chat_id: None,
      channel_capacity: default_channel_capacity(),
      reconnect_delay_secs: default_reconnect_delay(),
    }
  }
}

// Default value functions for serde

fn default_client_name() -> String {
  "peerconnect-client".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_timeout_ms() -> u64 {
  10_000
}

fn default_channel_capacity() -> usize {
  1024
}

fn default_reconnect_delay() -> u64 {
  5
}
