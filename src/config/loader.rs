//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  info!(
    base_url = %config.api.base_url,
    ws_url = %config.api.ws_url,
    chat_id = ?config.feed.chat_id,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.client.author.trim().is_empty(),
    "client.author must not be empty"
  );

  anyhow::ensure!(
    !config.api.base_url.is_empty(),
    "API base URL must not be empty"
  );
  anyhow::ensure!(
    !config.api.base_url.ends_with('/'),
    "API base URL must not end with a slash, got {}",
    config.api.base_url
  );
  anyhow::ensure!(
    !config.api.ws_url.is_empty(),
    "WebSocket URL must not be empty"
  );
  anyhow::ensure!(
    config.api.timeout_ms > 0,
    "timeout_ms must be positive"
  );

  anyhow::ensure!(
    config.feed.channel_capacity > 0,
    "feed.channel_capacity must be positive"
  );
  if let Some(chat_id) = config.feed.chat_id {
    anyhow::ensure!(
      chat_id > 0,
      "feed.chat_id must be a positive room id, got {chat_id}"
    );
  }

  Ok(())
}
