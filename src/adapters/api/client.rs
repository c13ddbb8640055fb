//! HTTP Client - Thin reqwest Wrapper
//!
//! Wraps reqwest with a request timeout, base-URL joining, and
//! uniform status-to-error mapping for all PeerConnect REST calls.
//! Failed requests are never retried here: errors go straight back
//! to the caller, who decides how to report them.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;

use super::types::ApiErrorBody;
use crate::ports::transport::TransportError;

impl From<reqwest::Error> for TransportError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      Self::Decode(err.to_string())
    } else {
      Self::Http(err.to_string())
    }
  }
}

/// Configuration for the REST client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
  /// Base URL for the API, without a trailing slash.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
}

impl Default for ApiClientConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:5000".to_string(),
      timeout: Duration::from_secs(10),
    }
  }
}

/// HTTP client for the PeerConnect REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: ApiClientConfig,
}

impl ApiClient {
  /// Create a new API client.
  pub fn new(config: ApiClientConfig) -> Result<Self, TransportError> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()
      .map_err(|e| TransportError::Http(e.to_string()))?;

    Ok(Self { http, config })
  }

  /// Execute a GET request against an API path.
  pub async fn get(&self, path: &str) -> Result<Response, TransportError> {
    let url = format!("{}{}", self.config.base_url, path);
    let response = self.http.get(&url).send().await?;
    Self::check_status(response).await
  }

  /// Execute a POST request with a JSON body.
  pub async fn post<B: Serialize>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<Response, TransportError> {
    let url = format!("{}{}", self.config.base_url, path);
    let response = self.http.post(&url).json(body).send().await?;
    Self::check_status(response).await
  }

  /// Map non-success statuses to `TransportError::Status`, pulling the
  /// server's `{error}` body when present.
  async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let message = match response.json::<ApiErrorBody>().await {
      Ok(body) => body.error,
      Err(_) => status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string(),
    };

    Err(TransportError::Status {
      status: status.as_u16(),
      message,
    })
  }

  /// Check if the API is reachable.
  pub async fn health_check(&self) -> bool {
    self.get("/api/chats").await.is_ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn health_check_is_false_when_server_unreachable() {
    let client = ApiClient::new(ApiClientConfig {
      base_url: "http://127.0.0.1:9".to_string(),
      timeout: Duration::from_millis(500),
    })
    .unwrap();

    assert!(!client.health_check().await);
  }
}
