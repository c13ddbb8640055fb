//! API Request/Response Types
//!
//! Defines the serialization types for communicating with the
//! PeerConnect REST API and the push channel. Request structs only
//! derive Serialize, response structs only Deserialize.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Chat, ChatId, Message};

/// A message as the server serializes it.
///
/// `ts` is either absent, null, or a SQLite `CURRENT_TIMESTAMP`
/// string (UTC, no offset). RFC 3339 is accepted too for newer
/// server builds.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
  /// Server row id. Present but unused: messages carry no identity
  /// in the feed.
  #[serde(default)]
  pub id: Option<i64>,
  /// Room id for scoped broadcasts; absent on the legacy global feed.
  #[serde(default)]
  pub chat_id: Option<ChatId>,
  /// Sender display name.
  pub user: String,
  /// Message body.
  pub text: String,
  /// Server timestamp, if the server recorded one.
  #[serde(default)]
  pub ts: Option<String>,
}

impl WireMessage {
  /// Convert to a domain message, defaulting to receipt time when the
  /// server sent no usable timestamp.
  pub fn into_message(self) -> Message {
    let timestamp = self
      .ts
      .as_deref()
      .and_then(parse_server_timestamp)
      .unwrap_or_else(Utc::now);

    Message {
      author: self.user,
      text: self.text,
      timestamp,
    }
  }
}

/// Parse a server timestamp: RFC 3339 first, then the SQLite
/// `YYYY-MM-DD HH:MM:SS` form interpreted as UTC.
fn parse_server_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
    .ok()
    .map(|naive| naive.and_utc())
}

/// Payload for `POST /api/messages` and `POST /api/chats/{id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessageRequest<'a> {
  /// Sender display name.
  pub user: &'a str,
  /// Message body.
  pub text: &'a str,
}

/// Payload for `POST /api/chats`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateChatRequest<'a> {
  /// Room name.
  pub name: &'a str,
}

/// A chat row from `/api/chats`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireChat {
  pub id: ChatId,
  pub name: String,
}

impl From<WireChat> for Chat {
  fn from(wire: WireChat) -> Self {
    Self {
      id: wire.id,
      name: wire.name,
    }
  }
}

/// Error body the server attaches to 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
  pub error: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_message_with_sqlite_timestamp() {
    let wire: WireMessage =
      serde_json::from_str(r#"{"id":3,"user":"a","text":"hi","ts":"2024-05-01 12:30:00"}"#)
        .unwrap();
    let msg = wire.into_message();
    assert_eq!(msg.author, "a");
    assert_eq!(msg.timestamp.to_rfc3339(), "2024-05-01T12:30:00+00:00");
  }

  #[test]
  fn missing_ts_defaults_to_receipt_time() {
    let before = Utc::now();
    let wire: WireMessage =
      serde_json::from_str(r#"{"user":"b","text":"yo","ts":null}"#).unwrap();
    let msg = wire.into_message();
    assert!(msg.timestamp >= before);
  }

  #[test]
  fn scoped_message_carries_chat_id() {
    let wire: WireMessage =
      serde_json::from_str(r#"{"chat_id":4,"user":"a","text":"hi"}"#).unwrap();
    assert_eq!(wire.chat_id, Some(4));
  }
}
