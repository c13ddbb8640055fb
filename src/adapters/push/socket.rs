//! WebSocket Push Feed - Live Message Source
//!
//! Connects to the server's push endpoint and routes incoming
//! `new_message` events to per-scope broadcast channels. Implements
//! the push half of the `Transport` port.
//!
//! Features:
//! - Per-scope broadcast channels with configurable buffer
//! - Auto-reconnect on disconnect (configurable backoff)
//! - Room joins re-announced after every reconnect
//! - Event-driven via tokio::select! (NEVER polling)

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, instrument, warn};

use crate::adapters::api::types::WireMessage;
use crate::domain::{ChatId, FeedScope, Message};

/// Inbound event envelope: `{event, data}`.
#[derive(Debug, Deserialize)]
struct InboundEnvelope {
    /// Event name, e.g. "new_message".
    event: String,
    /// Event payload, shape depends on the event.
    #[serde(default)]
    data: Value,
}

/// Outbound event envelope for `join`.
#[derive(Debug, Serialize)]
struct JoinEnvelope {
    event: &'static str,
    data: JoinPayload,
}

#[derive(Debug, Serialize)]
struct JoinPayload {
    chat_id: ChatId,
}

/// Configuration for the push channel.
#[derive(Debug, Clone)]
pub struct SocketFeedConfig {
    /// WebSocket endpoint URL.
    pub ws_url: String,
    /// Broadcast buffer per scope.
    pub channel_capacity: usize,
    /// Delay before reconnecting after a dropped connection.
    pub reconnect_delay: Duration,
}

impl Default for SocketFeedConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:5000/push".to_string(),
            channel_capacity: 1024,
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

/// WebSocket push feed.
///
/// Routes `new_message` events to per-scope broadcast channels and
/// announces `join` for room scopes. One instance is shared between
/// the connection task (`run`) and transport handles (`subscribe`,
/// `join`).
pub struct SocketFeed {
    /// Per-scope broadcast senders.
    scopes: RwLock<HashMap<FeedScope, broadcast::Sender<Message>>>,
    /// Rooms to (re-)announce on every connect.
    joined: RwLock<HashSet<ChatId>>,
    /// Queue of joins to send on the live connection.
    join_tx: mpsc::UnboundedSender<ChatId>,
    /// Receive side of the join queue, taken by the run loop.
    join_rx: Mutex<mpsc::UnboundedReceiver<ChatId>>,
    /// Whether a connection is currently established.
    connected: AtomicBool,
    /// Feed configuration.
    config: SocketFeedConfig,
}

impl SocketFeed {
    /// Create a new push feed (not yet connected; see `run`).
    pub fn new(config: SocketFeedConfig) -> Self {
        let (join_tx, join_rx) = mpsc::unbounded_channel();
        Self {
            scopes: RwLock::new(HashMap::new()),
            joined: RwLock::new(HashSet::new()),
            join_tx,
            join_rx: Mutex::new(join_rx),
            connected: AtomicBool::new(false),
            config,
        }
    }

    /// Get a receiver for a scope's live messages.
    pub fn subscribe(&self, scope: FeedScope) -> broadcast::Receiver<Message> {
        let mut scopes = self.scopes.write().unwrap_or_else(|e| e.into_inner());
        scopes
            .entry(scope)
            .or_insert_with(|| broadcast::channel(self.config.channel_capacity).0)
            .subscribe()
    }

    /// Register a room and queue its `join` announcement.
    ///
    /// Joins are idempotent server-side: a queued join may be sent
    /// again after a reconnect.
    pub fn join(&self, chat_id: ChatId) -> Result<()> {
        self.joined
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(chat_id);
        self.join_tx
            .send(chat_id)
            .context("push channel join queue closed")
    }

    /// Whether the socket currently holds a live connection.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Run the WebSocket connection loop with auto-reconnect.
    ///
    /// Listens for pushed events and broadcasts them to subscribers
    /// until the shutdown signal fires.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        info!(url = %self.config.ws_url, "Connecting to push channel");

        loop {
            match self.connect_and_stream(&mut shutdown_rx).await {
                Ok(()) => {
                    info!("Push channel shut down gracefully");
                    return Ok(());
                }
                Err(e) => {
                    self.connected.store(false, Ordering::Relaxed);
                    warn!(
                        error = %e,
                        delay_s = self.config.reconnect_delay.as_secs(),
                        "Push channel disconnected, reconnecting"
                    );
                    // Check shutdown before sleeping
                    tokio::select! {
                        _ = shutdown_rx.recv() => return Ok(()),
                        _ = tokio::time::sleep(self.config.reconnect_delay) => {}
                    }
                }
            }
        }
    }

    /// Single session: connect, re-announce joins, stream until error
    /// or shutdown.
    async fn connect_and_stream(
        &self,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> Result<()> {
        let (ws_stream, _) = connect_async(&self.config.ws_url)
            .await
            .context("push channel connection failed")?;

        let (mut write, mut read) = ws_stream.split();

        self.connected.store(true, Ordering::Relaxed);
        info!("Push channel connected");

        // Re-announce all room memberships on this connection.
        let rooms: Vec<ChatId> = {
            let joined = self.joined.read().unwrap_or_else(|e| e.into_inner());
            joined.iter().copied().collect()
        };
        for chat_id in rooms {
            let frame = Self::join_frame(chat_id)?;
            write
                .send(WsMessage::Text(frame))
                .await
                .context("failed to announce room join")?;
        }

        let mut join_rx = self.join_rx.lock().await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal in push channel");
                    self.connected.store(false, Ordering::Relaxed);
                    return Ok(());
                }
                chat_id = join_rx.recv() => {
                    match chat_id {
                        Some(id) => {
                            let frame = Self::join_frame(id)?;
                            write
                                .send(WsMessage::Text(frame))
                                .await
                                .context("failed to send room join")?;
                            debug!(chat_id = id, "Room join sent");
                        }
                        None => {
                            return Err(anyhow::anyhow!("join queue closed"));
                        }
                    }
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            if let Err(e) = self.handle_event(text.as_ref()) {
                                debug!(error = %e, "Ignoring unparseable push event");
                            }
                        }
                        Some(Ok(WsMessage::Ping(_))) => {
                            debug!("Push channel ping received");
                        }
                        Some(Err(e)) => {
                            return Err(anyhow::anyhow!("push channel error: {e}"));
                        }
                        None => {
                            return Err(anyhow::anyhow!("push channel stream ended"));
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Serialize a `join` envelope.
    fn join_frame(chat_id: ChatId) -> Result<String> {
        serde_json::to_string(&JoinEnvelope {
            event: "join",
            data: JoinPayload { chat_id },
        })
        .context("failed to encode join event")
    }

    /// Parse a pushed event and route `new_message` to its scope.
    fn handle_event(&self, text: &str) -> Result<()> {
        let envelope: InboundEnvelope =
            serde_json::from_str(text).context("invalid push envelope")?;

        if envelope.event != "new_message" {
            debug!(event = %envelope.event, "Ignoring push event");
            return Ok(());
        }

        let wire: WireMessage = serde_json::from_value(envelope.data)
            .context("invalid new_message payload")?;

        let scope = match wire.chat_id {
            Some(id) => FeedScope::Room(id),
            None => FeedScope::Global,
        };
        let message = wire.into_message();

        let scopes = self.scopes.read().unwrap_or_else(|e| e.into_inner());
        if let Some(tx) = scopes.get(&scope) {
            // Ignore send errors: no subscriber means nothing to render.
            let _ = tx.send(message);
        } else {
            debug!(scope = %scope, "Pushed message for unsubscribed scope dropped");
        }

        Ok(())
    }
}
