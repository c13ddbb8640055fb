//! PeerConnect Feed Client — Entry Point
//!
//! Initializes configuration, logging, the server transport, and the
//! feed synchronizer. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (stderr, so the feed owns stdout)
//! 3. Create ApiClient (HTTP + timeout + status mapping)
//! 4. Create SocketFeed (push channel with auto-reconnect)
//! 5. Compose ServerTransport (Transport port)
//! 6. List chats from the directory (informational)
//! 7. Spawn push channel task
//! 8. Spawn FeedSynchronizer loop for the configured scope
//! 9. Render feed events to stdout, read drafts from stdin
//! 10. Wait for SIGINT → graceful shutdown (signal→drain→exit)

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::api::{ApiClient, ApiClientConfig, ChatsApi, MessagesApi};
use adapters::push::{SocketFeed, SocketFeedConfig};
use adapters::ServerTransport;
use domain::{FeedScope, MessageDraft};
use ports::transport::Transport;
use usecases::directory::ChatDirectory;
use usecases::feed_synchronizer::{FeedEvent, FeedSynchronizer};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging on stderr ──────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.client.log_level)
                }),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        name = %config.client.name,
        author = %config.client.author,
        version = env!("CARGO_PKG_VERSION"),
        server = %config.api.base_url,
        "Starting PeerConnect feed client"
    );

    // ── 3. Shutdown signal channel ──────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 4. Create the REST client ───────────────────────────
    let api_client = ApiClient::new(ApiClientConfig {
        base_url: config.api.base_url.clone(),
        timeout: Duration::from_millis(config.api.timeout_ms),
    })
    .context("Failed to create API client")?;

    // ── 5. Create the push channel ──────────────────────────
    let socket = Arc::new(SocketFeed::new(SocketFeedConfig {
        ws_url: config.api.ws_url.clone(),
        channel_capacity: config.feed.channel_capacity,
        reconnect_delay: Duration::from_secs(config.feed.reconnect_delay_secs),
    }));

    // ── 6. Compose the transport ────────────────────────────
    let transport = Arc::new(ServerTransport::new(
        MessagesApi::new(api_client.clone()),
        Arc::clone(&socket),
    ));

    // ── 7. Show the chat directory (non-fatal on failure) ───
    let chats = ChatDirectory::new(Arc::new(ChatsApi::new(api_client.clone())));
    match chats.list().await {
        Ok(rooms) => {
            for chat in &rooms {
                info!(id = chat.id, name = %chat.name, "Chat available");
            }
        }
        Err(e) => warn!(error = %e, "Could not list chats"),
    }

    // ── 8. Spawn the push channel task ──────────────────────
    let socket_shutdown = shutdown_tx.subscribe();
    let socket_ref = Arc::clone(&socket);
    let socket_handle = tokio::spawn(async move {
        if let Err(e) = socket_ref.run(socket_shutdown).await {
            warn!(error = %e, "Push channel task failed");
        }
    });

    // ── 9. Spawn the feed synchronizer ──────────────────────
    let scope = match config.feed.chat_id {
        Some(id) => FeedScope::Room(id),
        None => FeedScope::Global,
    };
    let mut synchronizer =
        FeedSynchronizer::new(Arc::clone(&transport), scope, shutdown_tx.subscribe());
    let mut events = synchronizer.events();
    let drafts = synchronizer.submitter();

    let sync_handle = tokio::spawn(async move {
        if let Err(e) = synchronizer.run().await {
            warn!(error = %e, "Feed synchronizer stopped");
        }
    });

    info!(scope = %scope, "All tasks spawned — client is running");

    // ── 10. Render events + read drafts until SIGINT ────────
    let author = config.client.author.clone();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut health_tick = tokio::time::interval(Duration::from_secs(30));
    health_tick.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("SIGINT received, initiating graceful shutdown");
                break;
            }
            _ = health_tick.tick() => {
                if transport.is_healthy().await {
                    debug!("Transport heartbeat — healthy");
                } else {
                    warn!("Transport degraded — push channel down or API unreachable");
                }
            }
            event = events.recv() => {
                match event {
                    Ok(FeedEvent::Appended(message)) => println!("{message}"),
                    Ok(FeedEvent::Error(e)) => eprintln!("! {e}"),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "Renderer lagged behind the feed");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            line = stdin.next_line() => {
                match line {
                    Ok(Some(text)) if !text.trim().is_empty() => {
                        let draft = MessageDraft::new(author.clone(), text);
                        if drafts.send(draft).is_err() {
                            break;
                        }
                    }
                    Ok(Some(_)) => {}
                    Ok(None) | Err(_) => {
                        info!("Stdin closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    // ── Graceful shutdown ───────────────────────────────────

    let _ = shutdown_tx.send(());
    info!("Shutdown signal broadcast to all tasks");

    let _ = tokio::time::timeout(Duration::from_secs(5), sync_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), socket_handle).await;

    info!("Shutdown complete");
    Ok(())
}
