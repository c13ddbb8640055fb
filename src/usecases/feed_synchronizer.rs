//! Feed Synchronizer - Core Reconciliation Loop
//!
//! The main use case: merge a one-shot historical load with the
//! continuous push subscription into a single append-only feed.
//!
//! Ordering contract:
//! 1. The subscription is opened before the history fetch, so a live
//!    echo racing the load is buffered, not lost.
//! 2. Every message appends in arrival order at the synchronizer;
//!    nothing is reordered, dropped, or deduplicated.
//! 3. Submitted messages are never appended optimistically — they
//!    become visible only when the server pushes them back, so
//!    submission and live delivery share one render path.
//!
//! Event-driven architecture: reacts to pushed messages, never polls.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument, warn};

use crate::domain::{Feed, FeedScope, Message, MessageDraft};
use crate::ports::transport::{Transport, TransportError};

/// Events emitted to renderers, in feed order.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A message was appended to the feed.
    Appended(Message),
    /// A recoverable transport failure worth showing to the user.
    Error(String),
}

/// Synchronizer holding its own transport handle and feed.
///
/// One instance per session per scope; dropped on teardown. Replaces
/// the ambient module-level feed/socket globals of earlier clients.
pub struct FeedSynchronizer<T: Transport> {
    /// Server transport (history, submit, push).
    transport: Arc<T>,
    /// Which feed this synchronizer reconciles.
    scope: FeedScope,
    /// The append-only message view.
    feed: Feed,
    /// Fan-out to renderers.
    events_tx: broadcast::Sender<FeedEvent>,
    /// Outbound draft queue, drained by the run loop.
    submit_tx: mpsc::UnboundedSender<MessageDraft>,
    submit_rx: mpsc::UnboundedReceiver<MessageDraft>,
    /// Shutdown signal receiver.
    shutdown_rx: broadcast::Receiver<()>,
}

impl<T: Transport> FeedSynchronizer<T> {
    /// Create a synchronizer for a scope.
    pub fn new(
        transport: Arc<T>,
        scope: FeedScope,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(1024);
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            scope,
            feed: Feed::new(),
            events_tx,
            submit_tx,
            submit_rx,
            shutdown_rx,
        }
    }

    /// Handle for queueing drafts into the run loop.
    ///
    /// Queued drafts go through the same validation and submission
    /// path as `submit`; failures are reported as `FeedEvent::Error`.
    pub fn submitter(&self) -> mpsc::UnboundedSender<MessageDraft> {
        self.submit_tx.clone()
    }

    /// Subscribe to feed events, delivered in append order.
    pub fn events(&self) -> broadcast::Receiver<FeedEvent> {
        self.events_tx.subscribe()
    }

    /// The current feed contents.
    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Issue the one-shot history request and append the result in
    /// response order.
    ///
    /// Returns the number of messages loaded. A transport failure is
    /// returned to the caller and leaves the feed unchanged.
    pub async fn load_history(&mut self) -> Result<usize, TransportError> {
        let history = self.transport.fetch_history(self.scope).await?;
        let count = history.len();

        for message in &history {
            let _ = self
                .events_tx
                .send(FeedEvent::Appended(message.clone()));
        }
        self.feed.extend(history);

        info!(scope = %self.scope, count, "History loaded");
        Ok(count)
    }

    /// Validate and submit a draft.
    ///
    /// An invalid draft fails before any network call. On transport
    /// failure the feed is unchanged and the draft stays with the
    /// caller for resubmission.
    pub async fn submit(&self, draft: &MessageDraft) -> Result<(), TransportError> {
        draft.validate()?;
        self.transport.submit(self.scope, draft).await
    }

    /// Run the synchronizer until shutdown.
    ///
    /// Joins the room (for room scopes), opens the live subscription,
    /// loads history, then appends pushed messages as they arrive.
    /// A failed history load is reported and the live feed continues.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub async fn run(&mut self) -> Result<(), TransportError> {
        if let Some(chat_id) = self.scope.chat_id() {
            self.transport.join(chat_id).await?;
            debug!(chat_id, "Room join announced");
        }

        // Subscribe before loading so a racing live echo is buffered.
        let mut live = self.transport.subscribe(self.scope);

        match self.load_history().await {
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "History load failed, continuing with live feed");
                let _ = self.events_tx.send(FeedEvent::Error(e.to_string()));
            }
        }

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Shutdown signal received, stopping synchronizer");
                    break;
                }
                draft = self.submit_rx.recv() => {
                    // The queue never closes while `self` holds a sender.
                    if let Some(draft) = draft {
                        if let Err(e) = self.submit(&draft).await {
                            warn!(error = %e, "Submission failed, draft not rendered");
                            let _ = self.events_tx.send(FeedEvent::Error(e.to_string()));
                        }
                    }
                }
                msg = live.recv() => {
                    match msg {
                        Ok(message) => self.append(message),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Earlier appends are untouched; only
                            // not-yet-rendered live updates were lost.
                            warn!(skipped, "Live subscription lagged");
                            let _ = self.events_tx.send(FeedEvent::Error(format!(
                                "{skipped} live updates dropped"
                            )));
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(TransportError::ChannelClosed);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Append one message and notify renderers.
    fn append(&mut self, message: Message) {
        debug!(author = %message.author, "Message appended");
        self.feed.append(message.clone());
        // Ignore send errors: no renderer attached yet.
        let _ = self.events_tx.send(FeedEvent::Appended(message));
    }
}
