//! Integration Tests - Feed Synchronizer and Directory
//!
//! Tests the interaction between usecases, ports, and mock adapters.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockall::mock;
use mockall::predicate::*;
use tokio::sync::{broadcast, Notify};

use peerconnect_client::domain::{
    Chat, ChatId, FeedScope, Message, MessageDraft, ValidationError,
};
use peerconnect_client::ports::directory::Directory;
use peerconnect_client::ports::transport::{Transport, TransportError};
use peerconnect_client::usecases::directory::ChatDirectory;
use peerconnect_client::usecases::feed_synchronizer::{FeedEvent, FeedSynchronizer};

// ---- Mock Definitions ----

mock! {
    pub Server {}

    #[async_trait::async_trait]
    impl Transport for Server {
        async fn fetch_history(
            &self,
            scope: FeedScope,
        ) -> Result<Vec<Message>, TransportError>;

        async fn submit(
            &self,
            scope: FeedScope,
            draft: &MessageDraft,
        ) -> Result<(), TransportError>;

        fn subscribe(&self, scope: FeedScope) -> broadcast::Receiver<Message>;

        async fn join(&self, chat_id: ChatId) -> Result<(), TransportError>;

        async fn is_healthy(&self) -> bool;
    }
}

mock! {
    pub Dir {}

    #[async_trait::async_trait]
    impl Directory for Dir {
        async fn list_chats(&self) -> Result<Vec<Chat>, TransportError>;
        async fn create_chat(&self, name: &str) -> Result<Chat, TransportError>;
    }
}

fn msg(author: &str, text: &str, secs: i64) -> Message {
    Message {
        author: author.to_string(),
        text: text.to_string(),
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
    }
}

fn shutdown() -> (broadcast::Sender<()>, broadcast::Receiver<()>) {
    broadcast::channel(1)
}

// ---- Feed Synchronizer Tests ----

#[tokio::test]
async fn history_load_appends_all_messages_in_response_order() {
    let mut server = MockServer::new();
    server.expect_fetch_history().returning(|_| {
        Ok(vec![
            msg("a", "first", 1),
            msg("b", "second", 2),
            msg("a", "third", 3),
        ])
    });

    let (_tx, rx) = shutdown();
    let mut sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, rx);

    let loaded = sync.load_history().await.unwrap();
    assert_eq!(loaded, 3);

    let texts: Vec<_> = sync
        .feed()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

#[tokio::test]
async fn history_load_emits_one_event_per_message_in_order() {
    let mut server = MockServer::new();
    server
        .expect_fetch_history()
        .returning(|_| Ok(vec![msg("a", "hi", 1), msg("b", "yo", 2)]));

    let (_tx, rx) = shutdown();
    let mut sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, rx);
    let mut events = sync.events();

    sync.load_history().await.unwrap();

    let mut rendered = Vec::new();
    while let Ok(FeedEvent::Appended(m)) = events.try_recv() {
        rendered.push(m.text);
    }
    assert_eq!(rendered, ["hi", "yo"]);
    assert_eq!(sync.feed().len(), 2);
}

#[tokio::test]
async fn failed_history_load_leaves_feed_empty_and_returns_error() {
    let mut server = MockServer::new();
    server
        .expect_fetch_history()
        .returning(|_| Err(TransportError::Http("connection refused".into())));

    let (_tx, rx) = shutdown();
    let mut sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, rx);

    let result = sync.load_history().await;
    assert!(matches!(result, Err(TransportError::Http(_))));
    assert!(sync.feed().is_empty());
}

#[tokio::test]
async fn live_update_appends_after_history() {
    // Scenario: history = [a:hi @1000], then live b:yo @2000 arrives.
    let (live_tx, _) = broadcast::channel(16);

    let mut server = MockServer::new();
    server
        .expect_fetch_history()
        .returning(|_| Ok(vec![msg("a", "hi", 1000)]));
    let subscribe_tx = live_tx.clone();
    server
        .expect_subscribe()
        .returning(move |_| subscribe_tx.subscribe());

    let (shutdown_tx, shutdown_rx) = shutdown();
    let mut sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, shutdown_rx);
    let mut events = sync.events();

    let handle = tokio::spawn(async move {
        let _ = sync.run().await;
        sync
    });

    // History item rendered first.
    match events.recv().await.unwrap() {
        FeedEvent::Appended(m) => assert_eq!(m.text, "hi"),
        other => panic!("expected append, got {other:?}"),
    }

    // Now push the live update and expect it strictly appended.
    live_tx.send(msg("b", "yo", 2000)).unwrap();
    match events.recv().await.unwrap() {
        FeedEvent::Appended(m) => assert_eq!(m.text, "yo"),
        other => panic!("expected append, got {other:?}"),
    }

    shutdown_tx.send(()).unwrap();
    let sync = handle.await.unwrap();

    let rendered: Vec<_> = sync
        .feed()
        .messages()
        .iter()
        .map(|m| format!("{}:{}", m.author, m.text))
        .collect();
    assert_eq!(rendered, ["a:hi", "b:yo"]);
}

/// Transport stub whose history fetch blocks until released, to force
/// a live update to race the historical load.
struct SlowHistoryTransport {
    live_tx: broadcast::Sender<Message>,
    subscribed: Arc<Notify>,
    release_history: Arc<Notify>,
}

#[async_trait::async_trait]
impl Transport for SlowHistoryTransport {
    async fn fetch_history(&self, _scope: FeedScope) -> Result<Vec<Message>, TransportError> {
        self.release_history.notified().await;
        Ok(vec![msg("a", "hi", 1000)])
    }

    async fn submit(
        &self,
        _scope: FeedScope,
        _draft: &MessageDraft,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    fn subscribe(&self, _scope: FeedScope) -> broadcast::Receiver<Message> {
        let rx = self.live_tx.subscribe();
        self.subscribed.notify_one();
        rx
    }

    async fn join(&self, _chat_id: ChatId) -> Result<(), TransportError> {
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn live_update_racing_history_load_still_renders() {
    let (live_tx, _) = broadcast::channel(16);
    let subscribed = Arc::new(Notify::new());
    let release_history = Arc::new(Notify::new());

    let transport = Arc::new(SlowHistoryTransport {
        live_tx: live_tx.clone(),
        subscribed: Arc::clone(&subscribed),
        release_history: Arc::clone(&release_history),
    });

    let (shutdown_tx, shutdown_rx) = shutdown();
    let mut sync = FeedSynchronizer::new(transport, FeedScope::Global, shutdown_rx);
    let mut events = sync.events();

    let handle = tokio::spawn(async move {
        let _ = sync.run().await;
        sync
    });

    // Deliver a live update while the history request is in flight.
    subscribed.notified().await;
    live_tx.send(msg("b", "yo", 2000)).unwrap();
    release_history.notify_one();

    // Both messages render: history in response order, then the
    // buffered live update, nothing dropped.
    let mut rendered = Vec::new();
    for _ in 0..2 {
        if let FeedEvent::Appended(m) = events.recv().await.unwrap() {
            rendered.push(m.text);
        }
    }
    assert_eq!(rendered, ["hi", "yo"]);

    shutdown_tx.send(()).unwrap();
    let sync = handle.await.unwrap();
    assert_eq!(sync.feed().len(), 2);
}

#[tokio::test]
async fn empty_author_never_issues_a_network_request() {
    let mut server = MockServer::new();
    server.expect_submit().times(0);

    let (_tx, rx) = shutdown();
    let sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, rx);

    let result = sync.submit(&MessageDraft::new("", "hello")).await;
    assert!(matches!(
        result,
        Err(TransportError::Invalid(ValidationError::EmptyAuthor))
    ));
}

#[tokio::test]
async fn empty_text_never_issues_a_network_request() {
    let mut server = MockServer::new();
    server.expect_submit().times(0);

    let (_tx, rx) = shutdown();
    let sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, rx);

    let result = sync.submit(&MessageDraft::new("alice", "   ")).await;
    assert!(matches!(
        result,
        Err(TransportError::Invalid(ValidationError::EmptyText))
    ));
}

#[tokio::test]
async fn failed_submit_leaves_feed_unchanged() {
    let mut server = MockServer::new();
    server
        .expect_fetch_history()
        .returning(|_| Ok(vec![msg("a", "hi", 1), msg("b", "yo", 2)]));
    server
        .expect_submit()
        .times(1)
        .returning(|_, _| Err(TransportError::Http("connection reset".into())));

    let (_tx, rx) = shutdown();
    let mut sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, rx);
    sync.load_history().await.unwrap();

    let result = sync.submit(&MessageDraft::new("alice", "lost")).await;
    assert!(result.is_err());
    assert_eq!(sync.feed().len(), 2);
}

#[tokio::test]
async fn successful_submit_does_not_optimistically_append() {
    let mut server = MockServer::new();
    server
        .expect_submit()
        .withf(|scope, draft| {
            *scope == FeedScope::Global && draft.author == "alice" && draft.text == "hello"
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let (_tx, rx) = shutdown();
    let sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, rx);

    sync.submit(&MessageDraft::new("alice", "hello")).await.unwrap();

    // Visible only once the server echoes it over the push channel.
    assert!(sync.feed().is_empty());
}

#[tokio::test]
async fn room_scope_joins_before_subscribing() {
    let (live_tx, _) = broadcast::channel(16);

    let mut server = MockServer::new();
    server
        .expect_join()
        .with(eq(7))
        .times(1)
        .returning(|_| Ok(()));
    server
        .expect_subscribe()
        .with(eq(FeedScope::Room(7)))
        .returning(move |_| live_tx.subscribe());
    server
        .expect_fetch_history()
        .with(eq(FeedScope::Room(7)))
        .returning(|_| Ok(vec![]));

    let (shutdown_tx, shutdown_rx) = shutdown();
    let mut sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Room(7), shutdown_rx);

    let handle = tokio::spawn(async move { sync.run().await });

    // Give the loop a chance to wire up, then stop it.
    tokio::task::yield_now().await;
    shutdown_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn queued_draft_submission_failure_is_reported_not_fatal() {
    let (live_tx, _) = broadcast::channel(16);

    let mut server = MockServer::new();
    server.expect_fetch_history().returning(|_| Ok(vec![]));
    server
        .expect_subscribe()
        .returning(move |_| live_tx.subscribe());
    server
        .expect_submit()
        .times(1)
        .returning(|_, _| Err(TransportError::Http("boom".into())));

    let (shutdown_tx, shutdown_rx) = shutdown();
    let mut sync = FeedSynchronizer::new(Arc::new(server), FeedScope::Global, shutdown_rx);
    let mut events = sync.events();
    let drafts = sync.submitter();

    let handle = tokio::spawn(async move {
        let _ = sync.run().await;
        sync
    });

    drafts.send(MessageDraft::new("alice", "hello")).unwrap();

    match events.recv().await.unwrap() {
        FeedEvent::Error(reason) => assert!(reason.contains("boom")),
        other => panic!("expected error event, got {other:?}"),
    }

    shutdown_tx.send(()).unwrap();
    let sync = handle.await.unwrap();
    assert!(sync.feed().is_empty());
}

// ---- Chat Directory Tests ----

#[tokio::test]
async fn directory_lists_chats_in_server_order() {
    let mut dir = MockDir::new();
    dir.expect_list_chats().returning(|| {
        Ok(vec![
            Chat { id: 1, name: "general".into() },
            Chat { id: 2, name: "random".into() },
        ])
    });

    let chats = ChatDirectory::new(Arc::new(dir));
    let rooms = chats.list().await.unwrap();

    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].name, "general");
    assert_eq!(rooms[1].id, 2);
}

#[tokio::test]
async fn empty_chat_name_never_issues_a_network_request() {
    let mut dir = MockDir::new();
    dir.expect_create_chat().times(0);

    let chats = ChatDirectory::new(Arc::new(dir));
    let result = chats.create("   ").await;

    assert!(matches!(
        result,
        Err(TransportError::Invalid(ValidationError::EmptyChatName))
    ));
}

#[tokio::test]
async fn create_chat_trims_name_and_returns_assigned_id() {
    let mut dir = MockDir::new();
    dir.expect_create_chat()
        .with(eq("standup"))
        .times(1)
        .returning(|name| {
            Ok(Chat {
                id: 42,
                name: name.to_string(),
            })
        });

    let chats = ChatDirectory::new(Arc::new(dir));
    let chat = chats.create("  standup  ").await.unwrap();

    assert_eq!(chat.id, 42);
    assert_eq!(chat.name, "standup");
}
