//! End-to-end tests for the connection manager and event pipeline, driven
//! by a scripted fake transport. Time is paused, so backoff and idle-timeout
//! delays auto-advance.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use mock_responder::{FailingSender, MemoryInvitees, RecordingSender, StubCards};
use responder_core::{Dialogue, ReplyDispatcher};
use stream_client::{StreamError, StreamMessage};
use stream_listener::{
    ClassifierConfig, ConnectionManager, DedupGate, EventClassifier, EventProcessor, EventSink,
    ManagerConfig, MemoryMarkStore, ProcessOutcome, StreamTransport,
};

/// One scripted connection attempt.
enum Connect {
    /// The connect itself fails.
    Fail,
    /// Deliver these messages, then the stream ends.
    Deliver(Vec<Result<StreamMessage, StreamError>>),
    /// Deliver these messages, then hang (triggers the idle timeout).
    DeliverThenHang(Vec<Result<StreamMessage, StreamError>>),
}

/// A transport that replays a script of connection attempts. Once the script
/// is exhausted, connects hang until shutdown.
#[derive(Clone)]
struct FakeTransport {
    script: Arc<Mutex<VecDeque<Connect>>>,
}

impl FakeTransport {
    fn new(script: Vec<Connect>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
        }
    }
}

#[async_trait]
impl StreamTransport for FakeTransport {
    async fn connect(
        &self,
    ) -> Result<BoxStream<'static, Result<StreamMessage, StreamError>>, StreamError> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            None => futures::future::pending().await,
            Some(Connect::Fail) => Err(StreamError::Connection("scripted failure".to_string())),
            Some(Connect::Deliver(messages)) => Ok(futures::stream::iter(messages).boxed()),
            Some(Connect::DeliverThenHang(messages)) => Ok(futures::stream::iter(messages)
                .chain(futures::stream::pending())
                .boxed()),
        }
    }
}

fn addressed_event(id: u64, username: &str, body: &str) -> StreamMessage {
    event(id, username, body, &["addressed_bot"])
}

fn area_event(id: u64, username: &str, body: &str) -> StreamMessage {
    event(id, username, body, &["area_city"])
}

fn event(id: u64, username: &str, body: &str, tags: &[&str]) -> StreamMessage {
    let rules: Vec<String> = tags
        .iter()
        .map(|t| format!(r#"{{"tag":"{}"}}"#, t))
        .collect();
    let json = format!(
        r#"{{
            "id": "tag:search.upstream.com,2005:{}",
            "body": "{}",
            "actor": {{"preferredUsername": "{}"}},
            "gnip": {{"matching_rules": [{}]}}
        }}"#,
        id,
        body,
        username,
        rules.join(",")
    );
    StreamMessage::Activity(serde_json::from_str(&json).unwrap())
}

struct Harness {
    sender: RecordingSender,
    store: MemoryMarkStore,
}

impl Harness {
    /// Build a manager over the scripted transport and run it to completion
    /// (the shutdown timer fires once the script is exhausted).
    async fn run(script: Vec<Connect>) -> Self {
        Self::run_with_config(
            script,
            ManagerConfig {
                initial_backoff: Duration::from_secs(1),
                max_backoff: Duration::from_secs(2),
                idle_timeout: Duration::from_secs(60),
            },
        )
        .await
    }

    async fn run_with_config(script: Vec<Connect>, config: ManagerConfig) -> Self {
        let sender = RecordingSender::new();
        let store = MemoryMarkStore::default();

        let dialogue = Dialogue::new("id")
            .with_welcome("id", "Halo!")
            .with_welcome("en", "Hello!")
            .with_card_request("id", "Gunakan link ini:")
            .with_card_request("en", "Use this link:");
        let dispatcher = ReplyDispatcher::new(
            sender.clone(),
            MemoryInvitees::new(),
            StubCards::default(),
            dialogue,
        );
        let processor = EventProcessor::new(
            DedupGate::new(store.clone()),
            EventClassifier::new(ClassifierConfig::default()),
            dispatcher,
        );

        let manager = ConnectionManager::new(FakeTransport::new(script), processor, sender.clone(), config);
        manager
            .run_with_shutdown(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            })
            .await
            .unwrap();

        Self { sender, store }
    }
}

#[tokio::test(start_paused = true)]
async fn events_flow_through_dedup_classify_dispatch() {
    let harness = Harness::run(vec![Connect::Deliver(vec![
        Ok(addressed_event(1, "asker", "banjir tolong")),
        Ok(StreamMessage::Keepalive),
        Ok(area_event(2, "local", "just chatting")),
        Ok(addressed_event(1, "asker", "banjir tolong")), // replayed
    ])])
    .await;

    let replies = harness.sender.replies();
    assert_eq!(replies.len(), 2);

    // Addressed flood request gets the card link.
    assert_eq!(replies[0].recipient, "asker");
    assert_eq!(replies[0].in_reply_to, 1);
    assert!(replies[0].text.contains("Gunakan link ini:"));
    assert!(replies[0].text.contains("/location"));

    // Area-only event gets the welcome.
    assert_eq!(replies[1].recipient, "local");
    assert_eq!(replies[1].text, "Halo!");

    assert_eq!(harness.store.current(), 2);
}

#[tokio::test(start_paused = true)]
async fn malformed_event_does_not_break_the_stream() {
    let bad = StreamMessage::Activity(
        serde_json::from_str(
            r#"{"id": "garbage", "actor": {"preferredUsername": "x"}, "body": "banjir"}"#,
        )
        .unwrap(),
    );

    let harness = Harness::run(vec![Connect::Deliver(vec![
        Ok(bad),
        Ok(addressed_event(3, "asker", "flood please")),
    ])])
    .await;

    let replies = harness.sender.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].in_reply_to, 3);
    assert_eq!(harness.store.current(), 3);
}

#[tokio::test(start_paused = true)]
async fn backfilled_replays_are_rejected_across_reconnects() {
    let harness = Harness::run(vec![
        Connect::Deliver(vec![Ok(addressed_event(5, "asker", "banjir"))]),
        // Reconnect backfill replays event 5 before delivering 6.
        Connect::Deliver(vec![
            Ok(addressed_event(5, "asker", "banjir")),
            Ok(addressed_event(6, "asker", "banjir lagi")),
        ]),
    ])
    .await;

    let ids: Vec<u64> = harness
        .sender
        .replies()
        .iter()
        .map(|r| r.in_reply_to)
        .collect();
    assert_eq!(ids, vec![5, 6]);
    assert_eq!(harness.store.current(), 6);
}

#[tokio::test(start_paused = true)]
async fn outage_notice_fires_once_and_rearms_after_ready() {
    // With initial 1s and max 2s, the second consecutive failure is capped
    // and notifies. After a Ready interlude the counter starts over.
    let harness = Harness::run(vec![
        Connect::Fail,
        Connect::Fail, // first notice
        Connect::Fail,
        Connect::DeliverThenHang(vec![Ok(StreamMessage::Keepalive)]), // Ready, then idle timeout
        Connect::Fail, // second failure of the new outage: second notice
        Connect::Fail,
    ])
    .await;

    let notices = harness.sender.admin_notices();
    assert_eq!(notices.len(), 2);
    assert!(notices[0].contains("offline"));
}

#[tokio::test]
async fn dispatch_failure_still_counts_event_as_seen() {
    let store = MemoryMarkStore::default();
    let dialogue = Dialogue::new("id").with_card_request("id", "Gunakan link ini:");
    let dispatcher = ReplyDispatcher::new(
        FailingSender,
        MemoryInvitees::new(),
        StubCards::default(),
        dialogue,
    );
    let mut processor = EventProcessor::new(
        DedupGate::new(store.clone()),
        EventClassifier::new(ClassifierConfig::default()),
        dispatcher,
    );
    processor.reload_mark().await.unwrap();

    let outcome = processor
        .handle_message(addressed_event(9, "asker", "banjir"))
        .await;
    assert_eq!(outcome, ProcessOutcome::DispatchFailed);

    // The mark advanced before dispatch: the event stays seen even though
    // the reply never made it out.
    assert_eq!(store.current(), 9);
    assert_eq!(
        processor.handle_message(addressed_event(9, "asker", "banjir")).await,
        ProcessOutcome::Duplicate
    );
}

#[tokio::test(start_paused = true)]
async fn system_messages_are_skipped_without_replies() {
    let harness = Harness::run(vec![Connect::Deliver(vec![
        Ok(StreamMessage::System(
            r#"{"info":{"message":"Replay Request Completed"}}"#.to_string(),
        )),
        Ok(StreamMessage::Keepalive),
    ])])
    .await;

    assert!(harness.sender.replies().is_empty());
    assert_eq!(harness.store.current(), 0);
}
