//! Lifecycle tests against a scripted transport
//!
//! These run under paused time, so backoff delays and keepalive intervals
//! elapse instantly while ordering is preserved.

use async_trait::async_trait;
use feed_service::{
    ConnectionState, FeedConfig, FeedConnection, FeedError, FeedEvent, FeedSubscriber,
    FeedTransport, LiveTimingClient, NegotiatedSession, Topic,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What one connection attempt should do.
enum Script {
    FailNegotiate,
    FailConnect,
    Serve { frames: Vec<String>, then: End },
}

/// What a served connection does after its frames are drained.
#[derive(Clone, Copy)]
enum End {
    CleanClose,
    Pend,
}

#[derive(Default)]
struct MockTransport {
    scripts: Mutex<VecDeque<Script>>,
    sent: Arc<Mutex<Vec<Value>>>,
    negotiations: AtomicUsize,
    connects: AtomicUsize,
}

impl MockTransport {
    fn with_scripts(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            ..Self::default()
        }
    }

    fn sent_messages(&self) -> Vec<Value> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl FeedTransport for MockTransport {
    async fn negotiate(&self, _config: &FeedConfig) -> feed_service::Result<NegotiatedSession> {
        // Yield point so state watchers observe Negotiating before Connecting.
        tokio::time::sleep(Duration::from_millis(1)).await;
        self.negotiations.fetch_add(1, Ordering::SeqCst);
        if matches!(self.scripts.lock().front(), Some(Script::FailNegotiate)) {
            self.scripts.lock().pop_front();
            return Err(FeedError::Negotiation {
                reason: "scripted failure".to_string(),
            });
        }
        Ok(NegotiatedSession {
            token: "abc123".to_string(),
            cookie: Some("GCLB=abc".to_string()),
        })
    }

    async fn connect(
        &self,
        _config: &FeedConfig,
        session: &NegotiatedSession,
    ) -> feed_service::Result<Box<dyn FeedConnection>> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        self.connects.fetch_add(1, Ordering::SeqCst);
        assert_eq!(session.token, "abc123");
        match self.scripts.lock().pop_front() {
            Some(Script::FailConnect) => Err(FeedError::Connection {
                reason: "scripted failure".to_string(),
            }),
            Some(Script::Serve { frames, then }) => Ok(Box::new(MockConnection {
                frames: frames.into(),
                then,
                sent: Arc::clone(&self.sent),
            })),
            // Out of script; pend forever after a clean close.
            _ => Ok(Box::new(MockConnection {
                frames: VecDeque::new(),
                then: End::Pend,
                sent: Arc::clone(&self.sent),
            })),
        }
    }
}

struct MockConnection {
    frames: VecDeque<String>,
    then: End,
    sent: Arc<Mutex<Vec<Value>>>,
}

#[async_trait]
impl FeedConnection for MockConnection {
    async fn send_json(&mut self, message: &Value) -> feed_service::Result<()> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        self.sent.lock().push(message.clone());
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<feed_service::Result<String>> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        match self.frames.pop_front() {
            Some(frame) => Some(Ok(frame)),
            None => match self.then {
                End::CleanClose => None,
                End::Pend => std::future::pending().await,
            },
        }
    }

    async fn close(&mut self) {}
}

#[derive(Default)]
struct Recording {
    events: Mutex<Vec<FeedEvent>>,
}

impl FeedSubscriber for Recording {
    fn on_event(&self, event: &FeedEvent) -> anyhow::Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

struct Failing;

impl FeedSubscriber for Failing {
    fn on_event(&self, _event: &FeedEvent) -> anyhow::Result<()> {
        anyhow::bail!("scripted subscriber failure")
    }
}

fn test_config() -> FeedConfig {
    FeedConfig::default()
}

#[tokio::test(start_paused = true)]
async fn test_connect_subscribes_and_delivers_events_in_order() {
    let frames = vec![
        r#"{"Type":"Heartbeat","Json":{"Utc":"2025-01-01T00:00:00Z"}}"#.to_string(),
        r#"[
            {"Type":"LapCount","Json":{"CurrentLap":1,"TotalLaps":71}},
            {"Type":"LapCount","Json":{"CurrentLap":2,"TotalLaps":71}},
            {"Type":"LapCount","Json":{"CurrentLap":3,"TotalLaps":71}}
        ]"#
        .to_string(),
    ];
    let transport = Arc::new(MockTransport::with_scripts(vec![Script::Serve {
        frames,
        then: End::Pend,
    }]));

    let client = LiveTimingClient::with_transport(test_config(), transport.clone()).unwrap();
    let recording = Arc::new(Recording::default());
    client.attach(Arc::new(Failing));
    client.attach(recording.clone());

    client.connect().await;
    assert!(client.connected());

    // Let the connection task drain the scripted frames.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let sent = transport.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["H"], "Streaming");
    assert_eq!(sent[0]["M"], "Subscribe");
    assert_eq!(sent[0]["I"], 1);
    let topics = sent[0]["A"][0].as_array().unwrap();
    assert_eq!(topics.len(), Topic::ALL.len());
    assert_eq!(topics[0], "Heartbeat");

    let events = recording.events.lock().clone();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], FeedEvent::Heartbeat(_)));
    let laps: Vec<u32> = events[1..]
        .iter()
        .map(|e| match e {
            FeedEvent::LapCount(lap) => lap.current_lap,
            other => panic!("unexpected event: {other:?}"),
        })
        .collect();
    assert_eq!(laps, vec![1, 2, 3]);

    match client.latest("LapCount") {
        Some(FeedEvent::LapCount(lap)) => assert_eq!(lap.current_lap, 3),
        other => panic!("unexpected latest: {other:?}"),
    }

    client.disconnect().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_reconnects_with_backoff_after_failed_attempts() {
    let transport = Arc::new(MockTransport::with_scripts(vec![
        Script::FailConnect,
        Script::FailConnect,
        Script::Serve {
            frames: Vec::new(),
            then: End::Pend,
        },
    ]));

    let client = LiveTimingClient::with_transport(test_config(), transport.clone()).unwrap();

    let mut state_rx = client.state_watch();
    let states = Arc::new(Mutex::new(Vec::new()));
    let collector_states = Arc::clone(&states);
    let collector = tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = *state_rx.borrow();
            collector_states.lock().push(state);
            if state == ConnectionState::Connected {
                break;
            }
        }
    });

    client.connect().await;
    collector.await.unwrap();

    assert_eq!(transport.connects.load(Ordering::SeqCst), 3);
    let observed = states.lock().clone();
    assert_eq!(
        observed,
        vec![
            ConnectionState::Negotiating,
            ConnectionState::Connecting,
            ConnectionState::Reconnecting,
            ConnectionState::Negotiating,
            ConnectionState::Connecting,
            ConnectionState::Reconnecting,
            ConnectionState::Negotiating,
            ConnectionState::Connecting,
            ConnectionState::Subscribing,
            ConnectionState::Connected,
        ]
    );

    client.disconnect().await;
}

#[tokio::test(start_paused = true)]
async fn test_clean_close_triggers_resubscribe() {
    let transport = Arc::new(MockTransport::with_scripts(vec![
        Script::Serve {
            frames: vec![r#"{"Type":"LapCount","Json":{"CurrentLap":5,"TotalLaps":57}}"#.to_string()],
            then: End::CleanClose,
        },
        Script::Serve {
            frames: Vec::new(),
            then: End::Pend,
        },
    ]));

    let client = LiveTimingClient::with_transport(test_config(), transport.clone()).unwrap();
    client.connect().await;

    // First connection closes cleanly; the client should negotiate again
    // and send a fresh subscribe with the next sequence number.
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(transport.connects.load(Ordering::SeqCst), 2);
    let sent = transport.sent_messages();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["I"], 1);
    assert_eq!(sent[1]["I"], 2);
    assert!(client.connected());

    client.disconnect().await;
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_cancels_a_pending_connect() {
    // Empty script: every negotiation fails, with an hour-long backoff.
    let transport = Arc::new(MockTransport::with_scripts(vec![
        Script::FailNegotiate,
        Script::FailNegotiate,
        Script::FailNegotiate,
    ]));
    let mut config = test_config();
    config.initial_backoff_ms = 3_600_000;
    config.max_backoff_ms = 3_600_000;

    let client = Arc::new(LiveTimingClient::with_transport(config, transport).unwrap());
    let connecting = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.connect().await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    client.disconnect().await;

    connecting.await.unwrap();
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_keepalive_resends_subscribe_with_increasing_sequence() {
    let transport = Arc::new(MockTransport::with_scripts(vec![Script::Serve {
        frames: Vec::new(),
        then: End::Pend,
    }]));
    let mut config = test_config();
    config.keepalive_interval_secs = 60;

    let client = LiveTimingClient::with_transport(config, transport.clone()).unwrap();
    client.connect().await;

    tokio::time::sleep(Duration::from_secs(185)).await;

    let sent = transport.sent_messages();
    assert!(sent.len() >= 4, "expected keepalives, got {}", sent.len());
    let sequences: Vec<u64> = sent.iter().map(|m| m["I"].as_u64().unwrap()).collect();
    for pair in sequences.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    // Keepalives repeat the full subscription.
    assert_eq!(sent[1]["M"], "Subscribe");
    assert_eq!(
        sent[1]["A"][0].as_array().unwrap().len(),
        Topic::ALL.len()
    );

    client.disconnect().await;
}

#[tokio::test(start_paused = true)]
async fn test_malformed_frames_do_not_stop_the_stream() {
    let frames = vec![
        "not json at all".to_string(),
        r#"{"Type":"TrackStatus","Json":{"Status":"2","Message":"Yellow"}}"#.to_string(),
    ];
    let transport = Arc::new(MockTransport::with_scripts(vec![Script::Serve {
        frames,
        then: End::Pend,
    }]));

    let client = LiveTimingClient::with_transport(test_config(), transport).unwrap();
    let recording = Arc::new(Recording::default());
    client.attach(recording.clone());

    client.connect().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let events = recording.events.lock().clone();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], FeedEvent::TrackStatus(_)));
    assert!(client.connected());

    client.disconnect().await;
}

#[tokio::test(start_paused = true)]
async fn test_unknown_topic_arrives_as_raw() {
    let frames = vec![r#"{"Type":"CarData.z","Json":"opaque-blob"}"#.to_string()];
    let transport = Arc::new(MockTransport::with_scripts(vec![Script::Serve {
        frames,
        then: End::Pend,
    }]));

    let client = LiveTimingClient::with_transport(test_config(), transport).unwrap();
    let recording = Arc::new(Recording::default());
    client.attach(recording.clone());

    client.connect().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let events = recording.events.lock().clone();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_raw());
    assert_eq!(events[0].topic(), "CarData.z");

    match client.latest("CarData.z") {
        Some(FeedEvent::Raw(raw)) => assert_eq!(raw.payload, "opaque-blob"),
        other => panic!("unexpected latest: {other:?}"),
    }

    client.disconnect().await;
}
