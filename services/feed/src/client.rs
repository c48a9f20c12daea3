//! Public client surface and event dispatch
//!
//! [`LiveTimingClient`] owns the background lifecycle task; [`Dispatcher`]
//! fans decoded events out to subscribers and retains the latest event per
//! topic. A subscriber that returns an error is logged and skipped; it never
//! disturbs the stream or the other subscribers.

use crate::connection::{ConnectionManager, ConnectionState};
use crate::transport::{FeedTransport, WebSocketTransport};
use crate::{FeedConfig, FeedError, Result};
use codec::DecoderRegistry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;
use types::FeedEvent;

/// Receives every event that flows through the pipeline.
///
/// Callbacks run on the connection task and should return quickly.
pub trait FeedSubscriber: Send + Sync {
    /// Handle one event. Errors are logged and do not affect delivery to
    /// other subscribers.
    fn on_event(&self, event: &FeedEvent) -> anyhow::Result<()>;
}

/// Fans events out to subscribers and caches the latest event per topic.
pub(crate) struct Dispatcher {
    subscribers: RwLock<Vec<Arc<dyn FeedSubscriber>>>,
    latest: DashMap<String, FeedEvent>,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            latest: DashMap::new(),
        }
    }

    /// Add a subscriber. Attaching the same subscriber twice is a no-op.
    pub(crate) fn attach(&self, subscriber: Arc<dyn FeedSubscriber>) {
        let mut subscribers = self.subscribers.write();
        if subscribers.iter().any(|s| Arc::ptr_eq(s, &subscriber)) {
            return;
        }
        subscribers.push(subscriber);
    }

    /// Remove a subscriber by identity.
    pub(crate) fn detach(&self, subscriber: &Arc<dyn FeedSubscriber>) {
        self.subscribers
            .write()
            .retain(|s| !Arc::ptr_eq(s, subscriber));
    }

    /// Record the event as the latest for its topic, then deliver it to
    /// every subscriber in attach order.
    pub(crate) fn dispatch(&self, event: FeedEvent) {
        self.latest.insert(event.topic().to_string(), event.clone());

        let snapshot: Vec<Arc<dyn FeedSubscriber>> = self.subscribers.read().clone();
        for subscriber in snapshot {
            if let Err(e) = subscriber.on_event(&event) {
                warn!(topic = event.topic(), error = %e, "subscriber failed");
            }
        }
    }

    /// The most recent event seen for a topic, if any.
    pub(crate) fn latest(&self, topic: &str) -> Option<FeedEvent> {
        self.latest.get(topic).map(|entry| entry.value().clone())
    }
}

/// Long-lived client for the live-timing feed.
///
/// `connect()` spawns a background task that maintains the connection for
/// the life of the client, reconnecting with backoff on any failure.
/// `disconnect()` stops it. Events arrive through attached
/// [`FeedSubscriber`]s.
pub struct LiveTimingClient {
    config: FeedConfig,
    transport: Arc<dyn FeedTransport>,
    registry: Arc<DecoderRegistry>,
    dispatcher: Arc<Dispatcher>,
    state_tx: watch::Sender<ConnectionState>,
    state_rx: watch::Receiver<ConnectionState>,
    shutdown_tx: watch::Sender<bool>,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl LiveTimingClient {
    /// Create a client using the production WebSocket transport.
    pub fn new(config: FeedConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(WebSocketTransport::new()))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: FeedConfig, transport: Arc<dyn FeedTransport>) -> Result<Self> {
        Self::with_registry(config, transport, DecoderRegistry::with_defaults())
    }

    /// Create a client with a custom transport and decoder registry.
    pub fn with_registry(
        config: FeedConfig,
        transport: Arc<dyn FeedTransport>,
        registry: DecoderRegistry,
    ) -> Result<Self> {
        config.validate().map_err(FeedError::Configuration)?;
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (shutdown_tx, _) = watch::channel(false);
        Ok(Self {
            config,
            transport,
            registry: Arc::new(registry),
            dispatcher: Arc::new(Dispatcher::new()),
            state_tx,
            state_rx,
            shutdown_tx,
            task: tokio::sync::Mutex::new(None),
        })
    }

    /// Attach a subscriber to the event stream.
    pub fn attach(&self, subscriber: Arc<dyn FeedSubscriber>) {
        self.dispatcher.attach(subscriber);
    }

    /// Detach a previously attached subscriber.
    pub fn detach(&self, subscriber: &Arc<dyn FeedSubscriber>) {
        self.dispatcher.detach(subscriber);
    }

    /// The most recent event seen for a topic, if any.
    pub fn latest(&self, topic: &str) -> Option<FeedEvent> {
        self.dispatcher.latest(topic)
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Whether the feed is currently subscribed and receiving.
    pub fn connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// A watch receiver for observing state transitions.
    pub fn state_watch(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Start the connection lifecycle and wait until the feed is connected
    /// for the first time. Returns immediately if already running.
    ///
    /// After this returns the background task keeps the connection alive,
    /// reconnecting as needed, until [`disconnect`](Self::disconnect).
    pub async fn connect(&self) {
        {
            let mut task = self.task.lock().await;
            if let Some(handle) = task.as_ref() {
                if !handle.is_finished() {
                    return;
                }
            }

            self.shutdown_tx.send_replace(false);
            let manager = ConnectionManager::new(
                self.config.clone(),
                Arc::clone(&self.transport),
                Arc::clone(&self.registry),
                Arc::clone(&self.dispatcher),
                self.state_tx.clone(),
                self.shutdown_tx.subscribe(),
            );
            *task = Some(tokio::spawn(manager.run()));
        }

        let mut state = self.state_rx.clone();
        let mut shutdown = self.shutdown_tx.subscribe();
        loop {
            if *state.borrow_and_update() == ConnectionState::Connected {
                return;
            }
            if *shutdown.borrow_and_update() {
                return;
            }
            tokio::select! {
                changed = state.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }

    /// Stop the connection lifecycle and wait for the background task to
    /// finish. Idempotent.
    pub async fn disconnect(&self) {
        self.shutdown_tx.send_replace(true);
        let handle = self.task.lock().await.take();
        if let Some(handle) = handle {
            handle.await.ok();
        }
    }
}
