//! Connection lifecycle management
//!
//! Drives the negotiate -> connect -> subscribe -> stream cycle and the
//! reconnection loop around it. Connection-scoped failures never escape this
//! module; they are logged and answered with exponential backoff.

use crate::client::Dispatcher;
use crate::transport::{FeedConnection, FeedTransport};
use crate::{FeedConfig, FeedError, Result};
use codec::{normalize_frame, subscribe_message, DecoderRegistry};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, timeout, Instant};
use tracing::{debug, info, warn};
use types::Topic;

/// Connection state for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected and not trying
    Disconnected,
    /// Requesting a session token
    Negotiating,
    /// Opening the streaming transport
    Connecting,
    /// Transport open, subscription in flight
    Subscribing,
    /// Subscribed and receiving
    Connected,
    /// Waiting out a backoff delay before the next attempt
    Reconnecting,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Negotiating => "negotiating",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Subscribing => "subscribing",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
        };
        write!(f, "{s}")
    }
}

/// Exponential backoff with optional additive jitter.
///
/// Delays follow `min(initial * factor^n, max)` and reset when a connection
/// is fully established.
pub(crate) struct Backoff {
    next: Duration,
    initial: Duration,
    max: Duration,
    factor: f64,
    jitter: Duration,
}

impl Backoff {
    pub(crate) fn new(initial: Duration, max: Duration, factor: f64, jitter: Duration) -> Self {
        Self {
            next: initial,
            initial,
            max,
            factor,
            jitter,
        }
    }

    pub(crate) fn from_config(config: &FeedConfig) -> Self {
        Self::new(
            config.initial_backoff(),
            config.max_backoff(),
            config.backoff_factor,
            Duration::from_millis(config.backoff_jitter_ms),
        )
    }

    /// The delay to wait before the next attempt. Advances the schedule,
    /// saturating at the maximum even for factors that overflow `Duration`.
    pub(crate) fn next_delay(&mut self) -> Duration {
        let current = self.next;
        self.next = Duration::try_from_secs_f64(self.next.as_secs_f64() * self.factor)
            .unwrap_or(self.max)
            .min(self.max);
        if self.jitter.is_zero() {
            current
        } else {
            let extra = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
            current + Duration::from_millis(extra)
        }
    }

    pub(crate) fn reset(&mut self) {
        self.next = self.initial;
    }
}

enum SessionEnd {
    Lost,
    Shutdown,
}

/// Owns one connection attempt cycle at a time. Spawned by the client and
/// runs until shutdown is signalled.
pub(crate) struct ConnectionManager {
    config: FeedConfig,
    transport: Arc<dyn FeedTransport>,
    registry: Arc<DecoderRegistry>,
    dispatcher: Arc<Dispatcher>,
    state_tx: watch::Sender<ConnectionState>,
    shutdown_rx: watch::Receiver<bool>,
    sequence: u64,
}

impl ConnectionManager {
    pub(crate) fn new(
        config: FeedConfig,
        transport: Arc<dyn FeedTransport>,
        registry: Arc<DecoderRegistry>,
        dispatcher: Arc<Dispatcher>,
        state_tx: watch::Sender<ConnectionState>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            transport,
            registry,
            dispatcher,
            state_tx,
            shutdown_rx,
            sequence: 0,
        }
    }

    /// Run the lifecycle until shutdown.
    pub(crate) async fn run(mut self) {
        let mut backoff = Backoff::from_config(&self.config);

        loop {
            if *self.shutdown_rx.borrow() {
                break;
            }

            let mut shutdown = self.shutdown_rx.clone();
            let established = tokio::select! {
                result = self.establish() => result,
                _ = wait_shutdown(&mut shutdown) => break,
            };

            match established {
                Ok(mut conn) => {
                    self.set_state(ConnectionState::Connected);
                    backoff.reset();
                    info!("feed connected");

                    let end = self.run_connected(conn.as_mut()).await;
                    conn.close().await;

                    match end {
                        SessionEnd::Shutdown => break,
                        SessionEnd::Lost => {}
                    }
                }
                Err(e) => {
                    warn!(error = %e, "connection attempt failed");
                }
            }

            self.set_state(ConnectionState::Reconnecting);
            let delay = backoff.next_delay();
            debug!(delay_ms = delay.as_millis() as u64, "waiting before reconnect");

            let mut shutdown = self.shutdown_rx.clone();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = wait_shutdown(&mut shutdown) => break,
            }
        }

        self.set_state(ConnectionState::Disconnected);
        info!("feed stopped");
    }

    /// Negotiate, connect and subscribe. Returns the live connection.
    async fn establish(&mut self) -> Result<Box<dyn FeedConnection>> {
        self.set_state(ConnectionState::Negotiating);
        let session = timeout(
            self.config.negotiate_timeout(),
            self.transport.negotiate(&self.config),
        )
        .await
        .map_err(|_| FeedError::Timeout {
            operation: "negotiation",
            timeout_ms: self.config.negotiate_timeout_ms,
        })??;

        self.set_state(ConnectionState::Connecting);
        let mut conn = timeout(
            self.config.connect_timeout(),
            self.transport.connect(&self.config, &session),
        )
        .await
        .map_err(|_| FeedError::Timeout {
            operation: "connect",
            timeout_ms: self.config.connect_timeout_ms,
        })??;

        self.set_state(ConnectionState::Subscribing);
        conn.send_json(&self.subscribe()).await?;
        Ok(conn)
    }

    /// Stream frames and send keepalive probes until the connection drops
    /// or shutdown is requested. Sends and receives are serialized on this
    /// task, so a keepalive can never interleave with a frame read.
    async fn run_connected(&mut self, conn: &mut dyn FeedConnection) -> SessionEnd {
        let period = self.config.keepalive_interval();
        let mut keepalive = interval_at(Instant::now() + period, period);
        let mut shutdown = self.shutdown_rx.clone();

        loop {
            tokio::select! {
                _ = wait_shutdown(&mut shutdown) => return SessionEnd::Shutdown,
                _ = keepalive.tick() => {
                    debug!("sending keepalive");
                    if let Err(e) = conn.send_json(&self.subscribe()).await {
                        warn!(error = %e, "keepalive send failed");
                        return SessionEnd::Lost;
                    }
                }
                frame = conn.next_frame() => match frame {
                    Some(Ok(text)) => self.handle_frame(&text),
                    Some(Err(e)) => {
                        warn!(error = %e, "receive failed");
                        return SessionEnd::Lost;
                    }
                    None => {
                        info!("feed closed the connection");
                        return SessionEnd::Lost;
                    }
                },
            }
        }
    }

    /// Normalize one wire frame and push every event through the pipeline.
    /// A malformed frame is dropped with a warning; the stream continues.
    fn handle_frame(&self, text: &str) {
        match normalize_frame(text) {
            Ok(raws) => {
                for raw in raws {
                    let event = self.registry.decode(raw);
                    self.dispatcher.dispatch(event);
                }
            }
            Err(e) => {
                warn!(error = %e, "dropping malformed frame");
            }
        }
    }

    fn subscribe(&mut self) -> serde_json::Value {
        self.sequence += 1;
        let topics: Vec<&str> = Topic::ALL.iter().map(|t| t.wire_name()).collect();
        subscribe_message(&self.config.hub, &topics, self.sequence)
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }
}

/// Resolve once the shutdown flag becomes true.
pub(crate) async fn wait_shutdown(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut backoff = Backoff::new(
            Duration::from_secs(5),
            Duration::from_secs(60),
            2.0,
            Duration::ZERO,
        );
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
        assert_eq!(backoff.next_delay(), Duration::from_secs(10));
        assert_eq!(backoff.next_delay(), Duration::from_secs(20));
        assert_eq!(backoff.next_delay(), Duration::from_secs(40));
        assert_eq!(backoff.next_delay(), Duration::from_secs(60));
        assert_eq!(backoff.next_delay(), Duration::from_secs(60));
    }

    #[test]
    fn test_backoff_resets_to_initial() {
        let mut backoff = Backoff::new(
            Duration::from_secs(5),
            Duration::from_secs(60),
            2.0,
            Duration::ZERO,
        );
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_extreme_factor_saturates_at_max() {
        let mut backoff = Backoff::new(
            Duration::from_secs(5),
            Duration::from_secs(60),
            f64::MAX,
            Duration::ZERO,
        );
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
        assert_eq!(backoff.next_delay(), Duration::from_secs(60));
        assert_eq!(backoff.next_delay(), Duration::from_secs(60));
    }

    #[test]
    fn test_backoff_jitter_stays_within_bound() {
        let mut backoff = Backoff::new(
            Duration::from_secs(5),
            Duration::from_secs(60),
            2.0,
            Duration::from_millis(500),
        );
        for _ in 0..20 {
            backoff.reset();
            let delay = backoff.next_delay();
            assert!(delay >= Duration::from_secs(5));
            assert!(delay <= Duration::from_millis(5500));
        }
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
        assert_eq!(ConnectionState::Reconnecting.to_string(), "reconnecting");
    }
}
