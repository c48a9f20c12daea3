//! Configuration for the feed client
//!
//! Environment-based configuration with defaults matching the public
//! live-timing deployment. All overrides use the `RACEPULSE_` prefix.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Feed client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// HTTP negotiation endpoint
    pub negotiate_url: String,

    /// WebSocket streaming endpoint
    pub connect_url: String,

    /// Hub name used in subscribe messages
    pub hub: String,

    /// Hub descriptor sent as the `connectionData` query parameter
    pub hub_data: String,

    /// Hub protocol version
    pub client_protocol: String,

    /// User-Agent header presented on negotiation and connect
    pub user_agent: String,

    /// Negotiation timeout in milliseconds
    pub negotiate_timeout_ms: u64,

    /// Transport connect timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Seconds between keepalive probes while connected
    pub keepalive_interval_secs: u64,

    /// Initial reconnection delay in milliseconds
    pub initial_backoff_ms: u64,

    /// Maximum reconnection delay in milliseconds
    pub max_backoff_ms: u64,

    /// Exponential backoff multiplier (>= 1)
    pub backoff_factor: f64,

    /// Upper bound of the uniform random addition to each reconnect delay,
    /// in milliseconds. Zero disables jitter.
    pub backoff_jitter_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            negotiate_url: "https://livetiming.formula1.com/signalr/negotiate".to_string(),
            connect_url: "wss://livetiming.formula1.com/signalr/connect".to_string(),
            hub: codec::HUB_NAME.to_string(),
            hub_data: codec::HUB_DATA.to_string(),
            client_protocol: "1.5".to_string(),
            user_agent: "BestHTTP".to_string(),
            negotiate_timeout_ms: 15000,
            connect_timeout_ms: 15000,
            keepalive_interval_secs: 300,
            initial_backoff_ms: 5000,
            max_backoff_ms: 60000,
            backoff_factor: 2.0,
            backoff_jitter_ms: 0,
        }
    }
}

impl FeedConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            negotiate_url: env::var("RACEPULSE_NEGOTIATE_URL").unwrap_or(defaults.negotiate_url),
            connect_url: env::var("RACEPULSE_CONNECT_URL").unwrap_or(defaults.connect_url),
            hub: env::var("RACEPULSE_HUB").unwrap_or(defaults.hub),
            hub_data: env::var("RACEPULSE_HUB_DATA").unwrap_or(defaults.hub_data),
            client_protocol: defaults.client_protocol,
            user_agent: env::var("RACEPULSE_USER_AGENT").unwrap_or(defaults.user_agent),
            negotiate_timeout_ms: env_u64("RACEPULSE_NEGOTIATE_TIMEOUT_MS")
                .unwrap_or(defaults.negotiate_timeout_ms),
            connect_timeout_ms: env_u64("RACEPULSE_CONNECT_TIMEOUT_MS")
                .unwrap_or(defaults.connect_timeout_ms),
            keepalive_interval_secs: env_u64("RACEPULSE_KEEPALIVE_SECS")
                .unwrap_or(defaults.keepalive_interval_secs),
            initial_backoff_ms: env_u64("RACEPULSE_INITIAL_BACKOFF_MS")
                .unwrap_or(defaults.initial_backoff_ms),
            max_backoff_ms: env_u64("RACEPULSE_MAX_BACKOFF_MS").unwrap_or(defaults.max_backoff_ms),
            backoff_factor: env::var("RACEPULSE_BACKOFF_FACTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.backoff_factor),
            backoff_jitter_ms: env_u64("RACEPULSE_BACKOFF_JITTER_MS")
                .unwrap_or(defaults.backoff_jitter_ms),
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.negotiate_url.is_empty() {
            return Err("negotiation URL cannot be empty".to_string());
        }
        if !self.connect_url.starts_with("ws://") && !self.connect_url.starts_with("wss://") {
            return Err("connect URL must start with ws:// or wss://".to_string());
        }
        if self.hub.is_empty() {
            return Err("hub name cannot be empty".to_string());
        }
        if self.backoff_factor < 1.0 {
            return Err("backoff factor must be >= 1".to_string());
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err("max backoff must be >= initial backoff".to_string());
        }
        if self.keepalive_interval_secs == 0 {
            return Err("keepalive interval must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Negotiation timeout as a [`Duration`].
    pub fn negotiate_timeout(&self) -> Duration {
        Duration::from_millis(self.negotiate_timeout_ms)
    }

    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Keepalive interval as a [`Duration`].
    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_interval_secs)
    }

    /// Initial backoff delay as a [`Duration`].
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Maximum backoff delay as a [`Duration`].
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
