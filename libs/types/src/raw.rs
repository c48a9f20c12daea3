//! Raw feed events
//!
//! The lowest-level representation of an inbound message, before any decoding.
//! Always constructible from any wire message, which makes it the universal
//! fallback when no decoder is registered or decoding fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw live-timing event exactly as received from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Wire-level topic string (the envelope `Type` field). Opaque and
    /// case-sensitive; may name a topic with no registered decoder.
    pub topic: String,
    /// The unparsed JSON payload as received.
    pub payload: Value,
    /// When the event was received (or the envelope timestamp, if carried).
    pub received_at: DateTime<Utc>,
}

impl RawEvent {
    /// Wrap a wire payload, stamping it with the current time.
    pub fn now(topic: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
            received_at: Utc::now(),
        }
    }

    /// Wrap a wire payload with an explicit timestamp (envelope `DateTime`).
    pub fn at(topic: impl Into<String>, payload: Value, received_at: DateTime<Utc>) -> Self {
        Self {
            topic: topic.into(),
            payload,
            received_at,
        }
    }
}
