//! Topic decoder registry
//!
//! Maps wire-level topic strings to their decoders. Built once at startup
//! from an ordered list of `(topic, decoder)` pairs, read concurrently
//! afterwards. Decoding never fails the stream: unknown topics and decoder
//! errors downgrade to the raw fallback event.

use crate::decoders;
use crate::CodecError;
use std::collections::HashMap;
use types::{FeedEvent, RawEvent, Topic};

/// A pure, stateless converter from a raw event to its typed form.
///
/// Implementations must not retain state between calls and must be defensive
/// about field presence - the upstream schema is observed, not guaranteed.
pub trait Decode: Send + Sync {
    /// Decode a raw event into its typed variant.
    fn decode(&self, raw: &RawEvent) -> Result<FeedEvent, CodecError>;
}

/// Registry mapping topic strings to decoders.
pub struct DecoderRegistry {
    decoders: HashMap<String, Box<dyn Decode>>,
    // Registration order, used for the subscribe topic list
    order: Vec<String>,
}

impl DecoderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Create a registry from an ordered list of `(topic, decoder)` pairs.
    pub fn from_entries(entries: Vec<(String, Box<dyn Decode>)>) -> Self {
        let mut registry = Self::new();
        for (topic, decoder) in entries {
            registry.register(topic, decoder);
        }
        registry
    }

    /// Create a registry with decoders for every supported [`Topic`], in
    /// [`Topic::ALL`] order.
    pub fn with_defaults() -> Self {
        Self::from_entries(
            Topic::ALL
                .iter()
                .map(|&t| (t.wire_name().to_string(), decoders::for_topic(t)))
                .collect(),
        )
    }

    /// Insert or overwrite the decoder for a topic. Overwriting indicates a
    /// configuration conflict and is logged; the last registration wins.
    pub fn register(&mut self, topic: impl Into<String>, decoder: Box<dyn Decode>) {
        let topic = topic.into();
        if self.decoders.insert(topic.clone(), decoder).is_some() {
            tracing::warn!(topic = %topic, "overwriting existing decoder registration");
        } else {
            self.order.push(topic);
        }
    }

    /// Registered topics, in registration order.
    pub fn topics(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Number of registered decoders.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode a raw event. Never fails: if no decoder is registered for the
    /// topic, or the decoder errors, the raw event is returned as the
    /// fallback with its payload intact.
    pub fn decode(&self, raw: RawEvent) -> FeedEvent {
        let Some(decoder) = self.decoders.get(&raw.topic) else {
            tracing::debug!(topic = %raw.topic, "no decoder registered, passing through raw");
            return FeedEvent::Raw(raw);
        };

        match decoder.decode(&raw) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(topic = %raw.topic, error = %e, "decode failed, falling back to raw event");
                FeedEvent::Raw(raw)
            }
        }
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
