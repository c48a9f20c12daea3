//! # RacePulse Codec - Wire Normalization and Event Decoding
//!
//! ## Purpose
//!
//! Transforms raw live-timing frames into typed [`types::FeedEvent`]s. Two
//! stages:
//!
//! 1. **Envelope normalization** ([`normalize_frame`]): the feed delivers at
//!    least three structurally different envelope shapes - flat
//!    `{Type, Json, DateTime}` objects (alone or in arrays), hub bundles
//!    `{"M": [{"M": "feed", "A": [topic, payload, ts]}]}` and initial-state
//!    maps `{"R": {topic: payload}}`. All of them are flattened, in order,
//!    into a sequence of [`types::RawEvent`]s.
//! 2. **Decoding** ([`DecoderRegistry`]): a registry lookup per topic invokes
//!    the matching [`Decode`] implementation. Unknown topics and decoder
//!    failures never fail the stream - they downgrade to the raw fallback
//!    event, preserving the original payload.
//!
//! ## Architecture Role
//!
//! ```text
//! WebSocket frame → [normalize_frame] → RawEvent* → [DecoderRegistry] → FeedEvent*
//! ```
//!
//! The registry is built once at startup from an ordered list of
//! `(topic, decoder)` pairs and is read-only afterwards, so concurrent reads
//! need no locking.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decoders;
pub mod envelope;
pub mod error;
pub mod registry;

pub use envelope::{normalize_frame, subscribe_message, HUB_DATA, HUB_NAME};
pub use error::CodecError;
pub use registry::{Decode, DecoderRegistry};
