//! Feed Service - live-timing connection lifecycle and event dispatch
//!
//! ## Purpose
//!
//! Maintains a long-lived connection to the push-based live-timing feed:
//! negotiates a session, opens the streaming transport, subscribes to the
//! full topic set, keeps the session alive, and reconnects with exponential
//! backoff whenever anything fails. Decoded events are fanned out to
//! attached subscribers.
//!
//! ## Integration Points
//!
//! - **Input**: SignalR-style hub endpoint (HTTP negotiate + WebSocket)
//! - **Output**: [`FeedEvent`]s delivered to [`FeedSubscriber`]s
//! - **Codec**: frame normalization and decoding from the `codec` crate
//!
//! ## Design Rules
//!
//! - A running client never gives up: every connection-scoped failure is
//!   answered with backoff and retry, never an error to the caller.
//! - Subscriber failures are isolated; one bad subscriber cannot stall the
//!   stream or starve its peers.
//! - Sends and receives on a connection are serialized on one task, so
//!   keepalives never interleave with frame reads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod transport;

pub use client::{FeedSubscriber, LiveTimingClient};
pub use config::FeedConfig;
pub use connection::ConnectionState;
pub use error::{FeedError, Result};
pub use transport::{FeedConnection, FeedTransport, NegotiatedSession, WebSocketTransport};

pub use codec::DecoderRegistry;
pub use types::{FeedEvent, RawEvent, Topic};
