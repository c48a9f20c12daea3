//! # RacePulse Types - Live-Timing Event Model
//!
//! ## Purpose
//!
//! Unified type system for the RacePulse live-timing feed client. Defines the
//! topic identifiers carried on the wire, the universal [`RawEvent`] fallback
//! representation, and the strongly-typed event records decoded from feed
//! payloads ([`FeedEvent`] and its per-topic variants).
//!
//! ## Integration Points
//!
//! - **Producers**: the `codec` crate constructs `RawEvent`s while normalizing
//!   wire frames and `FeedEvent`s while decoding them
//! - **Consumers**: `feed-service` dispatches `FeedEvent`s to subscribers and
//!   caches the latest event per topic
//!
//! ## Design Rules
//!
//! - Events are immutable value objects; once decoded they are never mutated
//! - Every event variant carries an explicit topic discriminant - consumers
//!   route on [`FeedEvent::topic`], never on structural probing
//! - Decoded records use composition over inheritance-style reuse (e.g.
//!   [`events::PersonalBestLapTime`] embeds a [`events::Stat`])
//! - Field extraction is lenient: the upstream schema is observed, not
//!   contractually guaranteed, so absent or malformed fields degrade to
//!   defaults instead of failing (see [`parse`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod events;
pub mod parse;
pub mod raw;
pub mod topic;

pub use events::FeedEvent;
pub use raw::RawEvent;
pub use topic::Topic;
