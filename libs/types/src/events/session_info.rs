use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host country of a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Feed-internal country key
    pub key: u32,
    /// ISO-style country code (e.g. "NED")
    pub code: String,
    /// Country name
    pub name: String,
}

/// Circuit a meeting is held at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Feed-internal circuit key
    pub key: u32,
    /// Short circuit name (e.g. "Zandvoort")
    pub short_name: String,
}

/// A race weekend / meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Feed-internal meeting key
    pub key: u32,
    /// Meeting name (e.g. "Dutch Grand Prix")
    pub name: String,
    /// Full official meeting name
    pub official_name: String,
    /// Location string (usually the town)
    pub location: String,
    /// Host country
    pub country: Country,
    /// Circuit
    pub circuit: Circuit,
}

/// Session metadata for the current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// The meeting this session belongs to
    pub meeting: Meeting,
    /// Feed-internal session key
    pub key: u32,
    /// Session type (e.g. "Practice", "Qualifying", "Race")
    pub kind: String,
    /// Session name (e.g. "Practice 1")
    pub name: String,
    /// Scheduled session start in local time, when carried
    pub start_date: Option<DateTime<Utc>>,
    /// Scheduled session end in local time, when carried
    pub end_date: Option<DateTime<Utc>>,
    /// Offset between local time and UTC, from the "HH:MM:SS" feed field
    pub gmt_offset: Duration,
    /// Archive path for this session on the feed
    pub path: String,
}
