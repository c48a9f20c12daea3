//! Feed topic identifiers
//!
//! Each variant corresponds directly to the `Type` field of a raw feed
//! envelope. Topics not listed here still flow through the pipeline as plain
//! strings and surface as [`crate::RawEvent`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named category of telemetry messages on the live-timing feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Periodic liveness message from the feed
    Heartbeat,
    /// Weather and track conditions
    WeatherData,
    /// Driver roster for the session
    DriverList,
    /// Current track flag condition
    TrackStatus,
    /// Session metadata (meeting, circuit, schedule)
    SessionInfo,
    /// Race control announcements
    RaceControlMessages,
    /// Team radio audio captures
    TeamRadio,
    /// Extrapolated session clock
    ExtrapolatedClock,
    /// Current and total lap count
    LapCount,
    /// Tyre stint and strategy data
    TimingAppData,
    /// Per-driver timing statistics
    TimingStats,
    /// Pit stop series for all drivers
    PitStopSeries,
}

impl Topic {
    /// All supported topics, in the order they are registered and subscribed.
    pub const ALL: [Topic; 12] = [
        Topic::Heartbeat,
        Topic::WeatherData,
        Topic::DriverList,
        Topic::TrackStatus,
        Topic::SessionInfo,
        Topic::RaceControlMessages,
        Topic::TeamRadio,
        Topic::ExtrapolatedClock,
        Topic::LapCount,
        Topic::TimingAppData,
        Topic::TimingStats,
        Topic::PitStopSeries,
    ];

    /// The wire-level topic string as it appears in feed envelopes.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Topic::Heartbeat => "Heartbeat",
            Topic::WeatherData => "WeatherData",
            Topic::DriverList => "DriverList",
            Topic::TrackStatus => "TrackStatus",
            Topic::SessionInfo => "SessionInfo",
            Topic::RaceControlMessages => "RaceControlMessages",
            Topic::TeamRadio => "TeamRadio",
            Topic::ExtrapolatedClock => "ExtrapolatedClock",
            Topic::LapCount => "LapCount",
            Topic::TimingAppData => "TimingAppData",
            Topic::TimingStats => "TimingStats",
            Topic::PitStopSeries => "PitStopSeries",
        }
    }

    /// Resolve a wire-level topic string. Returns `None` for unknown topics;
    /// unknown is not an error, callers fall back to raw events.
    pub fn from_wire(value: &str) -> Option<Topic> {
        Topic::ALL.iter().copied().find(|t| t.wire_name() == value)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        for topic in Topic::ALL {
            assert_eq!(Topic::from_wire(topic.wire_name()), Some(topic));
        }
    }

    #[test]
    fn test_unknown_wire_name() {
        assert_eq!(Topic::from_wire("CarData.z"), None);
        assert_eq!(Topic::from_wire(""), None);
        // Topics are case-sensitive
        assert_eq!(Topic::from_wire("heartbeat"), None);
    }
}
