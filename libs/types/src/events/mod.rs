//! Typed live-timing events
//!
//! One record per supported topic, decoded from the raw feed payloads by the
//! `codec` crate. All records are immutable value objects.

mod clock;
mod driver_list;
mod heartbeat;
mod lap_count;
mod pit_stops;
mod race_control;
mod session_info;
mod team_radio;
mod timing_app;
mod timing_stats;
mod track_status;
mod weather;

pub use clock::ExtrapolatedClock;
pub use driver_list::{Driver, DriverList};
pub use heartbeat::Heartbeat;
pub use lap_count::LapCount;
pub use pit_stops::{PitStopEntry, PitStopSeries, PitStopTime};
pub use race_control::{RaceControlMessage, RaceControlMessages};
pub use session_info::{Circuit, Country, Meeting, SessionInfo};
pub use team_radio::{TeamRadio, TeamRadioCapture};
pub use timing_app::{DriverStints, Stint, TimingAppData};
pub use timing_stats::{DriverTimingStats, PersonalBestLapTime, Stat, TimingStats};
pub use track_status::TrackStatus;
pub use weather::WeatherData;

use crate::{RawEvent, Topic};
use serde::{Deserialize, Serialize};

/// A decoded feed event, polymorphic over all supported topics.
///
/// Every variant carries its topic discriminant explicitly via
/// [`FeedEvent::topic`]; [`FeedEvent::Raw`] is the universal fallback for
/// unknown topics and failed decodes and preserves the original payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedEvent {
    /// Periodic liveness message
    Heartbeat(Heartbeat),
    /// Weather and track conditions
    Weather(WeatherData),
    /// Driver roster
    DriverList(DriverList),
    /// Track flag condition
    TrackStatus(TrackStatus),
    /// Session metadata
    SessionInfo(SessionInfo),
    /// Race control announcements
    RaceControl(RaceControlMessages),
    /// Team radio captures
    TeamRadio(TeamRadio),
    /// Extrapolated session clock
    ExtrapolatedClock(ExtrapolatedClock),
    /// Lap counter
    LapCount(LapCount),
    /// Tyre stints and strategy
    TimingApp(TimingAppData),
    /// Per-driver timing statistics
    TimingStats(TimingStats),
    /// Pit stop series
    PitStops(PitStopSeries),
    /// Undecoded fallback carrying the original payload
    Raw(RawEvent),
}

impl FeedEvent {
    /// The wire-level topic string this event was decoded from.
    pub fn topic(&self) -> &str {
        match self {
            FeedEvent::Heartbeat(_) => Topic::Heartbeat.wire_name(),
            FeedEvent::Weather(_) => Topic::WeatherData.wire_name(),
            FeedEvent::DriverList(_) => Topic::DriverList.wire_name(),
            FeedEvent::TrackStatus(_) => Topic::TrackStatus.wire_name(),
            FeedEvent::SessionInfo(_) => Topic::SessionInfo.wire_name(),
            FeedEvent::RaceControl(_) => Topic::RaceControlMessages.wire_name(),
            FeedEvent::TeamRadio(_) => Topic::TeamRadio.wire_name(),
            FeedEvent::ExtrapolatedClock(_) => Topic::ExtrapolatedClock.wire_name(),
            FeedEvent::LapCount(_) => Topic::LapCount.wire_name(),
            FeedEvent::TimingApp(_) => Topic::TimingAppData.wire_name(),
            FeedEvent::TimingStats(_) => Topic::TimingStats.wire_name(),
            FeedEvent::PitStops(_) => Topic::PitStopSeries.wire_name(),
            FeedEvent::Raw(raw) => &raw.topic,
        }
    }

    /// Whether this event is the undecoded raw fallback.
    pub fn is_raw(&self) -> bool {
        matches!(self, FeedEvent::Raw(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_variant_reports_its_own_topic() {
        let event = FeedEvent::Raw(RawEvent::now("CarData.z", json!("opaque")));
        assert_eq!(event.topic(), "CarData.z");
        assert!(event.is_raw());
    }

    #[test]
    fn test_typed_variant_reports_wire_topic() {
        let event = FeedEvent::LapCount(LapCount {
            current_lap: 3,
            total_laps: 71,
        });
        assert_eq!(event.topic(), "LapCount");
        assert!(!event.is_raw());
    }
}
