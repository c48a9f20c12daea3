use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Details of a single pit stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitStopEntry {
    /// Driver's racing number
    pub racing_number: String,
    /// Stationary time, as delivered (e.g. "2.5")
    pub pit_stop_time: String,
    /// Total time spent in the pit lane
    pub pit_lane_time: String,
    /// Lap number of the stop
    pub lap: String,
}

/// A timestamped pit stop record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitStopTime {
    /// When the stop occurred
    pub timestamp_utc: Option<DateTime<Utc>>,
    /// The stop details
    pub pit_stop: PitStopEntry,
}

/// Pit stop history for all drivers.
///
/// The feed nests stops as driver -> lap -> record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitStopSeries {
    /// Nested mapping of racing number -> lap -> pit stop record
    pub pit_times: BTreeMap<String, BTreeMap<String, PitStopTime>>,
}
