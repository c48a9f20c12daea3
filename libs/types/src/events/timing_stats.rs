use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single ranked statistic such as a sector time or speed-trap value.
///
/// Sample entry: `{"Value": "27.019", "Position": 6}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// The measured value as delivered (e.g. "27.019" or "310")
    pub value: String,
    /// The driver's rank for this value (1 = best)
    pub position: u32,
}

/// A driver's personal best lap time. Embeds the ranked [`Stat`] rather than
/// extending it, so the lap annotation stays decoupled from the base shape.
///
/// Sample entry: `{"Value": "1:30.857", "Lap": 12, "Position": 3}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBestLapTime {
    /// The ranked lap time value
    pub stat: Stat,
    /// Lap number on which the personal best was set
    pub lap: u32,
}

/// Timing statistics for a single driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverTimingStats {
    /// The driver's racing number
    pub racing_number: u32,
    /// Display line index in the timing layout
    pub line: u32,
    /// Personal best lap time
    pub personal_best_lap_time: PersonalBestLapTime,
    /// Best speeds keyed by measurement point ("I1", "I2", "FL", "ST")
    pub best_speeds: BTreeMap<String, Stat>,
}

/// Timing statistics for all drivers in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    /// Per-driver statistics keyed by racing number
    pub lines: BTreeMap<String, DriverTimingStats>,
}
