use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single tyre stint completed by a driver.
///
/// Sample entry:
///
/// ```json
/// {
///     "LapFlags": 0,
///     "Compound": "MEDIUM",
///     "New": "true",
///     "TyresNotChanged": "0",
///     "TotalLaps": 8,
///     "StartLaps": 0,
///     "LapTime": "1:32.345",
///     "LapNumber": 6
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stint {
    /// Numeric stint state flags
    pub lap_flags: u32,
    /// Tyre compound ("SOFT", "MEDIUM", "HARD", ...)
    pub compound: String,
    /// Whether the tyres were new at the start of the stint
    pub new: bool,
    /// Whether tyres were reused from a previous stint
    pub tyres_not_changed: bool,
    /// Total laps completed on this set
    pub total_laps: u32,
    /// Lap number where the stint began
    pub start_laps: u32,
    /// Best lap time within the stint, "M:SS.mmm" as delivered
    pub lap_time: String,
    /// Last lap number of the stint
    pub lap_number: u32,
}

/// Tyre stint history for a single driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStints {
    /// The driver's racing number
    pub racing_number: u32,
    /// Display line index in the timing layout
    pub line: u32,
    /// Stints keyed by their feed index ("0", "1", ...)
    pub stints: BTreeMap<String, Stint>,
}

/// Strategy and tyre data for all drivers in the session.
///
/// Sample payload: `{"Lines": {"1": {"RacingNumber": "1", "Stints": ...}, ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingAppData {
    /// Per-driver stint data keyed by racing number
    pub lines: BTreeMap<String, DriverStints>,
}
