use serde::{Deserialize, Serialize};

/// Lap counter for the session.
///
/// Sample payload: `{"CurrentLap": 3, "TotalLaps": 71, "_kf": true}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapCount {
    /// Current lap number
    pub current_lap: u32,
    /// Total scheduled laps
    pub total_laps: u32,
}

impl LapCount {
    /// Laps remaining in the session.
    pub fn laps_remaining(&self) -> u32 {
        self.total_laps.saturating_sub(self.current_lap)
    }
}
