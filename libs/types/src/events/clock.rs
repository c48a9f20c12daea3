use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The extrapolated session clock.
///
/// Sample payload:
/// `{"Utc": "2025-10-03T15:37:14.4783763Z", "Remaining": "00:45:00", "Extrapolating": false}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrapolatedClock {
    /// Current UTC time according to the timing system
    pub datetime_utc: Option<DateTime<Utc>>,
    /// Remaining session time
    pub remaining: Duration,
    /// True while the timing system is extrapolating (red flags, pauses)
    pub extrapolating: bool,
}
