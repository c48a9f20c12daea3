use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single captured team radio clip.
///
/// Sample entry:
///
/// ```json
/// {
///     "Utc": "2025-10-03T13:07:24.5595691Z",
///     "RacingNumber": "30",
///     "Path": "TeamRadio/LIALAW01_30_20251003_210721.mp3"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRadioCapture {
    /// When the clip was recorded
    pub datetime_utc: Option<DateTime<Utc>>,
    /// Racing number of the driver on the radio
    pub racing_number: u32,
    /// Relative path of the audio file on the feed
    pub path: String,
}

/// Team radio captures published for the session, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRadio {
    /// The captured clips
    pub captures: Vec<TeamRadioCapture>,
}
