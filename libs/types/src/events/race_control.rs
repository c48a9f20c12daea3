use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single race control announcement.
///
/// Sample entry:
///
/// ```json
/// {
///     "Utc": "2025-10-03T13:40:00",
///     "Category": "Flag",
///     "Flag": "YELLOW",
///     "Scope": "Sector",
///     "Sector": 7,
///     "Message": "YELLOW IN TRACK SECTOR 7"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceControlMessage {
    /// When race control issued the message
    pub datetime_utc: Option<DateTime<Utc>>,
    /// Message category (e.g. "Flag", "Drs", "Other")
    pub category: String,
    /// Flag colour for flag messages
    pub flag: Option<String>,
    /// Scope of the message ("Track", "Sector", "Driver")
    pub scope: Option<String>,
    /// Track sector for sector-scoped messages
    pub sector: Option<u32>,
    /// The announcement text
    pub message: String,
}

/// A batch of race control announcements, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceControlMessages {
    /// The contained announcements
    pub messages: Vec<RaceControlMessage>,
}
