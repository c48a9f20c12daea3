use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata about a single driver from the roster feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Car number as displayed on timing screens
    pub racing_number: u32,
    /// Abbreviated name used in broadcast overlays (e.g. "M VERSTAPPEN")
    pub broadcast_name: String,
    /// Full name in feed formatting
    pub full_name: String,
    /// Three-letter abbreviation (e.g. "VER")
    pub tla: String,
    /// Display ordering index in the timing layout
    pub line: u32,
    /// Team name
    pub team_name: String,
    /// Team colour as a hex code (e.g. "4781D7")
    pub team_colour: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Unique media reference identifier
    pub reference: String,
    /// Headshot image URL
    pub headshot_url: String,
}

/// The driver roster for a session, indexed by racing number.
///
/// Sample payload: `{"1": {"RacingNumber": "1", "Tla": "VER", ...}, ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverList {
    /// Driver records keyed by their feed identifier (the racing number)
    pub drivers: BTreeMap<String, Driver>,
}
