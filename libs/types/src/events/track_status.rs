use serde::{Deserialize, Serialize};

/// Current track flag condition.
///
/// Sample payload: `{"Status": "1", "Message": "AllClear"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackStatus {
    /// Numeric status code as delivered by the feed ("1" = all clear,
    /// "2" = yellow, "4" = safety car, "5" = red, ...)
    pub status: String,
    /// Human-readable status message
    pub message: String,
}
