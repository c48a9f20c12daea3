use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A liveness heartbeat from the feed.
///
/// Sample payload: `{"Utc": "2025-01-01T00:00:00Z", "_kf": true}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    /// UTC time when the heartbeat was emitted by the feed.
    pub datetime_utc: DateTime<Utc>,
}
