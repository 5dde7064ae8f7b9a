use serde::{Deserialize, Serialize};

use crate::models::MatchSnapshot;

/// Header information for the board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    pub tournament_name: String,
    pub event_name: String,

    /// Tournament profile image, falling back to the first image
    pub logo_url: Option<String>,
}

/// Everything one dashboard fetch returns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketSnapshot {
    pub meta: EventMeta,

    /// States {1,2,4,5,6} in call order
    pub active: Vec<MatchSnapshot>,

    /// State 3, most recently finished first
    pub completed: Vec<MatchSnapshot>,
}

/// Refresh scheduler state exposed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    /// Seconds until the next cadence refresh
    pub seconds_to_refresh: u64,

    /// A fetch is in flight
    pub in_flight: bool,

    /// Number of successfully published cycles
    pub cycles: u64,

    /// Message of the latest failed fetch, cleared on success
    pub last_error: Option<String>,
}

impl SchedulerStatus {
    pub fn new(refresh_secs: u64) -> Self {
        Self {
            seconds_to_refresh: refresh_secs,
            in_flight: false,
            cycles: 0,
            last_error: None,
        }
    }
}
