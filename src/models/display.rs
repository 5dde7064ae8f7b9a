use serde::{Deserialize, Serialize};

use crate::models::SetState;

/// Display text for one slot plus how much we know about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSlotInfo {
    /// Entrant name, "Winner of A vs B", a set reference, or "TBD"
    pub text: String,

    /// A concrete entrant is seated
    pub is_known: bool,

    /// Entrant is seated, or the feeding matchup has both entrants named
    pub is_deep_known: bool,
}

impl ResolvedSlotInfo {
    pub fn known(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_known: true,
            is_deep_known: true,
        }
    }

    pub fn deep_known(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_known: false,
            is_deep_known: true,
        }
    }

    pub fn unknown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_known: false,
            is_deep_known: false,
        }
    }
}

/// A set prepared for rendering. Rebuilt every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMatch {
    pub id: String,
    pub p1: String,
    pub p2: String,
    pub s1_info: ResolvedSlotInfo,
    pub s2_info: ResolvedSlotInfo,

    /// "<pool>: <round>"
    pub round: String,

    pub station: Option<String>,
    pub is_stream: bool,

    /// Epoch seconds
    pub started_at: Option<i64>,

    pub state: SetState,
}

impl DisplayMatch {
    /// Station label as shown on the board: streams get an "S" prefix
    pub fn station_label(&self) -> Option<String> {
        self.station.as_ref().map(|station| {
            if self.is_stream {
                format!("S{}", station)
            } else {
                station.clone()
            }
        })
    }
}

/// Live display category of a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Called,
    Playing,
    UpcomingEligible,
    Excluded,
}
