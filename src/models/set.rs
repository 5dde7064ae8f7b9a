use serde::{Deserialize, Serialize};

/// Provider-defined state of a set. Codes are preserved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SetState {
    /// 1: not started
    Open,
    /// 2: players are on station
    InProgress,
    /// 3: result reported
    Completed,
    /// 4: both entrants known, not yet open
    Ready,
    /// 5: waiting on a prerequisite set
    Pending,
    /// 6: assigned to a station, players not yet confirmed
    Called,
    /// Any code the provider adds later
    Unknown(i64),
}

impl SetState {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SetState::Open,
            2 => SetState::InProgress,
            3 => SetState::Completed,
            4 => SetState::Ready,
            5 => SetState::Pending,
            6 => SetState::Called,
            other => SetState::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            SetState::Open => 1,
            SetState::InProgress => 2,
            SetState::Completed => 3,
            SetState::Ready => 4,
            SetState::Pending => 5,
            SetState::Called => 6,
            SetState::Unknown(code) => *code,
        }
    }
}

impl From<i64> for SetState {
    fn from(code: i64) -> Self {
        SetState::from_code(code)
    }
}

impl From<SetState> for i64 {
    fn from(state: SetState) -> Self {
        state.code()
    }
}

/// Which outcome of a prerequisite set feeds a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Winner,
    Loser,
}

impl Placement {
    /// 1 is the winner; every other placement is treated as the loser side
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => Placement::Winner,
            _ => Placement::Loser,
        }
    }

    pub fn word(&self) -> &'static str {
        match self {
            Placement::Winner => "Winner",
            Placement::Loser => "Loser",
        }
    }

    pub fn initial(&self) -> &'static str {
        match self {
            Placement::Winner => "W",
            Placement::Loser => "L",
        }
    }
}

/// One side of a set as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSlot {
    /// A concrete entrant is seated
    Entrant(String),
    /// Fed by the outcome of another set
    Pending {
        prereq_id: String,
        placement: Placement,
    },
    /// Nothing known yet
    Empty,
}

impl MatchSlot {
    /// Build a slot from the optional wire fields. An entrant name wins over
    /// a prerequisite reference; an empty prerequisite id counts as absent.
    pub fn from_parts(
        entrant: Option<String>,
        prereq_id: Option<String>,
        prereq_placement: Option<i64>,
    ) -> Self {
        match (entrant, prereq_id.filter(|id| !id.is_empty())) {
            (Some(name), _) => MatchSlot::Entrant(name),
            (None, Some(prereq_id)) => MatchSlot::Pending {
                prereq_id,
                placement: Placement::from_code(prereq_placement),
            },
            (None, None) => MatchSlot::Empty,
        }
    }

    pub fn entrant_name(&self) -> Option<&str> {
        match self {
            MatchSlot::Entrant(name) => Some(name),
            _ => None,
        }
    }
}

/// One set in a polling cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Set identifier, unique within a cycle
    pub id: String,

    /// The two sides
    pub slots: [MatchSlot; 2],

    /// Provider state
    pub state: SetState,

    /// Start time in epoch seconds
    pub started_at: Option<i64>,

    /// Station number in string form
    pub station: Option<String>,

    /// Set is assigned to a broadcast stream rather than a setup
    pub is_stream: bool,

    /// e.g. "Winners Semi-Final"
    pub round_text: Option<String>,

    /// Pool / phase group display identifier
    pub pool: Option<String>,
}

impl MatchSnapshot {
    /// Minimal set with the given id, state and slots
    pub fn new(id: impl Into<String>, state: SetState, slots: [MatchSlot; 2]) -> Self {
        Self {
            id: id.into(),
            slots,
            state,
            started_at: None,
            station: None,
            is_stream: false,
            round_text: None,
            pool: None,
        }
    }

    /// Both sides have a seated entrant
    pub fn entrant_names(&self) -> Option<(&str, &str)> {
        match (self.slots[0].entrant_name(), self.slots[1].entrant_name()) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }
}
