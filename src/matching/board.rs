use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::matching::{classify, resolve, SetIndex, StationOccupancy};
use crate::models::{BracketSnapshot, Bucket, DisplayMatch, EventMeta, MatchSnapshot};

/// Pool label used when a set has no phase group
pub const DEFAULT_POOL: &str = "Bracket";

/// Everything the renderer needs for one refresh. Never mutated after it is
/// published; the next refresh replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardCycle {
    /// Increments with every successful fetch
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub meta: EventMeta,
    pub called: Vec<DisplayMatch>,
    pub playing: Vec<DisplayMatch>,
    pub upcoming: Vec<DisplayMatch>,
    pub occupancy: StationOccupancy,
}

impl BoardCycle {
    /// Build a cycle from one fetch result in a single pass
    pub fn build(snapshot: &BracketSnapshot, sequence: u64, fetched_at: DateTime<Utc>) -> Self {
        let (called, playing, upcoming) = partition(&snapshot.completed, &snapshot.active);
        let occupancy = StationOccupancy::from_buckets(&playing, &called);

        debug!(
            "Cycle {}: {} called, {} playing, {} upcoming",
            sequence,
            called.len(),
            playing.len(),
            upcoming.len()
        );

        Self {
            sequence,
            fetched_at,
            meta: snapshot.meta.clone(),
            called,
            playing,
            upcoming,
            occupancy,
        }
    }

    /// Called and playing sets, the ones that get a running clock
    pub fn on_station(&self) -> impl Iterator<Item = &DisplayMatch> {
        self.called.iter().chain(&self.playing)
    }

    pub fn is_idle(&self) -> bool {
        self.called.is_empty() && self.playing.is_empty()
    }
}

/// Resolve every active set and split them into called, playing and upcoming
/// lists, keeping provider order.
pub fn partition(
    completed: &[MatchSnapshot],
    active: &[MatchSnapshot],
) -> (Vec<DisplayMatch>, Vec<DisplayMatch>, Vec<DisplayMatch>) {
    let index = SetIndex::build(completed, active);

    let mut called = Vec::new();
    let mut playing = Vec::new();
    let mut upcoming = Vec::new();

    for set in active {
        let m = display_match(set, &index);
        match classify(&m) {
            Bucket::Called => called.push(m),
            Bucket::Playing => playing.push(m),
            Bucket::UpcomingEligible => upcoming.push(m),
            Bucket::Excluded => {}
        }
    }

    (called, playing, upcoming)
}

/// Resolve both slots of an active set
pub fn display_match(set: &MatchSnapshot, index: &SetIndex<'_>) -> DisplayMatch {
    let s1 = resolve(&set.slots[0], index);
    let s2 = resolve(&set.slots[1], index);

    DisplayMatch {
        id: set.id.clone(),
        p1: s1.text.clone(),
        p2: s2.text.clone(),
        s1_info: s1,
        s2_info: s2,
        round: round_label(set),
        station: set.station.clone(),
        is_stream: set.is_stream,
        started_at: set.started_at,
        state: set.state,
    }
}

fn round_label(set: &MatchSnapshot) -> String {
    let pool = set.pool.as_deref().unwrap_or(DEFAULT_POOL);
    match set.round_text.as_deref() {
        Some(round) => format!("{}: {}", pool, round),
        None => pool.to_string(),
    }
}
