use std::collections::BTreeSet;

use serde::Serialize;
use tracing::warn;

use crate::models::{DisplayMatch, VenueLayout};

/// Stations to highlight on the venue map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StationOccupancy {
    pub playing: BTreeSet<String>,
    pub called: BTreeSet<String>,
}

impl StationOccupancy {
    /// Collect station ids from the playing and called lists. Sets with no
    /// station contribute nothing.
    pub fn from_buckets(playing: &[DisplayMatch], called: &[DisplayMatch]) -> Self {
        Self {
            playing: stations_of(playing),
            called: stations_of(called),
        }
    }

    pub fn is_playing(&self, station: &str) -> bool {
        self.playing.contains(station)
    }

    pub fn is_called(&self, station: &str) -> bool {
        self.called.contains(station)
    }

    /// Keep only stations drawn on the venue map. Returns the filtered view
    /// and the ids that have no map entry.
    pub fn restricted_to(&self, layout: &VenueLayout) -> (Self, Vec<String>) {
        let mut unmapped = Vec::new();

        let mut keep = |ids: &BTreeSet<String>| -> BTreeSet<String> {
            let mut kept = BTreeSet::new();
            for id in ids {
                if layout.has_station(id) {
                    kept.insert(id.clone());
                } else if !unmapped.contains(id) {
                    unmapped.push(id.clone());
                }
            }
            kept
        };

        let view = Self {
            playing: keep(&self.playing),
            called: keep(&self.called),
        };

        if !unmapped.is_empty() {
            warn!("Stations missing from venue layout: {:?}", unmapped);
        }

        (view, unmapped)
    }
}

fn stations_of(matches: &[DisplayMatch]) -> BTreeSet<String> {
    matches.iter().filter_map(|m| m.station.clone()).collect()
}
