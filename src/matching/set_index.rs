use std::collections::HashMap;

use crate::models::MatchSnapshot;

/// Lookup of every set seen in one cycle, keyed by set id.
///
/// Completed sets are inserted first and active sets second, so an id present
/// in both resolves to the active snapshot. Built fresh every cycle.
#[derive(Debug, Default)]
pub struct SetIndex<'a> {
    sets: HashMap<&'a str, &'a MatchSnapshot>,
}

impl<'a> SetIndex<'a> {
    pub fn build(completed: &'a [MatchSnapshot], active: &'a [MatchSnapshot]) -> Self {
        let mut sets = HashMap::with_capacity(completed.len() + active.len());

        for set in completed.iter().chain(active) {
            sets.insert(set.id.as_str(), set);
        }

        Self { sets }
    }

    pub fn get(&self, id: &str) -> Option<&'a MatchSnapshot> {
        self.sets.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchSlot, SetState};

    fn set(id: &str, state: SetState, a: &str, b: &str) -> MatchSnapshot {
        MatchSnapshot::new(
            id,
            state,
            [MatchSlot::Entrant(a.into()), MatchSlot::Entrant(b.into())],
        )
    }

    #[test]
    fn test_empty_inputs() {
        let index = SetIndex::build(&[], &[]);
        assert!(index.is_empty());
        assert!(index.get("1").is_none());
    }

    #[test]
    fn test_active_overwrites_completed() {
        let completed = vec![set("7", SetState::Completed, "Old A", "Old B")];
        let active = vec![set("7", SetState::InProgress, "New A", "New B")];

        let index = SetIndex::build(&completed, &active);

        assert_eq!(index.len(), 1);
        let found = index.get("7").unwrap();
        assert_eq!(found.state, SetState::InProgress);
        assert_eq!(found.entrant_names(), Some(("New A", "New B")));
    }

    #[test]
    fn test_contains_both_sources() {
        let completed = vec![set("1", SetState::Completed, "A", "B")];
        let active = vec![set("2", SetState::Open, "C", "D")];

        let index = SetIndex::build(&completed, &active);

        assert_eq!(index.len(), 2);
        assert!(index.get("1").is_some());
        assert!(index.get("2").is_some());
    }
}
