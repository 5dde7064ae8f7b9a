use crate::matching::SetIndex;
use crate::models::{MatchSlot, ResolvedSlotInfo};

/// Placeholder for a slot with neither entrant nor prerequisite
pub const TBD: &str = "TBD";

/// Resolve one slot to display text and knowledge depth.
///
/// Looks exactly one set back: a prerequisite whose own slots are not both
/// seated falls back to a set reference instead of recursing further.
pub fn resolve(slot: &MatchSlot, index: &SetIndex<'_>) -> ResolvedSlotInfo {
    match slot {
        MatchSlot::Entrant(name) => ResolvedSlotInfo::known(name.as_str()),
        MatchSlot::Pending {
            prereq_id,
            placement,
        } => {
            let names = index.get(prereq_id).and_then(|set| set.entrant_names());

            match names {
                Some((a, b)) => {
                    ResolvedSlotInfo::deep_known(format!("{} of {} vs {}", placement.word(), a, b))
                }
                None => ResolvedSlotInfo::unknown(format!(
                    "{}. of Set {}",
                    placement.initial(),
                    short_set_id(prereq_id)
                )),
            }
        }
        MatchSlot::Empty => ResolvedSlotInfo::unknown(TBD),
    }
}

/// Last `_`-separated segment of a set id ("preview_123_4" -> "4")
fn short_set_id(id: &str) -> &str {
    match id.rsplit('_').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchSnapshot, Placement, SetState};

    fn seated(id: &str, a: &str, b: &str) -> MatchSnapshot {
        MatchSnapshot::new(
            id,
            SetState::Completed,
            [MatchSlot::Entrant(a.into()), MatchSlot::Entrant(b.into())],
        )
    }

    fn pending(prereq_id: &str, placement: Placement) -> MatchSlot {
        MatchSlot::Pending {
            prereq_id: prereq_id.into(),
            placement,
        }
    }

    #[test]
    fn test_entrant_is_known() {
        let index = SetIndex::build(&[], &[]);
        let info = resolve(&MatchSlot::Entrant("Alice".into()), &index);

        assert_eq!(info.text, "Alice");
        assert!(info.is_known);
        assert!(info.is_deep_known);
    }

    #[test]
    fn test_winner_and_loser_of_named_prereq() {
        let completed = vec![seated("10", "Alice", "Bob")];
        let index = SetIndex::build(&completed, &[]);

        let winner = resolve(&pending("10", Placement::Winner), &index);
        assert_eq!(winner.text, "Winner of Alice vs Bob");
        assert!(!winner.is_known);
        assert!(winner.is_deep_known);

        let loser = resolve(&pending("10", Placement::Loser), &index);
        assert_eq!(loser.text, "Loser of Alice vs Bob");
        assert!(!loser.text.contains("Winner"));
        assert!(loser.is_deep_known);
    }

    #[test]
    fn test_missing_prereq_falls_back() {
        let index = SetIndex::build(&[], &[]);
        let info = resolve(&pending("99", Placement::Winner), &index);

        assert_eq!(info.text, "W. of Set 99");
        assert!(!info.is_known);
        assert!(!info.is_deep_known);
    }

    #[test]
    fn test_half_named_prereq_falls_back() {
        let active = vec![MatchSnapshot::new(
            "preview_55_3",
            SetState::Pending,
            [MatchSlot::Entrant("Carol".into()), pending("54", Placement::Winner)],
        )];
        let index = SetIndex::build(&[], &active);

        let info = resolve(&pending("preview_55_3", Placement::Loser), &index);

        assert_eq!(info.text, "L. of Set 3");
        assert!(!info.is_deep_known);
    }

    #[test]
    fn test_empty_is_tbd() {
        let index = SetIndex::build(&[], &[]);
        let info = resolve(&MatchSlot::Empty, &index);

        assert_eq!(info, ResolvedSlotInfo::unknown("TBD"));
    }

    #[test]
    fn test_short_set_id() {
        assert_eq!(short_set_id("12345"), "12345");
        assert_eq!(short_set_id("preview_123_4"), "4");
        assert_eq!(short_set_id("trailing_"), "trailing_");
    }
}
