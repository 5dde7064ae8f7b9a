use crate::models::{Bucket, DisplayMatch, SetState};

/// Place a set into its live display bucket.
///
/// Open and pending sets only count as upcoming when both sides can be named,
/// at least as "Winner of A vs B". Ready sets are deliberately not surfaced.
pub fn classify(m: &DisplayMatch) -> Bucket {
    match m.state {
        SetState::Called => Bucket::Called,
        SetState::InProgress => Bucket::Playing,
        SetState::Open | SetState::Pending => {
            if m.s1_info.is_deep_known && m.s2_info.is_deep_known {
                Bucket::UpcomingEligible
            } else {
                Bucket::Excluded
            }
        }
        SetState::Completed | SetState::Ready | SetState::Unknown(_) => Bucket::Excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResolvedSlotInfo;

    fn display(state: SetState, s1: ResolvedSlotInfo, s2: ResolvedSlotInfo) -> DisplayMatch {
        DisplayMatch {
            id: "1".into(),
            p1: s1.text.clone(),
            p2: s2.text.clone(),
            s1_info: s1,
            s2_info: s2,
            round: "Bracket: Round 1".into(),
            station: None,
            is_stream: false,
            started_at: None,
            state,
        }
    }

    #[test]
    fn test_called_ignores_slot_knowledge() {
        let m = display(
            SetState::Called,
            ResolvedSlotInfo::unknown("TBD"),
            ResolvedSlotInfo::unknown("TBD"),
        );
        assert_eq!(classify(&m), Bucket::Called);
    }

    #[test]
    fn test_in_progress_is_playing() {
        let m = display(
            SetState::InProgress,
            ResolvedSlotInfo::known("A"),
            ResolvedSlotInfo::known("B"),
        );
        assert_eq!(classify(&m), Bucket::Playing);
    }

    #[test]
    fn test_open_and_pending_need_deep_knowledge() {
        for state in [SetState::Open, SetState::Pending] {
            let eligible = display(
                state,
                ResolvedSlotInfo::deep_known("Winner of A vs B"),
                ResolvedSlotInfo::known("C"),
            );
            assert_eq!(classify(&eligible), Bucket::UpcomingEligible);

            let excluded = display(
                state,
                ResolvedSlotInfo::unknown("W. of Set 9"),
                ResolvedSlotInfo::known("C"),
            );
            assert_eq!(classify(&excluded), Bucket::Excluded);
        }
    }

    #[test]
    fn test_ready_completed_and_unknown_excluded() {
        for state in [SetState::Ready, SetState::Completed, SetState::Unknown(9)] {
            let m = display(state, ResolvedSlotInfo::known("A"), ResolvedSlotInfo::known("B"));
            assert_eq!(classify(&m), Bucket::Excluded);
        }
    }
}
