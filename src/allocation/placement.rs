//! Preference placement.
//!
//! Each candidate, in ranking order, takes the most preferred location that is
//! still unclaimed. Candidates left without one either join the tier's lottery
//! pool or are recorded as unassigned, depending on their opt-in flag.

use tracing::debug;

use crate::models::{Assignment, PreferenceEntry, Tier};

use super::available::AvailableLocations;
use super::lottery::LotteryEntrant;
use super::ranking::RankedCandidate;
use super::validation::PreferenceBook;

/// The outcome of one preference pass over a tier.
#[derive(Debug)]
pub(crate) struct PreferencePass<'a> {
    /// Preference placements and opted-out unassigned candidates.
    pub assignments: Vec<Assignment>,
    /// Opted-in candidates still waiting for a location, in ranking order.
    pub lottery_pool: Vec<LotteryEntrant<'a>>,
    /// Locations left for later phases.
    pub available: AvailableLocations,
}

/// Returns the most preferred entry whose location is still unclaimed.
///
/// `preferences` must be sorted by ascending rank.
pub fn first_available_preference<'p>(
    preferences: &[&'p PreferenceEntry],
    available: &AvailableLocations,
) -> Option<&'p PreferenceEntry> {
    preferences
        .iter()
        .copied()
        .find(|entry| available.contains(&entry.location_id))
}

/// Runs the preference scan for one tier.
pub(crate) fn run_preference_pass<'a>(
    tier: Tier,
    candidates: &[RankedCandidate<'a>],
    preferences: &PreferenceBook<'a>,
    mut available: AvailableLocations,
) -> PreferencePass<'a> {
    let mut assignments = Vec::with_capacity(candidates.len());
    let mut lottery_pool = Vec::new();

    for ranked in candidates {
        let candidate = ranked.candidate;
        let list = preferences
            .get(candidate.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let claimed = first_available_preference(list, &available)
            .and_then(|entry| available.claim(&entry.location_id).map(|id| (entry.rank, id)));

        if let Some((rank, location_id)) = claimed {
            debug!(
                candidate_id = %candidate.id,
                location_id = %location_id,
                rank,
                tier = ?tier,
                "Placed by preference"
            );
            assignments.push(Assignment::preference(
                candidate.id.as_str(),
                location_id,
                rank,
                ranked.position,
                tier,
            ));
        } else if candidate.wants_lottery {
            lottery_pool.push(LotteryEntrant {
                candidate_id: candidate.id.as_str(),
                position: ranked.position,
            });
        } else {
            debug!(
                candidate_id = %candidate.id,
                tier = ?tier,
                "No preferred location left and lottery declined"
            );
            assignments.push(Assignment::unassigned(
                candidate.id.as_str(),
                ranked.position,
                tier,
            ));
        }
    }

    PreferencePass {
        assignments,
        lottery_pool,
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::ranking::rank_candidates;
    use crate::models::{AssignmentKind, Candidate, Location};
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn available(ids: &[&str]) -> AvailableLocations {
        let locations: Vec<Location> = ids.iter().map(|id| Location::available(*id)).collect();
        AvailableLocations::from_locations(&locations)
    }

    fn candidate(id: &str, score: i64) -> Candidate {
        Candidate::new(id, Decimal::from(score), Decimal::from(score))
    }

    fn book<'a>(entries: &'a [PreferenceEntry]) -> PreferenceBook<'a> {
        let mut book: PreferenceBook<'a> = HashMap::new();
        for entry in entries {
            book.entry(entry.candidate_id.as_str()).or_default().push(entry);
        }
        for list in book.values_mut() {
            list.sort_by_key(|e| e.rank);
        }
        book
    }

    #[test]
    fn test_first_available_preference_skips_claimed() {
        let entries = [
            PreferenceEntry::new("a", "loc_1", 1),
            PreferenceEntry::new("a", "loc_2", 2),
        ];
        let refs: Vec<&PreferenceEntry> = entries.iter().collect();

        let found = first_available_preference(&refs, &available(&["loc_2", "loc_3"])).unwrap();
        assert_eq!(found.location_id, "loc_2");
        assert_eq!(found.rank, 2);

        assert!(first_available_preference(&refs, &available(&["loc_3"])).is_none());
        assert!(first_available_preference(&[], &available(&["loc_3"])).is_none());
    }

    #[test]
    fn test_higher_ranked_candidate_claims_shared_preference() {
        let candidates = vec![candidate("a", 95), candidate("b", 90)];
        let ranked = rank_candidates(&candidates).unwrap();
        let entries = [
            PreferenceEntry::new("a", "loc_1", 1),
            PreferenceEntry::new("b", "loc_1", 1),
            PreferenceEntry::new("b", "loc_2", 2),
        ];
        let book = book(&entries);

        let pass = run_preference_pass(
            Tier::Guaranteed,
            &ranked,
            &book,
            available(&["loc_1", "loc_2", "loc_3"]),
        );

        assert_eq!(pass.assignments.len(), 2);
        assert_eq!(pass.assignments[0].location_id.as_deref(), Some("loc_1"));
        assert_eq!(pass.assignments[1].location_id.as_deref(), Some("loc_2"));
        assert_eq!(pass.assignments[1].matched_rank, Some(2));
        assert_eq!(pass.available.into_ids(), vec!["loc_3"]);
        assert!(pass.lottery_pool.is_empty());
    }

    #[test]
    fn test_unplaced_candidates_split_by_lottery_flag() {
        let candidates = vec![
            candidate("opted_in", 80).with_lottery(true),
            candidate("opted_out", 70),
        ];
        let ranked = rank_candidates(&candidates).unwrap();

        let pass = run_preference_pass(
            Tier::Remainder,
            &ranked,
            &HashMap::new(),
            available(&["loc_1"]),
        );

        assert_eq!(pass.lottery_pool.len(), 1);
        assert_eq!(pass.lottery_pool[0].candidate_id, "opted_in");
        assert_eq!(pass.lottery_pool[0].position, 1);
        assert_eq!(pass.assignments.len(), 1);
        assert_eq!(pass.assignments[0].kind, AssignmentKind::Unassigned);
        assert_eq!(pass.assignments[0].tier, Tier::Remainder);
        assert_eq!(pass.available.len(), 1);
    }

    #[test]
    fn test_preference_for_unavailable_location_is_skipped() {
        let candidates = vec![candidate("a", 90)];
        let ranked = rank_candidates(&candidates).unwrap();
        let entries = [
            PreferenceEntry::new("a", "closed", 1),
            PreferenceEntry::new("a", "loc_2", 2),
        ];
        let book = book(&entries);

        let pass = run_preference_pass(Tier::Guaranteed, &ranked, &book, available(&["loc_2"]));
        assert_eq!(pass.assignments[0].location_id.as_deref(), Some("loc_2"));
        assert_eq!(pass.assignments[0].matched_rank, Some(2));
    }
}
