//! Candidate ranking.
//!
//! Candidates are ordered by final score, highest first, and exact ties are
//! broken by years of service, most first. The sort is stable, so candidates
//! that tie on both keys keep their snapshot order.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::Candidate;

/// A candidate together with its derived final score and ranking position.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate<'a> {
    /// The underlying snapshot record.
    pub candidate: &'a Candidate,
    /// The recomputed final score.
    pub final_score: Decimal,
    /// 1-based position in the ranking.
    pub position: usize,
}

/// Compares two candidates' priority keys.
///
/// `Ordering::Less` means the first candidate is served first.
///
/// # Example
///
/// ```
/// use placement_engine::allocation::compare_priority;
/// use rust_decimal::Decimal;
/// use std::cmp::Ordering;
///
/// let score = Decimal::from(88);
/// assert_eq!(compare_priority((score, 5), (score, 0)), Ordering::Less);
/// assert_eq!(compare_priority((score, 0), (Decimal::from(90), 9)), Ordering::Greater);
/// ```
pub fn compare_priority(a: (Decimal, u32), b: (Decimal, u32)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1))
}

/// Ranks candidates whose final scores have already been derived.
pub(crate) fn rank_scored<'a>(
    mut scored: Vec<(&'a Candidate, Decimal)>,
) -> Vec<RankedCandidate<'a>> {
    scored.sort_by(|(a, a_score), (b, b_score)| {
        compare_priority((*a_score, a.tie_break()), (*b_score, b.tie_break()))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (candidate, final_score))| RankedCandidate {
            candidate,
            final_score,
            position: index + 1,
        })
        .collect()
}

/// Ranks a snapshot of candidates the way an allocation run does.
///
/// # Errors
///
/// Returns `MissingScore` if any candidate lacks a component score, or
/// `ScoreOverflow` if a candidate's scores are too large to average.
///
/// # Example
///
/// ```
/// use placement_engine::allocation::rank_candidates;
/// use placement_engine::models::Candidate;
/// use rust_decimal::Decimal;
///
/// let candidates = vec![
///     Candidate::new("low", Decimal::from(70), Decimal::from(70)),
///     Candidate::new("high", Decimal::from(90), Decimal::from(90)),
/// ];
/// let ranked = rank_candidates(&candidates).unwrap();
/// assert_eq!(ranked[0].candidate.id, "high");
/// assert_eq!(ranked[1].position, 2);
/// ```
pub fn rank_candidates(candidates: &[Candidate]) -> EngineResult<Vec<RankedCandidate<'_>>> {
    let scored = candidates
        .iter()
        .map(|c| c.computed_final_score().map(|score| (c, score)))
        .collect::<EngineResult<Vec<_>>>()?;
    Ok(rank_scored(scored))
}

/// Returns the 1-based ranking position of a candidate, if present.
pub fn ranking_position(
    candidates: &[Candidate],
    candidate_id: &str,
) -> EngineResult<Option<usize>> {
    Ok(rank_candidates(candidates)?
        .into_iter()
        .find(|r| r.candidate.id == candidate_id)
        .map(|r| r.position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ids<'a>(ranked: &'a [RankedCandidate<'_>]) -> Vec<&'a str> {
        ranked.iter().map(|r| r.candidate.id.as_str()).collect()
    }

    // ==========================================================================
    // RNK-001: higher final score ranks first
    // ==========================================================================
    #[test]
    fn test_rnk_001_orders_by_final_score_descending() {
        let candidates = vec![
            Candidate::new("c", dec("85"), dec("85")),
            Candidate::new("a", dec("95"), dec("95")),
            Candidate::new("b", dec("90"), dec("90")),
        ];

        let ranked = rank_candidates(&candidates).unwrap();
        assert_eq!(ids(&ranked), vec!["a", "b", "c"]);
        assert_eq!(
            ranked.iter().map(|r| r.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    // ==========================================================================
    // RNK-002: equal score, more years of service wins
    // ==========================================================================
    #[test]
    fn test_rnk_002_years_of_service_breaks_tie() {
        let candidates = vec![
            Candidate::new("no_years", dec("88"), dec("88")),
            Candidate::new("five_years", dec("88"), dec("88")).with_years_of_service(5),
        ];

        let ranked = rank_candidates(&candidates).unwrap();
        assert_eq!(ids(&ranked), vec!["five_years", "no_years"]);
        assert_eq!(ranked[0].final_score, dec("88.00"));
    }

    // ==========================================================================
    // RNK-003: full tie keeps snapshot order
    // ==========================================================================
    #[test]
    fn test_rnk_003_full_tie_is_stable() {
        let candidates = vec![
            Candidate::new("first", dec("80"), dec("80")).with_years_of_service(2),
            Candidate::new("second", dec("80"), dec("80")).with_years_of_service(2),
            Candidate::new("third", dec("80"), dec("80")).with_years_of_service(2),
        ];

        let ranked = rank_candidates(&candidates).unwrap();
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    // ==========================================================================
    // RNK-004: years never outrank a higher score
    // ==========================================================================
    #[test]
    fn test_rnk_004_score_dominates_years() {
        let candidates = vec![
            Candidate::new("veteran", dec("80"), dec("80")).with_years_of_service(30),
            Candidate::new("rookie", dec("80.02"), dec("80")),
        ];

        let ranked = rank_candidates(&candidates).unwrap();
        assert_eq!(ids(&ranked), vec!["rookie", "veteran"]);
    }

    #[test]
    fn test_ranking_uses_recomputed_score_not_stored_one() {
        let mut stale = Candidate::new("stale", dec("60"), dec("60"));
        stale.final_score = Some(dec("99"));
        let candidates = vec![stale, Candidate::new("honest", dec("70"), dec("70"))];

        let ranked = rank_candidates(&candidates).unwrap();
        assert_eq!(ids(&ranked), vec!["honest", "stale"]);
    }

    #[test]
    fn test_ranking_position_lookup() {
        let candidates = vec![
            Candidate::new("a", dec("70"), dec("70")),
            Candidate::new("b", dec("90"), dec("90")),
        ];

        assert_eq!(ranking_position(&candidates, "a").unwrap(), Some(2));
        assert_eq!(ranking_position(&candidates, "b").unwrap(), Some(1));
        assert_eq!(ranking_position(&candidates, "z").unwrap(), None);
    }

    #[test]
    fn test_missing_score_fails_ranking() {
        let mut broken = Candidate::new("broken", dec("70"), dec("70"));
        broken.interview_score = None;

        let result = rank_candidates(std::slice::from_ref(&broken));
        assert!(matches!(result, Err(EngineError::MissingScore { .. })));
    }

    #[test]
    fn test_overflowing_scores_fail_ranking() {
        let huge = Candidate::new("huge", Decimal::MAX, Decimal::MAX);

        let result = rank_candidates(std::slice::from_ref(&huge));
        assert!(matches!(result, Err(EngineError::ScoreOverflow { .. })));
    }

    #[test]
    fn test_empty_input_ranks_nothing() {
        assert!(rank_candidates(&[]).unwrap().is_empty());
    }
}
