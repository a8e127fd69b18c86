//! Lottery fallback.
//!
//! Candidates who could not be placed by preference and opted in are drawn
//! against the locations still left, which are handed out in input order.
//! The guaranteed tier's draw must cover its whole pool; the remainder
//! tier's draw stops when locations run out.

use rand::Rng;
use tracing::{debug, error};

use crate::config::LotteryOrder;
use crate::error::{EngineError, EngineResult};
use crate::models::{Assignment, Tier};

use super::available::AvailableLocations;

/// Phase name reported when the guaranteed draw cannot cover its pool.
pub const GUARANTEED_DRAW_PHASE: &str = "guaranteed_lottery_draw";

/// A candidate waiting in a lottery pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotteryEntrant<'a> {
    /// The waiting candidate.
    pub candidate_id: &'a str,
    /// The candidate's 1-based ranking position.
    pub position: usize,
}

/// The outcome of one lottery draw.
#[derive(Debug)]
pub(crate) struct LotteryDraw {
    /// One assignment per pool member.
    pub assignments: Vec<Assignment>,
    /// Locations left after the draw.
    pub available: AvailableLocations,
}

/// Shuffles a slice in place with the Fisher-Yates algorithm.
///
/// # Example
///
/// ```
/// use placement_engine::allocation::fisher_yates_shuffle;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut pool = vec![1, 2, 3, 4, 5];
/// fisher_yates_shuffle(&mut pool, &mut StdRng::seed_from_u64(7));
///
/// let mut sorted = pool.clone();
/// sorted.sort();
/// assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
/// ```
pub fn fisher_yates_shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Puts a pool into draw order according to the policy.
pub(crate) fn order_pool<T, R: Rng + ?Sized>(pool: &mut [T], order: LotteryOrder, rng: &mut R) {
    match order {
        LotteryOrder::RankOrder => {}
        LotteryOrder::Shuffled => fisher_yates_shuffle(pool, rng),
    }
}

/// Draws locations for the guaranteed tier's pool.
///
/// # Errors
///
/// Returns `InternalConsistency` if fewer locations remain than pool members.
/// The guaranteed tier is never larger than the number of available
/// locations, so this only happens if an earlier phase misbehaved.
pub(crate) fn draw_guaranteed(
    pool: &[LotteryEntrant<'_>],
    available: AvailableLocations,
) -> EngineResult<LotteryDraw> {
    if pool.len() > available.len() {
        error!(
            pool = pool.len(),
            remaining = available.len(),
            "Guaranteed lottery pool exceeds remaining locations"
        );
        return Err(EngineError::InternalConsistency {
            phase: GUARANTEED_DRAW_PHASE.to_string(),
            message: format!(
                "{} pool members but only {} locations left",
                pool.len(),
                available.len()
            ),
        });
    }

    Ok(draw(pool, available, Tier::Guaranteed))
}

/// Draws locations for the remainder tier's pool until they run out.
pub(crate) fn draw_remainder(
    pool: &[LotteryEntrant<'_>],
    available: AvailableLocations,
) -> LotteryDraw {
    draw(pool, available, Tier::Remainder)
}

fn draw(pool: &[LotteryEntrant<'_>], mut available: AvailableLocations, tier: Tier) -> LotteryDraw {
    let assignments = pool
        .iter()
        .map(|entrant| match available.claim_next() {
            Some(location_id) => {
                debug!(
                    candidate_id = entrant.candidate_id,
                    location_id = %location_id,
                    tier = ?tier,
                    "Placed by lottery"
                );
                Assignment::lottery(entrant.candidate_id, location_id, entrant.position, tier)
            }
            None => {
                debug!(
                    candidate_id = entrant.candidate_id,
                    tier = ?tier,
                    "Lottery pool exhausted the remaining locations"
                );
                Assignment::unassigned(entrant.candidate_id, entrant.position, tier)
            }
        })
        .collect();

    LotteryDraw {
        assignments,
        available,
    }
}
