//! Allocation logic for the Placement Engine.
//!
//! This module contains final score derivation, snapshot validation, candidate
//! ranking, preference placement, the tiered lottery fallback and the
//! [`Allocator`] that runs them in order.

mod available;
mod engine;
mod lottery;
mod placement;
mod ranking;
mod score;
mod validation;

pub use available::AvailableLocations;
pub use engine::{Allocator, allocate};
pub use lottery::{GUARANTEED_DRAW_PHASE, LotteryEntrant, fisher_yates_shuffle};
pub use placement::first_available_preference;
pub use ranking::{RankedCandidate, compare_priority, rank_candidates, ranking_position};
pub use score::{FINAL_SCORE_DECIMAL_PLACES, final_score};
