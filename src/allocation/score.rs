//! Final score derivation.
//!
//! The final score is the single ranking key. It is always derived from the
//! written and interview scores and never maintained by hand.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places a final score is rounded to.
pub const FINAL_SCORE_DECIMAL_PLACES: u32 = 2;

/// Computes the final score as the average of both component scores.
///
/// The average is rounded to two decimal places, with midpoints rounded away
/// from zero. Returns `None` if the sum of the two scores overflows.
///
/// # Examples
///
/// ```
/// use placement_engine::final_score;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let score = |w: &str, i: &str| {
///     final_score(Decimal::from_str(w).unwrap(), Decimal::from_str(i).unwrap())
/// };
/// assert_eq!(score("95", "90"), Some(Decimal::from_str("92.5").unwrap()));
/// assert_eq!(score("87", "86"), Some(Decimal::from_str("86.5").unwrap()));
/// assert_eq!(score("87.33", "86"), Some(Decimal::from_str("86.67").unwrap()));
///
/// assert_eq!(final_score(Decimal::MAX, Decimal::ONE), None);
/// ```
pub fn final_score(written: Decimal, interview: Decimal) -> Option<Decimal> {
    let total = written.checked_add(interview)?;
    Some((total / Decimal::TWO).round_dp_with_strategy(
        FINAL_SCORE_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    ))
}
