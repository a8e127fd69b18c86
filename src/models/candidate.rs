//! Candidate model.
//!
//! A candidate carries the two component scores the ranking is derived from,
//! an optional years-of-service tie-breaker and the lottery opt-in flag.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocation::final_score;
use crate::error::{EngineError, EngineResult};

/// Field name used when reporting a missing or invalid written score.
pub const WRITTEN_SCORE_FIELD: &str = "written_score";

/// Field name used when reporting a missing or invalid interview score.
pub const INTERVIEW_SCORE_FIELD: &str = "interview_score";

/// A candidate competing for a location.
///
/// Scores are optional because snapshots come straight from a store where a
/// record may be incomplete; the engine rejects such records instead of
/// guessing a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique identifier for the candidate.
    pub id: String,
    /// The written exam score.
    pub written_score: Option<Decimal>,
    /// The interview score.
    pub interview_score: Option<Decimal>,
    /// The final score as last stored by a collaborator.
    ///
    /// Informational only. The engine always recomputes it from the two
    /// component scores.
    #[serde(default)]
    pub final_score: Option<Decimal>,
    /// Years of service, used to break exact final score ties.
    #[serde(default)]
    pub years_of_service: Option<u32>,
    /// Whether the candidate accepts a lottery placement.
    #[serde(default)]
    pub wants_lottery: bool,
}

impl Candidate {
    /// Creates a candidate with both scores set and the final score derived.
    ///
    /// The final score is left unset if the scores are too large to average.
    ///
    /// # Examples
    ///
    /// ```
    /// use placement_engine::models::Candidate;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let candidate = Candidate::new("cand_001", Decimal::from(95), Decimal::from(90));
    /// assert_eq!(candidate.final_score, Some(Decimal::from_str("92.5").unwrap()));
    /// assert!(!candidate.wants_lottery);
    /// ```
    pub fn new(id: impl Into<String>, written_score: Decimal, interview_score: Decimal) -> Self {
        Self {
            id: id.into(),
            written_score: Some(written_score),
            interview_score: Some(interview_score),
            final_score: final_score(written_score, interview_score),
            years_of_service: None,
            wants_lottery: false,
        }
    }

    /// Sets the years of service tie-breaker.
    pub fn with_years_of_service(mut self, years: u32) -> Self {
        self.years_of_service = Some(years);
        self
    }

    /// Sets the lottery opt-in flag.
    pub fn with_lottery(mut self, wants_lottery: bool) -> Self {
        self.wants_lottery = wants_lottery;
        self
    }

    /// Replaces both component scores and recomputes the stored final score.
    pub fn update_scores(&mut self, written_score: Decimal, interview_score: Decimal) {
        self.written_score = Some(written_score);
        self.interview_score = Some(interview_score);
        self.final_score = final_score(written_score, interview_score);
    }

    /// Returns the final score derived from the component scores.
    ///
    /// # Errors
    ///
    /// Returns `MissingScore` if either component score is absent, or
    /// `ScoreOverflow` if they are too large to average.
    pub fn computed_final_score(&self) -> EngineResult<Decimal> {
        let written = self.written_score.ok_or_else(|| EngineError::MissingScore {
            candidate_id: self.id.clone(),
            field: WRITTEN_SCORE_FIELD.to_string(),
        })?;
        let interview = self
            .interview_score
            .ok_or_else(|| EngineError::MissingScore {
                candidate_id: self.id.clone(),
                field: INTERVIEW_SCORE_FIELD.to_string(),
            })?;
        final_score(written, interview).ok_or_else(|| EngineError::ScoreOverflow {
            candidate_id: self.id.clone(),
        })
    }

    /// Returns the tie-break value, treating an absent value as zero.
    pub fn tie_break(&self) -> u32 {
        self.years_of_service.unwrap_or(0)
    }
}
