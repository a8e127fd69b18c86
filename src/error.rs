//! Error types for the Placement Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Errors fall into three groups: validation errors that reject a malformed
//! snapshot before any placement happens, internal consistency errors raised
//! when an invariant the algorithm guarantees is broken, and configuration
//! errors from loading an allocation policy.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Placement Engine.
///
/// # Example
///
/// ```
/// use placement_engine::error::EngineError;
///
/// let error = EngineError::DuplicateLocation {
///     location_id: "loc_1".to_string(),
/// };
/// assert_eq!(error.to_string(), "Duplicate location id: loc_1");
/// assert!(error.is_validation());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The same candidate id appeared more than once in the snapshot.
    #[error("Duplicate candidate id: {candidate_id}")]
    DuplicateCandidate {
        /// The repeated candidate id.
        candidate_id: String,
    },

    /// The same location id appeared more than once in the snapshot.
    #[error("Duplicate location id: {location_id}")]
    DuplicateLocation {
        /// The repeated location id.
        location_id: String,
    },

    /// A candidate is missing one of the scores needed for ranking.
    #[error("Candidate '{candidate_id}' has no {field}")]
    MissingScore {
        /// The candidate with the missing score.
        candidate_id: String,
        /// The name of the missing score field.
        field: String,
    },

    /// A candidate score falls outside the configured bounds.
    #[error("Candidate '{candidate_id}' {field} {value} is outside [{min}, {max}]")]
    ScoreOutOfRange {
        /// The candidate with the offending score.
        candidate_id: String,
        /// The name of the score field.
        field: String,
        /// The offending value.
        value: Decimal,
        /// The lowest accepted score.
        min: Decimal,
        /// The highest accepted score.
        max: Decimal,
    },

    /// A candidate's component scores are too large to average.
    #[error("Final score for candidate '{candidate_id}' overflows")]
    ScoreOverflow {
        /// The candidate whose scores overflow.
        candidate_id: String,
    },

    /// A preference rank was zero.
    #[error("Invalid preference rank {rank} for candidate '{candidate_id}' at location '{location_id}': rank must be positive")]
    InvalidRank {
        /// The candidate owning the preference.
        candidate_id: String,
        /// The location the preference points at.
        location_id: String,
        /// The offending rank.
        rank: u32,
    },

    /// A candidate used the same rank for two preferences.
    #[error("Candidate '{candidate_id}' uses preference rank {rank} more than once")]
    DuplicateRank {
        /// The candidate owning the preferences.
        candidate_id: String,
        /// The repeated rank.
        rank: u32,
    },

    /// A candidate listed the same location twice.
    #[error("Candidate '{candidate_id}' lists location '{location_id}' more than once")]
    DuplicatePreference {
        /// The candidate owning the preferences.
        candidate_id: String,
        /// The repeated location.
        location_id: String,
    },

    /// A preference belongs to a candidate that is not in the snapshot.
    #[error("Preference references unknown candidate: {candidate_id}")]
    UnknownCandidate {
        /// The unknown candidate id.
        candidate_id: String,
    },

    /// A preference points at a location that is not in the snapshot.
    #[error("Candidate '{candidate_id}' prefers unknown location: {location_id}")]
    UnknownLocation {
        /// The candidate owning the preference.
        candidate_id: String,
        /// The unknown location id.
        location_id: String,
    },

    /// A candidate has more preferences than the policy allows.
    #[error("Candidate '{candidate_id}' has {count} preferences, limit is {limit}")]
    TooManyPreferences {
        /// The candidate owning the preferences.
        candidate_id: String,
        /// How many preferences were supplied.
        count: usize,
        /// The configured limit.
        limit: usize,
    },

    /// An invariant guaranteed by the algorithm did not hold.
    #[error("Internal consistency error in {phase}: {message}")]
    InternalConsistency {
        /// The allocation phase that detected the violation.
        phase: String,
        /// A description of the violation.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The allocation policy is self-contradictory.
    #[error("Invalid allocation policy: {message}")]
    InvalidPolicy {
        /// A description of the problem.
        message: String,
    },
}

impl EngineError {
    /// Returns true if the error was caused by a malformed input snapshot.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicateCandidate { .. }
                | EngineError::DuplicateLocation { .. }
                | EngineError::MissingScore { .. }
                | EngineError::ScoreOutOfRange { .. }
                | EngineError::ScoreOverflow { .. }
                | EngineError::InvalidRank { .. }
                | EngineError::DuplicateRank { .. }
                | EngineError::DuplicatePreference { .. }
                | EngineError::UnknownCandidate { .. }
                | EngineError::UnknownLocation { .. }
                | EngineError::TooManyPreferences { .. }
        )
    }

    /// Returns true if the error signals a defect in the engine itself.
    pub fn is_internal(&self) -> bool {
        matches!(self, EngineError::InternalConsistency { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
