//! Snapshot validation.
//!
//! A snapshot is checked completely before any placement happens. The first
//! malformed record aborts the run with an error naming that record; nothing
//! is dropped or coerced.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::warn;

use crate::config::AllocationPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditWarning, Candidate, INTERVIEW_SCORE_FIELD, Location, PreferenceEntry, WRITTEN_SCORE_FIELD,
};

use super::available::AvailableLocations;

/// Preference lists keyed by candidate id, each sorted by ascending rank.
pub(crate) type PreferenceBook<'a> = HashMap<&'a str, Vec<&'a PreferenceEntry>>;

/// A snapshot that passed validation.
#[derive(Debug)]
pub(crate) struct ValidatedSnapshot<'a> {
    /// Candidates in snapshot order with their recomputed final scores.
    pub scored: Vec<(&'a Candidate, Decimal)>,
    /// Every candidate's preference list.
    pub preferences: PreferenceBook<'a>,
    /// Locations open at run start.
    pub available: AvailableLocations,
    /// Non-fatal findings.
    pub warnings: Vec<AuditWarning>,
}

/// Validates a full snapshot against the policy.
///
/// # Errors
///
/// Returns the first validation error found, checking locations, then
/// candidates, then preferences.
pub(crate) fn validate_snapshot<'a>(
    candidates: &'a [Candidate],
    locations: &'a [Location],
    preferences: &'a [PreferenceEntry],
    policy: &AllocationPolicy,
) -> EngineResult<ValidatedSnapshot<'a>> {
    let location_ids = validate_locations(locations)?;
    let mut warnings = Vec::new();
    let scored = validate_candidates(candidates, policy, &mut warnings)?;
    let candidate_ids: HashSet<&str> = scored.iter().map(|(c, _)| c.id.as_str()).collect();
    let preferences = build_preference_book(preferences, &candidate_ids, &location_ids, policy)?;

    Ok(ValidatedSnapshot {
        scored,
        preferences,
        available: AvailableLocations::from_locations(locations),
        warnings,
    })
}

fn validate_locations(locations: &[Location]) -> EngineResult<HashSet<&str>> {
    let mut seen = HashSet::with_capacity(locations.len());
    for location in locations {
        if !seen.insert(location.id.as_str()) {
            return Err(EngineError::DuplicateLocation {
                location_id: location.id.clone(),
            });
        }
    }
    Ok(seen)
}

fn validate_candidates<'a>(
    candidates: &'a [Candidate],
    policy: &AllocationPolicy,
    warnings: &mut Vec<AuditWarning>,
) -> EngineResult<Vec<(&'a Candidate, Decimal)>> {
    let mut seen = HashSet::with_capacity(candidates.len());
    let mut scored = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) {
            return Err(EngineError::DuplicateCandidate {
                candidate_id: candidate.id.clone(),
            });
        }

        check_score_range(candidate, WRITTEN_SCORE_FIELD, candidate.written_score, policy)?;
        check_score_range(
            candidate,
            INTERVIEW_SCORE_FIELD,
            candidate.interview_score,
            policy,
        )?;
        let final_score = candidate.computed_final_score()?;

        if let Some(stored) = candidate.final_score.filter(|stored| *stored != final_score) {
            warn!(
                candidate_id = %candidate.id,
                stored = %stored,
                recomputed = %final_score,
                "Ignoring stale stored final score"
            );
            warnings.push(AuditWarning {
                code: "STALE_FINAL_SCORE".to_string(),
                message: format!(
                    "Candidate '{}' stored final score {} differs from recomputed {}; using {}",
                    candidate.id, stored, final_score, final_score
                ),
                severity: "medium".to_string(),
            });
        }

        scored.push((candidate, final_score));
    }

    Ok(scored)
}

fn check_score_range(
    candidate: &Candidate,
    field: &str,
    value: Option<Decimal>,
    policy: &AllocationPolicy,
) -> EngineResult<()> {
    let value = value.ok_or_else(|| EngineError::MissingScore {
        candidate_id: candidate.id.clone(),
        field: field.to_string(),
    })?;

    if value < policy.min_score || value > policy.max_score {
        return Err(EngineError::ScoreOutOfRange {
            candidate_id: candidate.id.clone(),
            field: field.to_string(),
            value,
            min: policy.min_score,
            max: policy.max_score,
        });
    }
    Ok(())
}

fn build_preference_book<'a>(
    preferences: &'a [PreferenceEntry],
    candidate_ids: &HashSet<&str>,
    location_ids: &HashSet<&str>,
    policy: &AllocationPolicy,
) -> EngineResult<PreferenceBook<'a>> {
    let mut book: PreferenceBook<'a> = HashMap::new();

    for entry in preferences {
        if !candidate_ids.contains(entry.candidate_id.as_str()) {
            return Err(EngineError::UnknownCandidate {
                candidate_id: entry.candidate_id.clone(),
            });
        }
        if !location_ids.contains(entry.location_id.as_str()) {
            return Err(EngineError::UnknownLocation {
                candidate_id: entry.candidate_id.clone(),
                location_id: entry.location_id.clone(),
            });
        }
        if entry.rank == 0 {
            return Err(EngineError::InvalidRank {
                candidate_id: entry.candidate_id.clone(),
                location_id: entry.location_id.clone(),
                rank: entry.rank,
            });
        }

        let list = book.entry(entry.candidate_id.as_str()).or_default();
        if list.iter().any(|e| e.rank == entry.rank) {
            return Err(EngineError::DuplicateRank {
                candidate_id: entry.candidate_id.clone(),
                rank: entry.rank,
            });
        }
        if list.iter().any(|e| e.location_id == entry.location_id) {
            return Err(EngineError::DuplicatePreference {
                candidate_id: entry.candidate_id.clone(),
                location_id: entry.location_id.clone(),
            });
        }
        list.push(entry);
    }

    if let Some(limit) = policy.max_preferences {
        // Offenders are reported in snapshot order.
        for entry in preferences {
            let count = book.get(entry.candidate_id.as_str()).map_or(0, Vec::len);
            if count > limit {
                return Err(EngineError::TooManyPreferences {
                    candidate_id: entry.candidate_id.clone(),
                    count,
                    limit,
                });
            }
        }
    }

    for list in book.values_mut() {
        list.sort_by_key(|e| e.rank);
    }

    Ok(book)
}
