//! Allocation result models for the Placement Engine.
//!
//! This module contains the [`AllocationOutcome`] type and its associated
//! structures that capture everything an allocation run produces: one
//! assignment per candidate, aggregate counts and an audit trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a candidate ended up (or did not end up) with a location.
///
/// # Example
///
/// ```
/// use placement_engine::models::AssignmentKind;
///
/// let kind = AssignmentKind::Lottery;
/// assert_eq!(serde_json::to_string(&kind).unwrap(), "\"lottery\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    /// Placed at one of the candidate's own preferences.
    Preference,
    /// Placed by the lottery fallback.
    Lottery,
    /// No location.
    Unassigned,
}

/// The ranking tier a candidate was processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Within the guaranteed quota, served before anyone else.
    Guaranteed,
    /// Ranked below the guaranteed quota.
    Remainder,
}

/// The placement decision for a single candidate.
///
/// Build values through [`Assignment::preference`], [`Assignment::lottery`]
/// and [`Assignment::unassigned`] so that `location_id` and `matched_rank`
/// always agree with `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The candidate this decision is for.
    pub candidate_id: String,
    /// The assigned location, if any.
    pub location_id: Option<String>,
    /// How the location was obtained.
    pub kind: AssignmentKind,
    /// The preference rank that matched, for preference placements.
    pub matched_rank: Option<u32>,
    /// 1-based position of the candidate in the priority ranking.
    pub position: usize,
    /// The tier the candidate was processed in.
    pub tier: Tier,
}

impl Assignment {
    /// A placement at the candidate's preference of the given rank.
    pub fn preference(
        candidate_id: impl Into<String>,
        location_id: impl Into<String>,
        rank: u32,
        position: usize,
        tier: Tier,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            location_id: Some(location_id.into()),
            kind: AssignmentKind::Preference,
            matched_rank: Some(rank),
            position,
            tier,
        }
    }

    /// A placement made by the lottery.
    pub fn lottery(
        candidate_id: impl Into<String>,
        location_id: impl Into<String>,
        position: usize,
        tier: Tier,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            location_id: Some(location_id.into()),
            kind: AssignmentKind::Lottery,
            matched_rank: None,
            position,
            tier,
        }
    }

    /// A candidate left without a location.
    pub fn unassigned(candidate_id: impl Into<String>, position: usize, tier: Tier) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            location_id: None,
            kind: AssignmentKind::Unassigned,
            matched_rank: None,
            position,
            tier,
        }
    }

    /// Returns true if the candidate received a location.
    pub fn is_placed(&self) -> bool {
        self.kind != AssignmentKind::Unassigned
    }
}

/// Aggregate counts for an allocation run.
///
/// # Example
///
/// ```
/// use placement_engine::models::AllocationSummary;
///
/// let summary = AllocationSummary {
///     candidates: 4,
///     available_locations: 3,
///     guaranteed_quota: 3,
///     preference_placements: 2,
///     lottery_placements: 1,
///     unassigned: 1,
///     leftover_locations: 0,
/// };
/// assert_eq!(summary.placed(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Number of candidates in the snapshot.
    pub candidates: usize,
    /// Number of locations available at run start.
    pub available_locations: usize,
    /// Size of the guaranteed tier.
    pub guaranteed_quota: usize,
    /// Candidates placed at one of their preferences.
    pub preference_placements: usize,
    /// Candidates placed by the lottery.
    pub lottery_placements: usize,
    /// Candidates left without a location.
    pub unassigned: usize,
    /// Available locations nobody was placed at.
    pub leftover_locations: usize,
}

impl AllocationSummary {
    /// Total number of candidates that received a location.
    pub fn placed(&self) -> usize {
        self.preference_placements + self.lottery_placements
    }
}

/// A single step in the audit trace recording an allocation phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// Machine-readable identifier of the phase.
    pub rule_id: String,
    /// Human-readable name of the phase.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of what happened.
    pub reasoning: String,
}

/// A warning generated during allocation.
///
/// Warnings flag suspicious input that does not prevent a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of phase steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during the run.
    pub warnings: Vec<AuditWarning>,
    /// The total run duration in microseconds.
    pub duration_us: u64,
}

/// Everything an allocation run produces.
///
/// Assignments are listed in processing order, which is not a contract;
/// use [`AllocationOutcome::in_rank_order`] when rank order matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// One assignment per candidate.
    pub assignments: Vec<Assignment>,
    /// Aggregate counts.
    pub summary: AllocationSummary,
    /// Ids of available locations that nobody was placed at, in input order.
    pub leftover_locations: Vec<String>,
    /// Phase by phase record of the run.
    pub audit_trace: AuditTrace,
}

impl AllocationOutcome {
    /// Returns the assignment for a candidate.
    pub fn assignment_for(&self, candidate_id: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.candidate_id == candidate_id)
    }

    /// Returns the placement holding a location, if anyone was placed there.
    pub fn occupant_of(&self, location_id: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.location_id.as_deref() == Some(location_id))
    }

    /// Returns all assignments sorted by ranking position.
    pub fn in_rank_order(&self) -> Vec<&Assignment> {
        let mut ordered: Vec<&Assignment> = self.assignments.iter().collect();
        ordered.sort_by_key(|a| a.position);
        ordered
    }

    /// Returns the placed assignments, the rows a collaborator persists.
    pub fn placements(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| a.is_placed())
    }
}

/// A persistence envelope for an allocation outcome.
///
/// The engine never stamps its own output; callers wrap an outcome once they
/// are ready to store it so that the run can be identified later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRun {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was recorded.
    pub completed_at: DateTime<Utc>,
    /// The version of the engine that produced the outcome.
    pub engine_version: String,
    /// The outcome being recorded.
    pub outcome: AllocationOutcome,
}

impl AllocationRun {
    /// Stamps an outcome with a fresh run id and the current time.
    pub fn record(outcome: AllocationOutcome) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            completed_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_sample_summary() -> AllocationSummary {
        AllocationSummary {
            candidates: 3,
            available_locations: 2,
            guaranteed_quota: 2,
            preference_placements: 1,
            lottery_placements: 1,
            unassigned: 1,
            leftover_locations: 0,
        }
    }

    fn create_sample_outcome() -> AllocationOutcome {
        AllocationOutcome {
            assignments: vec![
                Assignment::lottery("cand_b", "loc_2", 2, Tier::Guaranteed),
                Assignment::unassigned("cand_c", 3, Tier::Remainder),
                Assignment::preference("cand_a", "loc_1", 1, 1, Tier::Guaranteed),
            ],
            summary: create_sample_summary(),
            leftover_locations: vec![],
            audit_trace: AuditTrace {
                steps: vec![],
                warnings: vec![],
                duration_us: 10,
            },
        }
    }

    #[test]
    fn test_assignment_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&AssignmentKind::Preference).unwrap(),
            "\"preference\""
        );
        assert_eq!(
            serde_json::to_string(&AssignmentKind::Unassigned).unwrap(),
            "\"unassigned\""
        );
        assert_eq!(
            serde_json::to_string(&Tier::Guaranteed).unwrap(),
            "\"guaranteed\""
        );
    }

    #[test]
    fn test_constructors_keep_fields_consistent() {
        let pref = Assignment::preference("cand_a", "loc_1", 2, 1, Tier::Guaranteed);
        assert_eq!(pref.kind, AssignmentKind::Preference);
        assert_eq!(pref.matched_rank, Some(2));
        assert!(pref.is_placed());

        let lottery = Assignment::lottery("cand_b", "loc_2", 2, Tier::Remainder);
        assert_eq!(lottery.matched_rank, None);
        assert_eq!(lottery.location_id.as_deref(), Some("loc_2"));

        let none = Assignment::unassigned("cand_c", 3, Tier::Remainder);
        assert_eq!(none.location_id, None);
        assert!(!none.is_placed());
    }

    #[test]
    fn test_unassigned_serializes_null_location() {
        let none = Assignment::unassigned("cand_c", 3, Tier::Remainder);
        let json = serde_json::to_value(&none).unwrap();
        assert_eq!(json["location_id"], serde_json::Value::Null);
        assert_eq!(json["kind"], "unassigned");
    }

    #[test]
    fn test_lookup_helpers() {
        let outcome = create_sample_outcome();

        assert_eq!(
            outcome.assignment_for("cand_b").unwrap().kind,
            AssignmentKind::Lottery
        );
        assert!(outcome.assignment_for("cand_z").is_none());
        assert_eq!(outcome.occupant_of("loc_1").unwrap().candidate_id, "cand_a");
        assert!(outcome.occupant_of("loc_9").is_none());
        assert_eq!(outcome.placements().count(), 2);
    }

    #[test]
    fn test_in_rank_order_sorts_by_position() {
        let outcome = create_sample_outcome();
        let ids: Vec<&str> = outcome
            .in_rank_order()
            .iter()
            .map(|a| a.candidate_id.as_str())
            .collect();
        assert_eq!(ids, vec!["cand_a", "cand_b", "cand_c"]);
    }

    #[test]
    fn test_allocation_run_records_engine_version() {
        let run = AllocationRun::record(create_sample_outcome());
        assert_eq!(run.engine_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(run.outcome.summary.placed(), 2);

        let other = AllocationRun::record(create_sample_outcome());
        assert_ne!(run.run_id, other.run_id);
    }
}
