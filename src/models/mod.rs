//! Core data models for the Placement Engine.
//!
//! This module contains the snapshot types the engine consumes and the
//! result types it produces.

mod allocation_result;
mod candidate;
mod location;

pub use allocation_result::{
    AllocationOutcome, AllocationRun, AllocationSummary, Assignment, AssignmentKind, AuditStep,
    AuditTrace, AuditWarning, Tier,
};
pub use candidate::{Candidate, INTERVIEW_SCORE_FIELD, WRITTEN_SCORE_FIELD};
pub use location::{Location, PreferenceEntry};
