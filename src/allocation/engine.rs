//! The allocation run.
//!
//! [`Allocator`] validates a snapshot, ranks candidates, splits them into the
//! guaranteed and remainder tiers, then runs four phases in strict order:
//!
//! - A: preference pass over the guaranteed tier
//! - B: lottery draw for the guaranteed tier, which must cover its pool
//! - C: preference pass over the remainder tier
//! - D: lottery draw for the remainder tier, until locations run out
//!
//! The guaranteed tier is fully resolved before the remainder tier is looked
//! at, so a lower-ranked candidate can never take a location from an opted-in
//! guaranteed candidate.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::{debug, info};

use crate::config::{AllocationPolicy, LotteryOrder, PolicyLoader};
use crate::error::EngineResult;
use crate::models::{
    AllocationOutcome, AllocationSummary, Assignment, AssignmentKind, AuditStep, AuditTrace,
    AuditWarning, Candidate, Location, PreferenceEntry, Tier,
};

use super::lottery::{LotteryEntrant, draw_guaranteed, draw_remainder, order_pool};
use super::placement::run_preference_pass;
use super::ranking::rank_scored;
use super::validation::validate_snapshot;

/// Runs allocations under a fixed policy.
///
/// # Example
///
/// ```
/// use placement_engine::Allocator;
/// use placement_engine::config::AllocationPolicy;
/// use placement_engine::models::{AssignmentKind, Candidate, Location, PreferenceEntry};
/// use rust_decimal::Decimal;
///
/// let candidates = vec![
///     Candidate::new("ayse", Decimal::from(95), Decimal::from(95)),
///     Candidate::new("mehmet", Decimal::from(80), Decimal::from(80)).with_lottery(true),
/// ];
/// let locations = vec![Location::available("izmir"), Location::available("bursa")];
/// let preferences = vec![PreferenceEntry::new("ayse", "izmir", 1)];
///
/// let allocator = Allocator::new(AllocationPolicy::default());
/// let outcome = allocator.allocate(&candidates, &locations, &preferences).unwrap();
///
/// let mehmet = outcome.assignment_for("mehmet").unwrap();
/// assert_eq!(mehmet.kind, AssignmentKind::Lottery);
/// assert_eq!(mehmet.location_id.as_deref(), Some("bursa"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    policy: AllocationPolicy,
}

impl Allocator {
    /// Creates an allocator for the given policy.
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy this allocator runs under.
    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Runs an allocation over a snapshot.
    ///
    /// Shuffled lottery pools use a generator seeded from the policy's
    /// `lottery_seed` when one is set, and the thread generator otherwise.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed snapshot, `InvalidPolicy`
    /// for a contradictory policy, or `InternalConsistency` if the guaranteed
    /// tier could not be covered.
    pub fn allocate(
        &self,
        candidates: &[Candidate],
        locations: &[Location],
        preferences: &[PreferenceEntry],
    ) -> EngineResult<AllocationOutcome> {
        match self.policy.lottery_seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.allocate_with_rng(candidates, locations, preferences, &mut rng)
            }
            None => {
                let mut rng = rand::rng();
                self.allocate_with_rng(candidates, locations, preferences, &mut rng)
            }
        }
    }

    /// Runs an allocation, drawing any shuffle randomness from `rng`.
    ///
    /// With [`LotteryOrder::RankOrder`] the generator is never touched.
    pub fn allocate_with_rng<R: Rng + ?Sized>(
        &self,
        candidates: &[Candidate],
        locations: &[Location],
        preferences: &[PreferenceEntry],
        rng: &mut R,
    ) -> EngineResult<AllocationOutcome> {
        let started = Instant::now();
        PolicyLoader::validate(&self.policy)?;

        info!(
            candidates = candidates.len(),
            locations = locations.len(),
            preferences = preferences.len(),
            lottery_order = ?self.policy.lottery_order,
            "Starting allocation run"
        );

        let snapshot = validate_snapshot(candidates, locations, preferences, &self.policy)?;
        let mut warnings = snapshot.warnings;
        let mut trace = TraceBuilder::default();

        // Ranking
        let ranked = rank_scored(snapshot.scored);
        let order: Vec<serde_json::Value> = ranked
            .iter()
            .map(|r| {
                json!({
                    "candidate_id": r.candidate.id,
                    "final_score": r.final_score.to_string(),
                    "years_of_service": r.candidate.tie_break(),
                })
            })
            .collect();
        trace.record(
            "candidate_ranking",
            "Candidate Ranking",
            json!({ "candidates": ranked.len() }),
            json!({ "order": order }),
            "Sorted by final score descending, then years of service descending".to_string(),
        );

        // Tier split
        let available = snapshot.available;
        let available_at_start = available.len();
        let quota = self
            .policy
            .guaranteed_quota
            .resolve(available_at_start)
            .min(ranked.len());
        let (guaranteed, remainder) = ranked.split_at(quota);
        trace.record(
            "guarantee_tier_split",
            "Guarantee Tier Split",
            json!({
                "available_locations": available_at_start,
                "quota_policy": self.policy.guaranteed_quota,
            }),
            json!({ "guaranteed": guaranteed.len(), "remainder": remainder.len() }),
            format!(
                "Top {} of {} candidates are guaranteed a placement if they opted in",
                guaranteed.len(),
                ranked.len()
            ),
        );

        if available_at_start == 0 && !ranked.is_empty() {
            warnings.push(AuditWarning {
                code: "NO_AVAILABLE_LOCATIONS".to_string(),
                message: "No location is available; every candidate is unassigned".to_string(),
                severity: "low".to_string(),
            });
        }

        let mut assignments = Vec::with_capacity(ranked.len());

        // Phase A
        let pass = run_preference_pass(
            Tier::Guaranteed,
            guaranteed,
            &snapshot.preferences,
            available,
        );
        let mut pool = pass.lottery_pool;
        trace.record_preference_pass(
            "guaranteed_preference_pass",
            "Guaranteed Preference Pass",
            &pass.assignments,
            &pool,
            pass.available.len(),
        );
        assignments.extend(pass.assignments);

        // Phase B
        order_pool(&mut pool, self.policy.lottery_order, rng);
        let draw = draw_guaranteed(&pool, pass.available)?;
        trace.record_draw(
            "guaranteed_lottery_draw",
            "Guaranteed Lottery Draw",
            self.policy.lottery_order,
            &draw.assignments,
            draw.available.len(),
        );
        assignments.extend(draw.assignments);

        // Phase C
        let pass = run_preference_pass(
            Tier::Remainder,
            remainder,
            &snapshot.preferences,
            draw.available,
        );
        let mut pool = pass.lottery_pool;
        trace.record_preference_pass(
            "remainder_preference_pass",
            "Remainder Preference Pass",
            &pass.assignments,
            &pool,
            pass.available.len(),
        );
        assignments.extend(pass.assignments);

        // Phase D
        order_pool(&mut pool, self.policy.lottery_order, rng);
        let draw = draw_remainder(&pool, pass.available);
        trace.record_draw(
            "remainder_lottery_draw",
            "Remainder Lottery Draw",
            self.policy.lottery_order,
            &draw.assignments,
            draw.available.len(),
        );
        assignments.extend(draw.assignments);

        let leftover_locations = draw.available.into_ids();
        let summary = summarize(
            &assignments,
            available_at_start,
            quota,
            leftover_locations.len(),
        );

        info!(
            placed = summary.placed(),
            preference = summary.preference_placements,
            lottery = summary.lottery_placements,
            unassigned = summary.unassigned,
            leftover = summary.leftover_locations,
            "Allocation run complete"
        );

        Ok(AllocationOutcome {
            assignments,
            summary,
            leftover_locations,
            audit_trace: AuditTrace {
                steps: trace.steps,
                warnings,
                duration_us: started.elapsed().as_micros() as u64,
            },
        })
    }
}

/// Runs an allocation under the default policy.
///
/// The default policy draws lottery pools in ranking order, so the result is
/// fully determined by the snapshot.
///
/// # Example
///
/// ```
/// use placement_engine::allocate;
///
/// let outcome = allocate(&[], &[], &[]).unwrap();
/// assert!(outcome.assignments.is_empty());
/// ```
pub fn allocate(
    candidates: &[Candidate],
    locations: &[Location],
    preferences: &[PreferenceEntry],
) -> EngineResult<AllocationOutcome> {
    Allocator::default().allocate(candidates, locations, preferences)
}

fn summarize(
    assignments: &[Assignment],
    available_locations: usize,
    guaranteed_quota: usize,
    leftover_locations: usize,
) -> AllocationSummary {
    let count = |kind: AssignmentKind| assignments.iter().filter(|a| a.kind == kind).count();

    AllocationSummary {
        candidates: assignments.len(),
        available_locations,
        guaranteed_quota,
        preference_placements: count(AssignmentKind::Preference),
        lottery_placements: count(AssignmentKind::Lottery),
        unassigned: count(AssignmentKind::Unassigned),
        leftover_locations,
    }
}

#[derive(Default)]
struct TraceBuilder {
    steps: Vec<AuditStep>,
}

impl TraceBuilder {
    fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        debug!(rule_id, %reasoning, "Allocation phase finished");
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    fn record_preference_pass(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        assignments: &[Assignment],
        pool: &[LotteryEntrant<'_>],
        remaining: usize,
    ) {
        let placed: Vec<_> = assignments
            .iter()
            .filter(|a| a.kind == AssignmentKind::Preference)
            .map(|a| {
                json!({
                    "candidate_id": a.candidate_id,
                    "location_id": a.location_id,
                    "rank": a.matched_rank,
                })
            })
            .collect();
        let declined: Vec<&str> = assignments
            .iter()
            .filter(|a| a.kind == AssignmentKind::Unassigned)
            .map(|a| a.candidate_id.as_str())
            .collect();
        let waiting: Vec<&str> = pool.iter().map(|e| e.candidate_id).collect();

        let reasoning = format!(
            "{} placed by preference, {} queued for the lottery, {} declined the lottery; {} locations left",
            placed.len(),
            waiting.len(),
            declined.len(),
            remaining
        );

        self.record(
            rule_id,
            rule_name,
            json!({ "candidates": assignments.len() + pool.len() }),
            json!({
                "placed": placed,
                "lottery_pool": waiting,
                "unassigned": declined,
                "remaining_locations": remaining,
            }),
            reasoning,
        );
    }

    fn record_draw(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        order: LotteryOrder,
        assignments: &[Assignment],
        remaining: usize,
    ) {
        let drawn: Vec<_> = assignments
            .iter()
            .map(|a| json!({ "candidate_id": a.candidate_id, "location_id": a.location_id }))
            .collect();
        let missed = assignments.iter().filter(|a| !a.is_placed()).count();

        let reasoning = format!(
            "{} pool members drawn in {:?} order, {} left without a location; {} locations left",
            assignments.len(),
            order,
            missed,
            remaining
        );

        self.record(
            rule_id,
            rule_name,
            json!({ "pool": assignments.len(), "lottery_order": order }),
            json!({ "draws": drawn, "remaining_locations": remaining }),
            reasoning,
        );
    }
}
