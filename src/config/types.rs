//! Allocation policy types.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from YAML policy files. Every field has a default, so an
//! empty document yields [`AllocationPolicy::default`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How members of a lottery pool are ordered before locations are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotteryOrder {
    /// Pool order follows the tie-broken ranking. Fully reproducible.
    #[default]
    RankOrder,
    /// Pool order is randomized with a Fisher-Yates shuffle.
    Shuffled,
}

/// Decides how many top-ranked candidates form the guaranteed tier.
///
/// The quota can never exceed the number of available locations, which is
/// what lets the guaranteed lottery draw promise a location to every pool
/// member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaPolicy {
    /// One guaranteed slot per available location.
    #[default]
    AvailableLocations,
    /// At most this many guaranteed slots.
    Capped(usize),
}

impl QuotaPolicy {
    /// Resolves the guaranteed tier size for a run.
    ///
    /// # Example
    ///
    /// ```
    /// use placement_engine::config::QuotaPolicy;
    ///
    /// assert_eq!(QuotaPolicy::AvailableLocations.resolve(12), 12);
    /// assert_eq!(QuotaPolicy::Capped(5).resolve(12), 5);
    /// assert_eq!(QuotaPolicy::Capped(20).resolve(12), 12);
    /// ```
    pub fn resolve(&self, available_locations: usize) -> usize {
        match self {
            QuotaPolicy::AvailableLocations => available_locations,
            QuotaPolicy::Capped(cap) => (*cap).min(available_locations),
        }
    }
}

/// Lowest accepted component score.
pub const DEFAULT_MIN_SCORE: Decimal = Decimal::ZERO;

/// Highest accepted component score.
pub const DEFAULT_MAX_SCORE: Decimal = Decimal::ONE_HUNDRED;

/// Tunable behaviour of an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    /// Ordering of lottery pools.
    pub lottery_order: LotteryOrder,
    /// Seed for shuffled lottery pools. Without one, shuffles use the thread RNG.
    pub lottery_seed: Option<u64>,
    /// Size of the guaranteed tier, written as `available_locations` or
    /// `{ capped: N }`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub guaranteed_quota: QuotaPolicy,
    /// Lowest accepted written or interview score.
    pub min_score: Decimal,
    /// Highest accepted written or interview score.
    pub max_score: Decimal,
    /// Maximum preference entries per candidate, unchecked when absent.
    pub max_preferences: Option<usize>,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            lottery_order: LotteryOrder::default(),
            lottery_seed: None,
            guaranteed_quota: QuotaPolicy::default(),
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
            max_preferences: None,
        }
    }
}

impl AllocationPolicy {
    /// A policy with shuffled lottery pools driven by a fixed seed.
    pub fn seeded_shuffle(seed: u64) -> Self {
        Self {
            lottery_order: LotteryOrder::Shuffled,
            lottery_seed: Some(seed),
            ..Self::default()
        }
    }
}
