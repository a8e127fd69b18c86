//! Allocation policy configuration for the Placement Engine.
//!
//! This module provides the [`AllocationPolicy`] type and a loader that reads
//! it from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use placement_engine::config::PolicyLoader;
//!
//! let policy = PolicyLoader::load("./config/policy.yaml").unwrap();
//! println!("Guaranteed quota: {:?}", policy.guaranteed_quota);
//! ```

mod loader;
mod types;

pub use loader::PolicyLoader;
pub use types::{AllocationPolicy, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE, LotteryOrder, QuotaPolicy};
