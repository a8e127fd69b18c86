//! Policy loading functionality.
//!
//! This module provides the [`PolicyLoader`] type for loading an
//! [`AllocationPolicy`] from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::AllocationPolicy;

/// Loads and validates allocation policies.
///
/// # File Format
///
/// ```text
/// lottery_order: shuffled        # or rank_order
/// lottery_seed: 20240901
/// guaranteed_quota: available_locations
/// min_score: "0"
/// max_score: "100"
/// max_preferences: 10
/// ```
///
/// # Example
///
/// ```no_run
/// use placement_engine::config::PolicyLoader;
///
/// let policy = PolicyLoader::load("./config/policy.yaml")?;
/// println!("Lottery order: {:?}", policy.lottery_order);
/// # Ok::<(), placement_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyLoader;

impl PolicyLoader {
    /// Loads a policy from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns the policy on success, or an error if:
    /// - The file is missing or unreadable (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    /// - The policy contradicts itself (`InvalidPolicy`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<AllocationPolicy> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let policy: AllocationPolicy =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Self::validate(&policy)?;
        Ok(policy)
    }

    /// Parses and validates a policy from an in-memory YAML document.
    ///
    /// # Example
    ///
    /// ```
    /// use placement_engine::config::{LotteryOrder, PolicyLoader};
    ///
    /// let policy = PolicyLoader::from_yaml_str("lottery_order: shuffled").unwrap();
    /// assert_eq!(policy.lottery_order, LotteryOrder::Shuffled);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> EngineResult<AllocationPolicy> {
        let policy: AllocationPolicy =
            serde_yaml::from_str(yaml).map_err(|e| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;

        Self::validate(&policy)?;
        Ok(policy)
    }

    /// Checks a policy for contradictory settings.
    pub fn validate(policy: &AllocationPolicy) -> EngineResult<()> {
        if policy.min_score > policy.max_score {
            return Err(EngineError::InvalidPolicy {
                message: format!(
                    "min_score {} is greater than max_score {}",
                    policy.min_score, policy.max_score
                ),
            });
        }

        if policy.max_preferences == Some(0) {
            return Err(EngineError::InvalidPolicy {
                message: "max_preferences must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LotteryOrder, QuotaPolicy};
    use rust_decimal::Decimal;
    use std::io::Write;

    fn write_temp_policy(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "placement_engine_{}_{}.yaml",
            name,
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_policy_from_file() {
        let path = write_temp_policy(
            "full",
            "lottery_order: shuffled\nlottery_seed: 99\nguaranteed_quota:\n  capped: 3\nmax_preferences: 10\n",
        );

        let policy = PolicyLoader::load(&path).unwrap();
        assert_eq!(policy.lottery_order, LotteryOrder::Shuffled);
        assert_eq!(policy.lottery_seed, Some(99));
        assert_eq!(policy.guaranteed_quota, QuotaPolicy::Capped(3));
        assert_eq!(policy.max_preferences, Some(10));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_missing_file_returns_config_not_found() {
        let result = PolicyLoader::load("/nonexistent/policy.yaml");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("nonexistent"));
            }
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let path = write_temp_policy("broken", "lottery_order: [not, an, order\n");
        let result = PolicyLoader::load(&path);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_capped_quota_from_inline_yaml() {
        let policy = PolicyLoader::from_yaml_str("guaranteed_quota:\n  capped: 3\n").unwrap();
        assert_eq!(policy.guaranteed_quota, QuotaPolicy::Capped(3));

        let flow = PolicyLoader::from_yaml_str("guaranteed_quota: { capped: 2 }").unwrap();
        assert_eq!(flow.guaranteed_quota, QuotaPolicy::Capped(2));
    }

    #[test]
    fn test_unknown_lottery_order_is_parse_error() {
        let result = PolicyLoader::from_yaml_str("lottery_order: coin_flip");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_inverted_score_bounds_are_rejected() {
        let result = PolicyLoader::from_yaml_str("min_score: \"90\"\nmax_score: \"10\"\n");
        match result {
            Err(EngineError::InvalidPolicy { message }) => {
                assert!(message.contains("min_score 90"));
            }
            other => panic!("expected InvalidPolicy, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_preference_limit_is_rejected() {
        let result = PolicyLoader::from_yaml_str("max_preferences: 0");
        assert!(matches!(result, Err(EngineError::InvalidPolicy { .. })));
    }

    #[test]
    fn test_custom_score_bounds() {
        let policy = PolicyLoader::from_yaml_str("max_score: \"50\"").unwrap();
        assert_eq!(policy.max_score, Decimal::from(50));
        assert_eq!(policy.min_score, Decimal::ZERO);
    }
}
