//! Configuration for the Semantic Matcher

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Semantic Matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Number of nearest evidence items to retrieve per requirement
    pub top_k: usize,

    /// Minimum cosine similarity for evidence to reach the judgment call.
    /// When no retrieved item clears this floor, the verdict is
    /// indeterminate and the judgment capability is never invoked.
    pub similarity_floor: f32,

    /// Cap applied to judgment confidence: the final confidence never
    /// exceeds best_similarity * trust_factor
    pub trust_factor: f64,

    /// Maximum time for a single judgment call (seconds)
    pub judgment_timeout_secs: u64,
}

impl MatcherConfig {
    /// Get the judgment timeout as a Duration
    pub fn judgment_timeout(&self) -> Duration {
        Duration::from_secs(self.judgment_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.similarity_floor) {
            return Err("similarity_floor must be within [0.0, 1.0]".to_string());
        }
        if !(0.0..=1.0).contains(&self.trust_factor) {
            return Err("trust_factor must be within [0.0, 1.0]".to_string());
        }
        if self.judgment_timeout_secs == 0 {
            return Err("judgment_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Strict preset: fewer candidates, higher floor, deeper distrust of
    /// judgment confidence
    pub fn strict() -> Self {
        Self {
            top_k: 3,
            similarity_floor: 0.7,
            trust_factor: 0.8,
            judgment_timeout_secs: 30,
        }
    }

    /// Lenient preset: wider retrieval and a lower floor, for sparse
    /// evidence corpora
    pub fn lenient() -> Self {
        Self {
            top_k: 10,
            similarity_floor: 0.3,
            trust_factor: 0.95,
            judgment_timeout_secs: 60,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            similarity_floor: 0.5,
            trust_factor: 0.9,
            judgment_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k, 5);
        assert_eq!(config.similarity_floor, 0.5);
        assert_eq!(config.trust_factor, 0.9);
    }

    #[test]
    fn test_strict_config_is_valid() {
        assert!(MatcherConfig::strict().validate().is_ok());
    }

    #[test]
    fn test_lenient_config_is_valid() {
        assert!(MatcherConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = MatcherConfig::default();
        config.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_floor_rejected() {
        let mut config = MatcherConfig::default();
        config.similarity_floor = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_trust_factor_rejected() {
        let mut config = MatcherConfig::default();
        config.trust_factor = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MatcherConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = MatcherConfig::from_toml(&toml_str).unwrap();

        assert_eq!(parsed.top_k, config.top_k);
        assert_eq!(parsed.similarity_floor, config.similarity_floor);
        assert_eq!(parsed.trust_factor, config.trust_factor);
        assert_eq!(parsed.judgment_timeout_secs, config.judgment_timeout_secs);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed = MatcherConfig::from_toml("top_k = 9\n").unwrap();

        assert_eq!(parsed.top_k, 9);
        assert_eq!(parsed.similarity_floor, MatcherConfig::default().similarity_floor);
        assert_eq!(parsed.trust_factor, MatcherConfig::default().trust_factor);
    }

    #[test]
    fn test_timeout_as_duration() {
        let config = MatcherConfig::default();
        assert_eq!(config.judgment_timeout(), Duration::from_secs(30));
    }
}
