//! Configuration for the Compliance Aggregator

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for the Compliance Aggregator
///
/// # Examples
///
/// ```
/// use caelus_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.max_concurrency, 4);
///
/// let config = EngineConfig::aggressive();
/// assert_eq!(config.max_concurrency, 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum judgment calls in flight at once
    pub max_concurrency: usize,

    /// Retry attempts for a failed judgment call before the requirement
    /// is recorded as indeterminate
    pub max_retries: u32,

    /// Base delay for exponential retry backoff (milliseconds)
    pub backoff_base_ms: u64,

    /// Per-category weights for the overall score. Categories absent from
    /// the map weight 1.0.
    #[serde(default)]
    pub category_weights: HashMap<String, f64>,
}

impl EngineConfig {
    /// Backoff delay for a given retry attempt (0-based): base, 2x, 4x, ...
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_base_ms.saturating_mul(1_u64 << attempt.min(16)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.backoff_base_ms == 0 {
            return Err("backoff_base_ms must be greater than 0".to_string());
        }
        for (category, weight) in &self.category_weights {
            if *weight <= 0.0 || !weight.is_finite() {
                return Err(format!(
                    "weight for category '{}' must be positive and finite",
                    category
                ));
            }
        }
        Ok(())
    }

    /// Aggressive preset: wide concurrency, one retry, short backoff
    pub fn aggressive() -> Self {
        Self {
            max_concurrency: 8,
            max_retries: 1,
            backoff_base_ms: 100,
            category_weights: HashMap::new(),
        }
    }

    /// Lenient preset: narrow concurrency, patient retries
    pub fn lenient() -> Self {
        Self {
            max_concurrency: 2,
            max_retries: 5,
            backoff_base_ms: 1_000,
            category_weights: HashMap::new(),
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

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            max_retries: 3,
            backoff_base_ms: 250,
            category_weights: HashMap::new(),
        }
    }
}
