//! Application configuration: matcher and engine sections in one file.

use crate::error::{CliError, Result};
use caelus_engine::EngineConfig;
use caelus_matcher::MatcherConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration loaded from a TOML file.
///
/// Either section may be omitted; defaults apply per section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Semantic matcher settings
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Aggregator settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both sections.
    pub fn validate(&self) -> Result<()> {
        self.matcher.validate().map_err(CliError::Config)?;
        self.engine.validate().map_err(CliError::Config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.matcher.top_k, 5);
        assert_eq!(config.engine.max_concurrency, 4);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [matcher]
            top_k = 3
            similarity_floor = 0.6
            trust_factor = 0.8
            judgment_timeout_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.matcher.top_k, 3);
        assert_eq!(config.engine.max_retries, 3);
    }

    #[test]
    fn test_partial_fields_within_section() {
        // A section may list only the fields it overrides
        let config: AppConfig = toml::from_str("[matcher]\ntop_k = 9\n").unwrap();
        assert_eq!(config.matcher.top_k, 9);
        assert_eq!(config.matcher.similarity_floor, MatcherConfig::default().similarity_floor);

        let config: AppConfig = toml::from_str("[engine]\nmax_retries = 7\n").unwrap();
        assert_eq!(config.engine.max_retries, 7);
        assert_eq!(config.engine.max_concurrency, EngineConfig::default().max_concurrency);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("caelus.toml");
        std::fs::write(&path, "[engine]\nmax_concurrency = 2\nmax_retries = 1\nbackoff_base_ms = 50\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.engine.max_concurrency, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("caelus.toml");
        std::fs::write(&path, "[engine]\nmax_concurrency = 0\nmax_retries = 1\nbackoff_base_ms = 50\n").unwrap();

        assert!(AppConfig::load(&path).is_err());
    }
}
