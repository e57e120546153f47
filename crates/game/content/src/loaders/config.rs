//! Rules configuration loader.

use std::path::Path;

use unicreon_core::RulesConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for the rules configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`RulesConfig`] from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse rules TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("actions_per_turn = 3\n").unwrap();
        assert_eq!(config.actions_per_turn, 3);
        assert_eq!(config.withdrawal_threshold_hours, 24);
        assert_eq!(config.base_carry_capacity, 10);
    }

    #[test]
    fn bad_types_are_reported() {
        let err = ConfigLoader::parse("actions_per_turn = \"deux\"").unwrap_err();
        assert!(err.to_string().contains("rules TOML"));
    }
}
