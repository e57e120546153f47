//! Binary configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use unicreon_runtime::RuntimeConfig;

/// Everything the binary needs before it builds a runtime.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub encounter: String,
    pub runtime: RuntimeConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../game/content/data"
            )),
            encounter: "embuscade".to_string(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `UNICREON_DATA_DIR` - Content directory (default: the shipped data)
    /// - `UNICREON_ENCOUNTER` - Encounter script to replay (default: embuscade)
    /// - `UNICREON_SEED` - Dice seed (default: random)
    /// - `UNICREON_GM` - Run the withdrawal sweep (default: false)
    /// - `UNICREON_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = read("UNICREON_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = read("UNICREON_ENCOUNTER") {
            config.encounter = name.trim().to_string();
        }

        config.runtime.seed = read("UNICREON_SEED").and_then(|raw| parse(&raw, "UNICREON_SEED"));

        // A bare `UNICREON_GM=` or any non-boolean value counts as enabled.
        if let Some(raw) = lookup("UNICREON_GM") {
            config.runtime.game_master = parse::<bool>(&raw, "UNICREON_GM").unwrap_or(true);
        }

        if let Some(capacity) =
            read("UNICREON_EVENT_BUFFER").and_then(|raw| parse::<usize>(&raw, "UNICREON_EVENT_BUFFER"))
        {
            config.runtime.event_buffer_size = capacity.max(1);
        }

        config
    }
}

fn parse<T: std::str::FromStr>(raw: &str, key: &str) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value = raw, "ignoring unparsable setting");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_replay_the_shipped_encounter() {
        let config = config(&[]);
        assert_eq!(config.encounter, "embuscade");
        assert!(config.data_dir.ends_with("data"));
        assert_eq!(config.runtime.seed, None);
        assert!(!config.runtime.game_master);
    }

    #[test]
    fn variables_override_defaults() {
        let config = config(&[
            ("UNICREON_DATA_DIR", "/srv/unicreon"),
            ("UNICREON_ENCOUNTER", " duel "),
            ("UNICREON_SEED", "42"),
            ("UNICREON_GM", "false"),
            ("UNICREON_EVENT_BUFFER", "0"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/unicreon"));
        assert_eq!(config.encounter, "duel");
        assert_eq!(config.runtime.seed, Some(42));
        assert!(!config.runtime.game_master);
        assert_eq!(config.runtime.event_buffer_size, 1);
    }

    #[test]
    fn bare_gm_flag_enables_the_sweep() {
        assert!(config(&[("UNICREON_GM", "")]).runtime.game_master);
        assert!(config(&[("UNICREON_GM", "true")]).runtime.game_master);
    }

    #[test]
    fn garbage_seed_is_ignored() {
        assert_eq!(config(&[("UNICREON_SEED", "abc")]).runtime.seed, None);
    }
}
