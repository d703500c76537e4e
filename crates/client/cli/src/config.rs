//! Headless client configuration.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::ClockMode;

/// Everything the binary needs besides the content itself.
#[derive(Clone, Debug, PartialEq)]
pub struct CliConfig {
    pub content_dir: PathBuf,
    pub encounter: String,
    pub seed: u64,
    pub tick_interval: Duration,
    pub clock: ClockMode,
    pub max_ticks: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("crates/combat/content/data"),
            encounter: "training".to_owned(),
            seed: 0,
            tick_interval: Duration::from_millis(50),
            clock: ClockMode::Manual,
            max_ticks: Some(100_000),
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_CONTENT_DIR` - Directory holding `combat.toml`, `actions.ron`
    ///   and `encounters/` (default: `crates/combat/content/data`)
    /// - `COMBAT_ENCOUNTER` - Encounter file name without extension (default: `training`)
    /// - `COMBAT_SEED` - Generator seed (default: 0)
    /// - `COMBAT_TICK_MS` - Tick length in milliseconds (default: 50)
    /// - `COMBAT_REALTIME` - Tick on the wall clock instead of stepping (default: false)
    /// - `COMBAT_MAX_TICKS` - Step limit in manual mode, `0` for none (default: 100000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let parse = |key: &str| read(key).and_then(|value| value.trim().parse::<u64>().ok());

        let mut config = Self::default();

        if let Some(dir) = read("COMBAT_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        if let Some(name) = read("COMBAT_ENCOUNTER") {
            config.encounter = name;
        }
        if let Some(seed) = parse("COMBAT_SEED") {
            config.seed = seed;
        }
        if let Some(ms) = parse("COMBAT_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(realtime) = read("COMBAT_REALTIME").and_then(|v| v.trim().parse::<bool>().ok())
        {
            config.clock = if realtime {
                ClockMode::Realtime
            } else {
                ClockMode::Manual
            };
        }
        if let Some(limit) = parse("COMBAT_MAX_TICKS") {
            config.max_ticks = (limit > 0).then_some(limit);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(CliConfig::from_lookup(lookup(&[])), CliConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = CliConfig::from_lookup(lookup(&[
            ("COMBAT_CONTENT_DIR", "/srv/content"),
            ("COMBAT_ENCOUNTER", "ambush"),
            ("COMBAT_SEED", "99"),
            ("COMBAT_TICK_MS", "20"),
            ("COMBAT_REALTIME", "true"),
            ("COMBAT_MAX_TICKS", "0"),
        ]));

        assert_eq!(config.content_dir, PathBuf::from("/srv/content"));
        assert_eq!(config.encounter, "ambush");
        assert_eq!(config.seed, 99);
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert_eq!(config.clock, ClockMode::Realtime);
        assert_eq!(config.max_ticks, None);
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let config = CliConfig::from_lookup(lookup(&[("COMBAT_SEED", "abc"), ("COMBAT_TICK_MS", "")]));
        assert_eq!(config.seed, 0);
        assert_eq!(config.tick_interval, Duration::from_millis(50));
    }
}
