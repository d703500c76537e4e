//! Action catalog loader.
//!
//! Loads named actions from a RON map so rosters can refer to them by key.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::Action;

use crate::loaders::{LoadResult, read_file};

/// Named actions, ordered by key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionCatalog {
    actions: BTreeMap<String, Action>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, action: Action) {
        self.actions.insert(key.into(), action);
    }

    pub fn get(&self, key: &str) -> Option<&Action> {
        self.actions.get(key)
    }

    /// Looks up every key in order; the first unknown key is an error.
    pub fn resolve(&self, keys: &[String]) -> LoadResult<Vec<Action>> {
        keys.iter()
            .map(|key| {
                self.get(key)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Unknown action '{}'", key))
            })
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Loader for action catalogs from RON files.
pub struct ActionCatalogLoader;

impl ActionCatalogLoader {
    /// Load an action catalog.
    ///
    /// RON format: `{ "key": Action, ... }`
    ///
    /// ```ron
    /// {
    ///     "strike": (
    ///         label: "Strike",
    ///         targets_enemies: true,
    ///         effect: Attack(base_damage: 5, hit_chance: 95.0),
    ///     ),
    /// }
    /// ```
    pub fn load(path: &Path) -> LoadResult<ActionCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse action catalog RON at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<ActionCatalog> {
        let actions: BTreeMap<String, Action> = ron::from_str(content)?;
        for (key, action) in &actions {
            Self::validate(key, action)?;
        }
        tracing::debug!(count = actions.len(), "loaded action catalog");
        Ok(ActionCatalog { actions })
    }

    /// Energy cost must be non-negative and saved readiness within `[0, 100]`.
    fn validate(key: &str, action: &Action) -> LoadResult<()> {
        if action.energy_cost < 0 {
            anyhow::bail!(
                "action '{}': energy_cost must be >= 0, got {}",
                key,
                action.energy_cost
            );
        }
        if !(0.0..=100.0).contains(&action.readiness_saved) {
            anyhow::bail!(
                "action '{}': readiness_saved must be within [0, 100], got {}",
                key,
                action.readiness_saved
            );
        }
        Ok(())
    }
}
