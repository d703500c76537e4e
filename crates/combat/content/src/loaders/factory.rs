//! Content factory for loading a whole content directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::loaders::{
    ActionCatalog, ActionCatalogLoader, ConfigLoader, EncounterContent, EncounterLoader, LoadResult,
};

/// Loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── actions.ron
/// └── encounters/
///     ├── training.ron
///     └── ambush.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `combat.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        if !path.exists() {
            tracing::info!("no combat.toml in {}, using defaults", self.data_dir.display());
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the action catalog from `actions.ron`.
    pub fn load_actions(&self) -> LoadResult<ActionCatalog> {
        let path = self.data_dir.join("actions.ron");
        ActionCatalogLoader::load(&path)
    }

    /// Load `encounters/{name}.ron`, resolving actions against `catalog`.
    pub fn load_encounter(&self, name: &str, catalog: &ActionCatalog) -> LoadResult<EncounterContent> {
        let path = self
            .data_dir
            .join("encounters")
            .join(format!("{}.ron", name));
        EncounterLoader::load(&path, catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let factory = ContentFactory::new("/nonexistent/combat-data");
        assert_eq!(factory.load_config().unwrap(), CombatConfig::default());
        assert!(factory.load_actions().is_err());
    }
}
