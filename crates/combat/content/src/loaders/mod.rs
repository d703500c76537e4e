//! Content loaders for reading combat data from files.
//!
//! RON for catalogs and rosters, TOML for tuning. Every loader returns
//! [`LoadResult`] with the offending path in the error message.

pub mod actions;
pub mod config;
pub mod encounter;
pub mod factory;

pub use actions::{ActionCatalog, ActionCatalogLoader};
pub use config::ConfigLoader;
pub use encounter::{EncounterContent, EncounterLoader, EncounterSpec, TemplateSpec};
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
