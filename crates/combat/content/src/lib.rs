//! Data-driven combat content and loaders.
//!
//! This crate turns data files into core types:
//! - Action catalogs (RON, keyed by name)
//! - Encounter rosters (RON, templates referencing catalog keys)
//! - Combat tuning (TOML, [`combat_core::CombatConfig`])
//!
//! Content only describes the starting point of an encounter; nothing here
//! is consulted once the scheduler is running.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionCatalog, ActionCatalogLoader, ConfigLoader, ContentFactory, EncounterContent,
    EncounterLoader, EncounterSpec, LoadResult, TemplateSpec,
};
