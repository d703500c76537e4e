//! Encounter roster loader.
//!
//! Rosters list combatant templates per side. Each template names its
//! actions by catalog key, so the same move can be shared across units.

use std::path::Path;

use combat_core::{AgentConfig, BaseStats, CombatantTemplate, Element, StatBlock};
use serde::Deserialize;

use crate::loaders::{ActionCatalog, LoadResult, read_file};

/// One combatant as written in a roster file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplateSpec {
    pub name: String,
    /// Left out on purpose only for broken content; spawning such a
    /// template fails with `MissingConfiguration`.
    pub stats: Option<BaseStats>,
    pub affinity: Element,
    pub actions: Vec<String>,
    /// Present for agent-controlled combatants.
    pub agent: Option<AgentConfig>,
}

impl TemplateSpec {
    /// Resolves action keys against `catalog`.
    pub fn build(&self, catalog: &ActionCatalog) -> LoadResult<CombatantTemplate> {
        let actions = catalog
            .resolve(&self.actions)
            .map_err(|e| anyhow::anyhow!("Combatant '{}': {}", self.name, e))?;

        let mut template = CombatantTemplate::new(&self.name).with_actions(actions);
        if let Some(base) = self.stats {
            template = template.with_stats(StatBlock::new(base).with_affinity(self.affinity));
        }
        if let Some(agent) = self.agent {
            template = template.with_agent(agent);
        }
        Ok(template)
    }
}

/// Both sides of an encounter, as written.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EncounterSpec {
    pub players: Vec<TemplateSpec>,
    pub enemies: Vec<TemplateSpec>,
}

/// Templates ready to hand to the scheduler.
#[derive(Clone, Debug)]
pub struct EncounterContent {
    pub players: Vec<CombatantTemplate>,
    pub enemies: Vec<CombatantTemplate>,
}

/// Loader for encounter rosters from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load a roster and resolve it against an action catalog.
    ///
    /// RON format:
    ///
    /// ```ron
    /// (
    ///     players: [
    ///         (name: "Knight", stats: Some((speed: 60)), actions: ["strike"]),
    ///     ],
    ///     enemies: [
    ///         (name: "Goblin", stats: Some((speed: 75)), actions: ["strike"],
    ///          agent: Some((profile: Uniform))),
    ///     ],
    /// )
    /// ```
    pub fn load(path: &Path, catalog: &ActionCatalog) -> LoadResult<EncounterContent> {
        let content = read_file(path)?;
        Self::parse(&content, catalog)
            .map_err(|e| anyhow::anyhow!("Failed to load encounter {:?}: {}", path, e))
    }

    pub fn parse(content: &str, catalog: &ActionCatalog) -> LoadResult<EncounterContent> {
        let spec: EncounterSpec = ron::from_str(content)?;
        Self::build(&spec, catalog)
    }

    pub fn build(spec: &EncounterSpec, catalog: &ActionCatalog) -> LoadResult<EncounterContent> {
        let build_side = |side: &[TemplateSpec]| -> LoadResult<Vec<CombatantTemplate>> {
            side.iter().map(|template| template.build(catalog)).collect()
        };

        let content = EncounterContent {
            players: build_side(&spec.players)?,
            enemies: build_side(&spec.enemies)?,
        };
        tracing::debug!(
            players = content.players.len(),
            enemies = content.enemies.len(),
            "loaded encounter roster"
        );
        Ok(content)
    }
}
