//! Loading a content directory from disk.

use std::fs;
use std::path::Path;

use combat_content::ContentFactory;
use combat_core::{ActionEffect, CombatConfig, EncounterScheduler, TargetScope};
use tempfile::TempDir;

fn bundled() -> ContentFactory {
    ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
}

#[test]
fn bundled_content_builds_an_encounter() {
    let factory = bundled();
    let config = factory.load_config().unwrap();
    let catalog = factory.load_actions().unwrap();
    let roster = factory.load_encounter("training", &catalog).unwrap();

    assert_eq!(config, CombatConfig::default());
    assert_eq!(catalog.get("fire_wave").unwrap().scope, TargetScope::All);
    assert!(matches!(
        catalog.get("hex").unwrap().effect,
        ActionEffect::Bonus { .. }
    ));

    let encounter = EncounterScheduler::new(config, &roster.players, &roster.enemies).unwrap();
    assert_eq!(encounter.roster().len(), 4);
}

#[test]
fn partial_config_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("combat.toml"),
        "ready_threshold = 50.0\n[pacing]\nlead_in = 0.0\n",
    )
    .unwrap();

    let config = ContentFactory::new(dir.path()).load_config().unwrap();
    assert_eq!(config.ready_threshold, 50.0);
    assert_eq!(config.pacing.lead_in, 0.0);
    assert_eq!(config.pacing.movement, CombatConfig::default().pacing.movement);
    assert_eq!(config.energy_per_turn, 1);
}

#[test]
fn non_positive_threshold_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("combat.toml"), "ready_threshold = 0.0\n").unwrap();

    let err = ContentFactory::new(dir.path()).load_config().unwrap_err();
    assert!(err.to_string().contains("ready_threshold"));
}

#[test]
fn malformed_catalog_names_the_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("actions.ron"), "{ \"strike\": (label: 5) }").unwrap();

    let err = ContentFactory::new(dir.path()).load_actions().unwrap_err();
    assert!(err.to_string().contains("actions.ron"));
}

#[test]
fn missing_encounter_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("actions.ron"), "{}").unwrap();

    let factory = ContentFactory::new(dir.path());
    let catalog = factory.load_actions().unwrap();
    assert!(catalog.is_empty());
    assert!(factory.load_encounter("nowhere", &catalog).is_err());
}
