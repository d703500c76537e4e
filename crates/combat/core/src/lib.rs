//! Deterministic active-readiness combat rules.
//!
//! `combat-core` defines stats, actions, hit resolution, combatants, decision
//! agents and the encounter scheduler. It performs no I/O and owns no clock
//! or generator: callers drive [`encounter::EncounterScheduler::tick`] with a
//! time delta and a [`rng::RollSource`], then drain the resulting events.
pub mod action;
pub mod ai;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod encounter;
pub mod error;
pub mod rng;
pub mod stats;

pub use action::{
    Action, ActionEffect, ActionError, ActionSequence, BonusValue, IllegalReason, SequenceStep,
    TargetScope,
};
pub use ai::{AgentConfig, AgentPhase, AgentProfile, AgentStep, Decision, DecisionAgent};
pub use combat::{Hit, HitOutcome, HitResult, calculate_damage, compute_hit, resolve_hit};
pub use combatant::{
    Combatant, CombatantEvent, CombatantId, CombatantTemplate, Side, TimedBonus, TurnPhase,
};
pub use config::{ActionPacing, CombatConfig};
pub use encounter::{
    ActionSummary, CombatEvent, CombatantSnapshot, EncounterError, EncounterScheduler,
    EncounterSnapshot, EncounterState, Roster, SetupError,
};
pub use error::{ErrorSeverity, GameError};
pub use rng::{RollSource, ScriptedRolls};
pub use stats::{
    BaseStats, BonusKind, BonusStack, Element, HealthChange, ModifierId, StatBlock, StatError,
    StatEvent, StatKind,
};
