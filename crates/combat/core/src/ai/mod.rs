//! Non-player decision making.
//!
//! ```text
//! Idle ──(turn signal)──► Delayed(turn_delay) ──► SelectingAction ──► SelectingTargets ──► Done
//! ```
//!
//! The agent filters its combatant's actions to those that can execute
//! against their valid targets, picks one according to its [`AgentProfile`],
//! then shapes the targets by the action's scope. No qualifying action is an
//! explicit abstain.

pub mod agent;
pub mod profile;
pub mod scoring;

pub use agent::{AgentPhase, AgentStep, Decision, DecisionAgent};
pub use profile::{AgentConfig, AgentProfile};
pub use scoring::{action_priority, evaluate_situation};
