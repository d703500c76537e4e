//! Runtime orchestration for active-readiness encounters.
//!
//! This crate runs a [`combat_core::EncounterScheduler`] on a worker task,
//! drives its tick from a wall clock or manual stepping, routes player input
//! and publishes every scheduler event on a topic bus. Consumers embed
//! [`Runtime`] to run an encounter and interact with it through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{PlayerChoice, PlayerInput, Result, RuntimeError, RuntimeHandle, ScriptedPlayer};
pub use events::{Event, EventBus, Topic};
pub use runtime::{ClockMode, Runtime, RuntimeBuilder, RuntimeConfig};
