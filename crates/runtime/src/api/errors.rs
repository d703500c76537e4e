//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, encounter control, and player
//! input so clients can bubble them up with consistent context.
use combat_core::{CombatantId, EncounterError, SetupError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("encounter worker command channel closed")]
    CommandChannelClosed,

    #[error("encounter worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("encounter worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("event stream for {topic:?} closed")]
    EventStreamClosed { topic: crate::events::Topic },

    #[error("runtime requires both sides of the roster before building")]
    MissingRoster,

    #[error("player input failed for combatant {actor}: {reason}")]
    PlayerInput { actor: CombatantId, reason: String },

    #[error("encounter did not finish within {ticks} ticks")]
    TickLimitReached { ticks: u64 },

    #[error(transparent)]
    Encounter(#[from] EncounterError),

    #[error(transparent)]
    Setup(#[from] SetupError),
}
