//! Action validation errors.
//!
//! These are precondition failures, not faults: the action is simply not
//! offered or not executed, and the encounter keeps running.

use crate::combatant::CombatantId;
use crate::error::{ErrorSeverity, GameError};

/// Why `can_execute` refused an action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalReason {
    #[error("source is defeated")]
    SourceDefeated,

    #[error("needs {required} energy, has {available}")]
    InsufficientEnergy { required: i32, available: i32 },

    #[error("no targets supplied")]
    EmptyTargets,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// `can_execute` is false for this source and target set.
    #[error("'{label}' cannot be executed: {reason}")]
    IllegalAction { label: String, reason: IllegalReason },

    /// Possible-target computation produced nothing usable.
    #[error("'{label}' has no valid targets")]
    NoTargets { label: String },

    /// Index does not name an action in the combatant's roster.
    #[error("combatant {actor} has no action at index {index}")]
    UnknownAction { actor: CombatantId, index: usize },

    /// The combatant has not latched ready.
    #[error("combatant {actor} is not ready to act")]
    NotReady { actor: CombatantId },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IllegalAction { .. } | Self::NoTargets { .. } => ErrorSeverity::Recoverable,
            Self::UnknownAction { .. } => ErrorSeverity::Validation,
            Self::NotReady { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IllegalAction { .. } => "ACTION_ILLEGAL",
            Self::NoTargets { .. } => "ACTION_NO_TARGETS",
            Self::UnknownAction { .. } => "ACTION_UNKNOWN",
            Self::NotReady { .. } => "ACTION_NOT_READY",
        }
    }
}
