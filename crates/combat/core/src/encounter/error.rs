//! Encounter setup and control errors.

use crate::action::ActionError;
use crate::combatant::{CombatantId, Side};
use crate::error::{ErrorSeverity, GameError};

/// Configuration problems that abort encounter start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// A template has no stat block; the combatant could never tick or act.
    #[error("combatant '{name}' has no stats configured")]
    MissingConfiguration { name: String },

    #[error("the {side} side has no combatants")]
    EmptyRoster { side: Side },
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingConfiguration { .. } => "SETUP_MISSING_CONFIGURATION",
            Self::EmptyRoster { .. } => "SETUP_EMPTY_ROSTER",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("encounter already resolved")]
    AlreadyResolved,

    #[error("no combatant {id} in this encounter")]
    UnknownCombatant { id: CombatantId },

    #[error("combatant {id} cannot be selected")]
    NotSelectable { id: CombatantId },

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Setup(#[from] SetupError),
}

impl GameError for EncounterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyResolved => ErrorSeverity::Recoverable,
            Self::UnknownCombatant { .. } | Self::NotSelectable { .. } => ErrorSeverity::Validation,
            Self::Action(err) => err.severity(),
            Self::Setup(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyResolved => "ENCOUNTER_ALREADY_RESOLVED",
            Self::UnknownCombatant { .. } => "ENCOUNTER_UNKNOWN_COMBATANT",
            Self::NotSelectable { .. } => "ENCOUNTER_NOT_SELECTABLE",
            Self::Action(err) => err.error_code(),
            Self::Setup(err) => err.error_code(),
        }
    }
}
