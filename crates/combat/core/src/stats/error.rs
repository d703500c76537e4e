//! Stat system errors.

use crate::error::{ErrorSeverity, GameError};

use super::bonus::{BonusKind, ModifierId};
use super::kind::StatKind;

/// Errors raised by modifier bookkeeping on a [`StatBlock`](super::StatBlock).
///
/// Both variants are recovered locally: the call is a no-op and the caller
/// receives the error (or the `-1` sentinel through the raw API).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    #[error("'{name}' is not a modifiable stat")]
    InvalidStat { name: String },

    #[error("no {kind} {id} on {stat}")]
    UnknownModifierId {
        stat: StatKind,
        kind: BonusKind,
        id: ModifierId,
    },
}

impl StatError {
    pub fn invalid_stat(name: impl Into<String>) -> Self {
        Self::InvalidStat { name: name.into() }
    }
}

impl GameError for StatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidStat { .. } => ErrorSeverity::Validation,
            Self::UnknownModifierId { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStat { .. } => "STAT_INVALID_STAT",
            Self::UnknownModifierId { .. } => "STAT_UNKNOWN_MODIFIER_ID",
        }
    }
}
