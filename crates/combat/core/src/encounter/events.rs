use crate::action::ActionError;
use crate::combat::HitResult;
use crate::combatant::{CombatantEvent, CombatantId};

/// Everything an encounter reports to collaborators, in emission order.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    // ===== encounter lifecycle =====
    Started,
    Paused,
    Resumed,
    /// Raised exactly once, when one side has no living members.
    CombatFinished { victory: bool },

    // ===== turn flow =====
    /// A ready player-controlled combatant has no queued choice.
    AwaitingInput { actor: CombatantId },
    ActionQueued { actor: CombatantId, action: usize },
    ActionCancelled { actor: CombatantId },
    /// A queued choice failed validation at admission and was dropped.
    ActionRejected { actor: CombatantId, error: ActionError },
    ActionStarted {
        actor: CombatantId,
        action: usize,
        targets: Vec<CombatantId>,
    },
    /// A ready agent had nothing it could do; readiness restarts from 0.
    TurnSkipped { actor: CombatantId },

    // ===== action presentation =====
    MovedToward { actor: CombatantId, target: CombatantId },
    MovedBack { actor: CombatantId },
    HitResolved {
        actor: CombatantId,
        target: CombatantId,
        result: HitResult,
    },

    /// Per-combatant change, stat events included.
    Combatant { id: CombatantId, event: CombatantEvent },
}

impl CombatEvent {
    /// Combatant the event concerns, if any.
    pub fn subject(&self) -> Option<CombatantId> {
        match self {
            CombatEvent::Started
            | CombatEvent::Paused
            | CombatEvent::Resumed
            | CombatEvent::CombatFinished { .. } => None,
            CombatEvent::AwaitingInput { actor }
            | CombatEvent::ActionQueued { actor, .. }
            | CombatEvent::ActionCancelled { actor }
            | CombatEvent::ActionRejected { actor, .. }
            | CombatEvent::ActionStarted { actor, .. }
            | CombatEvent::TurnSkipped { actor }
            | CombatEvent::MovedToward { actor, .. }
            | CombatEvent::MovedBack { actor }
            | CombatEvent::HitResolved { actor, .. } => Some(*actor),
            CombatEvent::Combatant { id, .. } => Some(*id),
        }
    }
}
