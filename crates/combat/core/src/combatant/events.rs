use crate::stats::{BonusKind, ModifierId, StatEvent, StatKind};

/// Observable changes raised by a [`Combatant`](super::Combatant).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantEvent {
    ReadinessChanged(f32),
    /// Readiness latched at the threshold.
    ReadyToAct,
    ActionFinished,
    SelectionToggled(bool),
    /// A successful hit landed; positive damages, negative heals.
    HitReceived(i32),
    HitMissed,
    /// Health reached 0; the combatant is permanently out.
    Defeated,
    BonusGranted {
        stat: StatKind,
        kind: BonusKind,
        id: ModifierId,
    },
    BonusExpired {
        stat: StatKind,
        kind: BonusKind,
        id: ModifierId,
    },
    Stats(StatEvent),
}
