//! Heuristics exposed to agents.

use crate::action::Action;
use crate::combatant::{CombatantId, Side};
use crate::encounter::Roster;

/// Score for offering `action` against `targets`.
///
/// # Formula
///
/// ```text
/// priority = 10 - energy_cost
///          + 2 if the action targets enemies
///          + 1 if the action targets friendlies
/// ```
///
/// The target list does not change the score; it is part of the signature so
/// stronger heuristics can weigh who would be hit.
pub fn action_priority(action: &Action, _targets: &[CombatantId]) -> f32 {
    let mut priority = 10.0 - action.energy_cost as f32;
    if action.targets_enemies {
        priority += 2.0;
    }
    if action.targets_friendlies {
        priority += 1.0;
    }
    priority
}

/// Ratio of `side`'s total Health to the opposing side's.
///
/// Returns `+∞` when the opposing side has no Health left.
pub fn evaluate_situation(roster: &Roster, side: Side) -> f32 {
    let own = roster.total_health(side);
    let opposing = roster.total_health(side.opposite());
    if opposing <= 0 {
        return f32::INFINITY;
    }
    own as f32 / opposing as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheaper_hostile_actions_score_higher() {
        let targets = [CombatantId(1)];
        let strike = Action::attack("Strike", 5, 100.0);
        let nova = Action::attack("Nova", 30, 100.0).with_energy_cost(4);
        let mend = Action::heal("Mend", 10).with_energy_cost(1);

        assert_eq!(action_priority(&strike, &targets), 12.0);
        assert_eq!(action_priority(&nova, &targets), 8.0);
        assert_eq!(action_priority(&mend, &targets), 10.0);
        assert_eq!(action_priority(&strike, &[]), 12.0);
    }
}
