//! Execution preconditions and target selection.

use crate::combatant::{Combatant, CombatantId, Side};
use crate::encounter::Roster;

use super::error::{ActionError, IllegalReason};
use super::types::{Action, TargetScope};

impl Action {
    /// Returns true if `source` may perform this action on `targets`.
    pub fn can_execute(&self, source: &Combatant, targets: &[CombatantId]) -> bool {
        self.check_execute(source, targets).is_ok()
    }

    /// Same as [`Self::can_execute`], reporting the first failed precondition.
    pub fn check_execute(
        &self,
        source: &Combatant,
        targets: &[CombatantId],
    ) -> Result<(), ActionError> {
        let reason = if !source.is_alive() {
            IllegalReason::SourceDefeated
        } else if source.stats().energy() < self.energy_cost {
            IllegalReason::InsufficientEnergy {
                required: self.energy_cost,
                available: source.stats().energy(),
            }
        } else if targets.is_empty() {
            IllegalReason::EmptyTargets
        } else {
            return Ok(());
        };

        Err(ActionError::IllegalAction {
            label: self.label.clone(),
            reason,
        })
    }

    /// Default rule: the target is selectable and still alive.
    pub fn is_target_valid(&self, target: &Combatant) -> bool {
        target.is_selectable() && target.is_alive()
    }

    /// Living combatants this action could be aimed at, in roster order.
    ///
    /// Friendly and enemy are relative to the source's side. Friendlies come
    /// before enemies when both flags are set.
    pub fn possible_targets(&self, source: &Combatant, roster: &Roster) -> Vec<CombatantId> {
        if self.scope == TargetScope::SelfOnly {
            return if source.is_alive() {
                vec![source.id()]
            } else {
                Vec::new()
            };
        }

        let mut sides: Vec<Side> = Vec::with_capacity(2);
        if self.targets_friendlies {
            sides.push(source.side());
        }
        if self.targets_enemies {
            sides.push(source.side().opposite());
        }

        sides
            .into_iter()
            .flat_map(|side| roster.side(side))
            .filter(|c| c.is_alive())
            .map(Combatant::id)
            .collect()
    }

    /// Possible targets that also pass [`Self::is_target_valid`].
    pub fn valid_targets(&self, source: &Combatant, roster: &Roster) -> Vec<CombatantId> {
        self.possible_targets(source, roster)
            .into_iter()
            .filter(|&id| roster.get(id).is_some_and(|c| self.is_target_valid(c)))
            .collect()
    }

    /// Keeps the caller's order, dropping ids that are missing or invalid.
    pub fn filter_targets(&self, targets: &[CombatantId], roster: &Roster) -> Vec<CombatantId> {
        targets
            .iter()
            .copied()
            .filter(|&id| roster.get(id).is_some_and(|c| self.is_target_valid(c)))
            .collect()
    }
}
