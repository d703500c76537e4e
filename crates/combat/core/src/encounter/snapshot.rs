//! Read-only views of an encounter for collaborators.

use crate::action::TargetScope;
use crate::combatant::{Combatant, CombatantId, Side, TurnPhase};

use super::roster::Roster;
use super::scheduler::EncounterState;

/// One action as offered to a combatant right now.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSummary {
    pub index: usize,
    pub label: String,
    pub energy_cost: i32,
    pub scope: TargetScope,
    /// Valid possible targets, in roster order.
    pub valid_targets: Vec<CombatantId>,
    /// `can_execute` against `valid_targets`.
    pub executable: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub phase: TurnPhase,
    pub health: i32,
    pub max_health: i32,
    pub energy: i32,
    pub max_energy: i32,
    pub readiness: f32,
    pub is_active: bool,
    pub is_selectable: bool,
    pub is_selected: bool,
    pub agent_controlled: bool,
    pub actions: Vec<ActionSummary>,
}

impl CombatantSnapshot {
    pub fn capture(combatant: &Combatant, roster: &Roster) -> Self {
        let actions = combatant
            .actions()
            .iter()
            .enumerate()
            .map(|(index, action)| {
                let valid_targets = action.valid_targets(combatant, roster);
                ActionSummary {
                    index,
                    label: action.label.clone(),
                    energy_cost: action.energy_cost,
                    scope: action.scope,
                    executable: action.can_execute(combatant, &valid_targets),
                    valid_targets,
                }
            })
            .collect();

        let stats = combatant.stats();
        Self {
            id: combatant.id(),
            name: combatant.name().to_owned(),
            side: combatant.side(),
            phase: combatant.phase(),
            health: stats.health(),
            max_health: stats.max_health(),
            energy: stats.energy(),
            max_energy: stats.max_energy(),
            readiness: combatant.readiness(),
            is_active: combatant.is_active(),
            is_selectable: combatant.is_selectable(),
            is_selected: combatant.is_selected(),
            agent_controlled: combatant.is_agent_controlled(),
            actions,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSnapshot {
    pub state: EncounterState,
    pub acting: Option<CombatantId>,
    pub player_menu_open: bool,
    /// Ready player-controlled combatants with no queued choice, in latch order.
    pub awaiting_input: Vec<CombatantId>,
    pub combatants: Vec<CombatantSnapshot>,
}

impl EncounterSnapshot {
    pub fn get(&self, id: CombatantId) -> Option<&CombatantSnapshot> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &CombatantSnapshot> {
        self.combatants.iter().filter(move |c| c.side == side)
    }
}
