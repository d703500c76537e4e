//! Asynchronous abstraction for sourcing player choices.
//!
//! Agent-controlled combatants decide inside the scheduler. Player-controlled
//! combatants raise `AwaitingInput`, and the runtime asks a [`PlayerInput`]
//! implementation what to do: human input, scripted fixtures, or replays.
use async_trait::async_trait;
use combat_core::{CombatantId, EncounterSnapshot, TargetScope};

use super::errors::Result;

/// What a player decided for an awaiting combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerChoice {
    /// Queue `actions[action]` against `targets`.
    Act {
        action: usize,
        targets: Vec<CombatantId>,
    },
    /// Leave the combatant waiting; any queued choice is dropped.
    Cancel,
}

/// Trait for providing choices for player-controlled combatants.
#[async_trait]
pub trait PlayerInput: Send + Sync {
    /// Choose for `actor`, which is ready and has nothing queued.
    ///
    /// # Arguments
    /// * `actor` - The combatant awaiting input
    /// * `snapshot` - Read-only view of the encounter, including each
    ///   action's valid targets and whether it can execute
    async fn choose(&self, actor: CombatantId, snapshot: &EncounterSnapshot) -> Result<PlayerChoice>;
}

/// Picks the first executable action on its first valid target.
///
/// Actions that hit everyone take every valid target. With nothing
/// executable the choice is [`PlayerChoice::Cancel`].
pub struct ScriptedPlayer;

#[async_trait]
impl PlayerInput for ScriptedPlayer {
    async fn choose(&self, actor: CombatantId, snapshot: &EncounterSnapshot) -> Result<PlayerChoice> {
        let Some(combatant) = snapshot.get(actor) else {
            return Ok(PlayerChoice::Cancel);
        };

        let choice = combatant
            .actions
            .iter()
            .find(|action| action.executable)
            .map(|action| {
                let targets = match action.scope {
                    TargetScope::All => action.valid_targets.clone(),
                    TargetScope::Single | TargetScope::SelfOnly => {
                        action.valid_targets.iter().copied().take(1).collect()
                    }
                };
                PlayerChoice::Act {
                    action: action.index,
                    targets,
                }
            })
            .unwrap_or(PlayerChoice::Cancel);

        Ok(choice)
    }
}
