//! Decision agent for non-player combatants.

use crate::action::{Action, TargetScope};
use crate::combatant::{Combatant, CombatantId};
use crate::encounter::Roster;
use crate::rng::RollSource;

use super::profile::{AgentConfig, AgentProfile};
use super::scoring;

/// Where the agent is within the current turn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentPhase {
    /// Not this combatant's turn.
    Idle,
    /// Waiting out the pre-turn delay.
    Delayed { remaining: f32 },
    SelectingAction,
    SelectingTargets,
    /// A choice (or abstain) was produced for this turn.
    Done,
}

/// An action index into the controlled combatant's roster plus its targets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub action: usize,
    pub targets: Vec<CombatantId>,
}

/// Result of advancing the agent by one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentStep {
    Waiting,
    Decided(Decision),
    /// No executable action; the turn should be skipped.
    Abstain,
}

/// Chooses an action and targets for one combatant.
///
/// Agents hold no roster reference: the encounter passes the current roster
/// on every call, so an agent never observes stale combatants.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionAgent {
    controlled: CombatantId,
    turn_delay: f32,
    profile: AgentProfile,
    is_active: bool,
    phase: AgentPhase,
}

impl DecisionAgent {
    pub fn new(controlled: CombatantId, config: &AgentConfig, default_turn_delay: f32) -> Self {
        Self {
            controlled,
            turn_delay: config.turn_delay.unwrap_or(default_turn_delay).max(0.0),
            profile: config.profile,
            is_active: true,
            phase: AgentPhase::Idle,
        }
    }

    pub fn controlled(&self) -> CombatantId {
        self.controlled
    }

    pub fn turn_delay(&self) -> f32 {
        self.turn_delay
    }

    pub fn profile(&self) -> AgentProfile {
        self.profile
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    /// Turn signal: start the pre-turn delay.
    pub fn begin_turn(&mut self) {
        self.phase = AgentPhase::Delayed {
            remaining: self.turn_delay,
        };
    }

    /// Choose again on the next advance, skipping the delay.
    pub fn reselect(&mut self) {
        self.phase = AgentPhase::SelectingAction;
    }

    /// Advances the pre-turn delay and decides once it has elapsed.
    pub fn advance(&mut self, dt: f32, roster: &Roster, rolls: &mut impl RollSource) -> AgentStep {
        if !self.is_active {
            self.phase = AgentPhase::Done;
            return AgentStep::Abstain;
        }

        match self.phase {
            AgentPhase::Idle | AgentPhase::Done => return AgentStep::Waiting,
            AgentPhase::Delayed { remaining } => {
                let left = remaining - dt;
                if left > 0.0 {
                    self.phase = AgentPhase::Delayed { remaining: left };
                    return AgentStep::Waiting;
                }
            }
            AgentPhase::SelectingAction | AgentPhase::SelectingTargets => {}
        }

        match self.choose_action(roster, rolls) {
            Some(decision) => AgentStep::Decided(decision),
            None => AgentStep::Abstain,
        }
    }

    /// Picks an executable action and its targets, or `None` to abstain.
    ///
    /// An action qualifies when `can_execute` holds against its valid
    /// possible targets.
    pub fn choose_action(
        &mut self,
        roster: &Roster,
        rolls: &mut impl RollSource,
    ) -> Option<Decision> {
        self.phase = AgentPhase::SelectingAction;

        let Some(source) = roster.get(self.controlled) else {
            self.phase = AgentPhase::Done;
            return None;
        };

        let candidates: Vec<(usize, Vec<CombatantId>)> = source
            .actions()
            .iter()
            .enumerate()
            .filter_map(|(index, action)| {
                let targets = action.valid_targets(source, roster);
                action
                    .can_execute(source, &targets)
                    .then_some((index, targets))
            })
            .collect();

        if candidates.is_empty() {
            tracing::debug!("agent {}: no executable action, abstaining", self.controlled);
            self.phase = AgentPhase::Done;
            return None;
        }

        let picked = match self.profile {
            AgentProfile::Uniform => rolls.pick_index(candidates.len()),
            AgentProfile::Biased {
                attack_probability, ..
            } => Self::pick_biased(source, &candidates, attack_probability, rolls),
            AgentProfile::Priority => self.pick_highest_priority(source, &candidates),
        };
        let (index, valid) = &candidates[picked];
        let action = &source.actions()[*index];

        self.phase = AgentPhase::SelectingTargets;
        let pool = match self.profile {
            AgentProfile::Biased {
                target_enemy_probability,
                ..
            } => Self::gate_targets(source, roster, valid, target_enemy_probability, rolls),
            _ => valid.clone(),
        };
        let targets = self.select_targets(action, pool, rolls);

        tracing::debug!(
            "agent {}: chose '{}' against {:?}",
            self.controlled,
            action.label,
            targets
        );

        self.phase = AgentPhase::Done;
        Some(Decision {
            action: *index,
            targets,
        })
    }

    /// Ratio of own side's Health to the opposing side's; `+∞` if they have none.
    pub fn evaluate_situation(&self, roster: &Roster) -> f32 {
        match roster.get(self.controlled) {
            Some(source) => scoring::evaluate_situation(roster, source.side()),
            None => 0.0,
        }
    }

    pub fn action_priority(&self, action: &Action, targets: &[CombatantId]) -> f32 {
        scoring::action_priority(action, targets)
    }

    pub fn on_defeat(&mut self) {
        self.is_active = false;
        self.phase = AgentPhase::Done;
    }

    pub fn on_victory(&mut self) {
        self.is_active = false;
        self.phase = AgentPhase::Done;
    }

    // ===== helpers =====

    fn select_targets(
        &self,
        action: &Action,
        pool: Vec<CombatantId>,
        rolls: &mut impl RollSource,
    ) -> Vec<CombatantId> {
        match action.scope {
            TargetScope::SelfOnly => vec![self.controlled],
            TargetScope::Single => vec![pool[rolls.pick_index(pool.len())]],
            TargetScope::All => pool,
        }
    }

    fn pick_highest_priority(
        &self,
        source: &Combatant,
        candidates: &[(usize, Vec<CombatantId>)],
    ) -> usize {
        let mut best = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (position, (index, targets)) in candidates.iter().enumerate() {
            let score = self.action_priority(&source.actions()[*index], targets);
            tracing::debug!("  action {}: priority={}", index, score);
            if score > best_score {
                best = position;
                best_score = score;
            }
        }
        best
    }

    fn pick_biased(
        source: &Combatant,
        candidates: &[(usize, Vec<CombatantId>)],
        attack_probability: f32,
        rolls: &mut impl RollSource,
    ) -> usize {
        let kept: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, (index, _))| {
                let roll = rolls.roll_unit();
                if source.actions()[*index].effect.is_attack() {
                    roll <= attack_probability
                } else {
                    roll > attack_probability
                }
            })
            .map(|(position, _)| position)
            .collect();

        if kept.is_empty() {
            rolls.pick_index(candidates.len())
        } else {
            kept[rolls.pick_index(kept.len())]
        }
    }

    fn gate_targets(
        source: &Combatant,
        roster: &Roster,
        valid: &[CombatantId],
        target_enemy_probability: f32,
        rolls: &mut impl RollSource,
    ) -> Vec<CombatantId> {
        let kept: Vec<CombatantId> = valid
            .iter()
            .copied()
            .filter(|&id| {
                let is_enemy = roster
                    .get(id)
                    .is_some_and(|target| target.side() != source.side());
                let roll = rolls.roll_unit();
                if is_enemy {
                    roll <= target_enemy_probability
                } else {
                    roll > target_enemy_probability
                }
            })
            .collect();

        if kept.is_empty() { valid.to_vec() } else { kept }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::CombatantTemplate;
    use crate::config::CombatConfig;
    use crate::rng::ScriptedRolls;
    use crate::stats::{BaseStats, StatBlock};

    fn roster_with(enemy_actions: Vec<Action>, profile: AgentProfile) -> Roster {
        let stats = StatBlock::new(BaseStats::default());
        let hero = CombatantTemplate::new("hero").with_stats(stats.clone());
        let squire = CombatantTemplate::new("squire").with_stats(stats.clone());
        let goblin = CombatantTemplate::new("goblin")
            .with_stats(stats)
            .with_actions(enemy_actions)
            .with_agent(AgentConfig::new(profile).with_turn_delay(0.5));
        Roster::build(&[hero, squire], &[goblin], &CombatConfig::default()).unwrap()
    }

    const GOBLIN: CombatantId = CombatantId(2);

    fn agent(roster: &Roster) -> DecisionAgent {
        roster.get(GOBLIN).and_then(Combatant::agent).cloned().unwrap()
    }

    #[test]
    fn waits_out_turn_delay_before_choosing() {
        let roster = roster_with(vec![Action::attack("Claw", 3, 90.0)], AgentProfile::Uniform);
        let mut agent = agent(&roster);
        let mut rolls = ScriptedRolls::certain().with_index(1);

        assert_eq!(agent.advance(0.25, &roster, &mut rolls), AgentStep::Waiting);
        agent.begin_turn();
        assert_eq!(agent.advance(0.25, &roster, &mut rolls), AgentStep::Waiting);
        assert_eq!(
            agent.advance(0.25, &roster, &mut rolls),
            AgentStep::Decided(Decision {
                action: 0,
                targets: vec![CombatantId(1)],
            })
        );
        assert_eq!(agent.phase(), AgentPhase::Done);
    }

    #[test]
    fn abstains_without_executable_action() {
        let roster = roster_with(
            vec![Action::attack("Nova", 50, 100.0).with_energy_cost(5)],
            AgentProfile::Uniform,
        );
        let mut agent = agent(&roster);
        assert_eq!(agent.choose_action(&roster, &mut ScriptedRolls::certain()), None);
    }

    #[test]
    fn scope_shapes_targets() {
        let roster = roster_with(
            vec![
                Action::attack("Sweep", 2, 100.0).with_scope(TargetScope::All),
                Action::heal("Regrow", 5).with_scope(TargetScope::SelfOnly),
            ],
            AgentProfile::Uniform,
        );
        let mut agent = agent(&roster);

        let sweep = agent
            .choose_action(&roster, &mut ScriptedRolls::certain())
            .unwrap();
        assert_eq!(sweep.targets, vec![CombatantId(0), CombatantId(1)]);

        let regrow = agent
            .choose_action(&roster, &mut ScriptedRolls::certain().with_index(1))
            .unwrap();
        assert_eq!(regrow.action, 1);
        assert_eq!(regrow.targets, vec![GOBLIN]);
    }

    #[test]
    fn priority_profile_prefers_cheap_hostile_actions() {
        let mut roster = roster_with(
            vec![
                Action::heal("Regrow", 5),
                Action::attack("Bite", 4, 100.0).with_energy_cost(2),
                Action::attack("Claw", 3, 100.0),
            ],
            AgentProfile::Priority,
        );
        roster.get_mut(GOBLIN).unwrap().stats_mut().set_energy(5);
        let mut agent = agent(&roster);
        let decision = agent
            .choose_action(&roster, &mut ScriptedRolls::certain())
            .unwrap();
        assert_eq!(decision.action, 2);
    }

    #[test]
    fn biased_profile_falls_back_when_gates_reject_everything() {
        let roster = roster_with(
            vec![Action::attack("Claw", 3, 100.0)],
            AgentProfile::Biased {
                attack_probability: 0.0,
                target_enemy_probability: 0.0,
            },
        );
        let mut agent = agent(&roster);
        let mut rolls = ScriptedRolls {
            percent: 50.0,
            variance: 0.0,
            index: 0,
        };
        let decision = agent.choose_action(&roster, &mut rolls).unwrap();
        assert_eq!(decision.action, 0);
        assert_eq!(decision.targets, vec![CombatantId(0)]);
    }

    #[test]
    fn situation_ratio_and_infinity() {
        let mut roster = roster_with(vec![], AgentProfile::Uniform);
        let agent = agent(&roster);
        assert_eq!(agent.evaluate_situation(&roster), 0.5);

        for id in [CombatantId(0), CombatantId(1)] {
            roster.get_mut(id).unwrap().stats_mut().set_health(0);
        }
        assert_eq!(agent.evaluate_situation(&roster), f32::INFINITY);
    }

    #[test]
    fn defeated_agent_abstains() {
        let roster = roster_with(vec![Action::attack("Claw", 3, 100.0)], AgentProfile::Uniform);
        let mut agent = agent(&roster);
        agent.begin_turn();
        agent.on_defeat();
        assert_eq!(
            agent.advance(1.0, &roster, &mut ScriptedRolls::certain()),
            AgentStep::Abstain
        );
    }
}
