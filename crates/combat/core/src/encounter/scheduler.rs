//! EncounterScheduler - the active-time turn queue.
//!
//! Owns the roster, the single acting slot and the encounter state. Each
//! [`tick`](EncounterScheduler::tick) runs, in order:
//!
//! 1. the in-flight action sequence (hits land here; resolution is checked
//!    after every hit),
//! 2. timed bonus countdowns, followed by the same defeat and resolution
//!    check hits get,
//! 3. readiness accrual for every active combatant,
//! 4. agents of ready combatants (pre-turn delay, then a choice),
//! 5. admission of the first ready combatant, in latch order, whose queued
//!    choice still validates, if the acting slot is free.
//!
//! Non-acting combatants keep accruing while an action resolves; only
//! admission into the acting slot is serialized.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::action::{Action, ActionError, ActionEffect, ActionSequence, IllegalReason, SequenceStep, TargetScope};
use crate::combat::resolve_hit;
use crate::combatant::{Combatant, CombatantId, CombatantTemplate, Side};
use crate::ai::AgentStep;
use crate::config::CombatConfig;
use crate::rng::RollSource;

use super::error::{EncounterError, SetupError};
use super::events::CombatEvent;
use super::roster::Roster;
use super::snapshot::{CombatantSnapshot, EncounterSnapshot};

/// Encounter-level state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterState {
    NotStarted,
    Active,
    /// Stopped after starting; `start` resumes.
    Paused,
    /// One side has no living members. Terminal.
    Resolved { victory: bool },
}

impl EncounterState {
    pub const fn is_resolved(&self) -> bool {
        matches!(self, EncounterState::Resolved { .. })
    }
}

/// An action choice waiting for its combatant to be admitted.
#[derive(Clone, Debug, PartialEq, Eq)]
struct QueuedChoice {
    action: usize,
    targets: Vec<CombatantId>,
}

/// The combatant in the acting slot and its execute sequence.
#[derive(Clone, Debug)]
struct ActiveAction {
    actor: CombatantId,
    action: Action,
    sequence: ActionSequence,
}

pub struct EncounterScheduler {
    config: CombatConfig,
    roster: Roster,
    state: EncounterState,
    acting: Option<ActiveAction>,
    ready_queue: VecDeque<CombatantId>,
    queued: BTreeMap<CombatantId, QueuedChoice>,
    /// Defeats already cleared out of the turn bookkeeping.
    defeated: BTreeSet<CombatantId>,
    player_menu_open: bool,
    events: Vec<CombatEvent>,
}

impl EncounterScheduler {
    /// Spawns both sides from their templates.
    ///
    /// Missing stats or an empty side fail here, before anything can tick.
    pub fn new(
        config: CombatConfig,
        players: &[CombatantTemplate],
        enemies: &[CombatantTemplate],
    ) -> Result<Self, SetupError> {
        let roster = Roster::build(players, enemies, &config)?;
        tracing::info!(
            players = players.len(),
            enemies = enemies.len(),
            "encounter prepared"
        );

        Ok(Self {
            config,
            roster,
            state: EncounterState::NotStarted,
            acting: None,
            ready_queue: VecDeque::new(),
            queued: BTreeMap::new(),
            defeated: BTreeSet::new(),
            player_menu_open: false,
            events: Vec::new(),
        })
    }

    // ===== read access =====

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    /// True while the encounter is running (started, not paused, not resolved).
    pub fn is_active(&self) -> bool {
        self.state == EncounterState::Active
    }

    /// Combatant currently resolving an action.
    pub fn acting(&self) -> Option<CombatantId> {
        self.acting.as_ref().map(|active| active.actor)
    }

    pub fn ready_queue(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.ready_queue.iter().copied()
    }

    pub fn has_queued_action(&self, actor: CombatantId) -> bool {
        self.queued.contains_key(&actor)
    }

    pub fn is_player_menu_open(&self) -> bool {
        self.player_menu_open
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            state: self.state,
            acting: self.acting(),
            player_menu_open: self.player_menu_open,
            awaiting_input: self
                .ready_queue
                .iter()
                .copied()
                .filter(|id| {
                    !self.queued.contains_key(id)
                        && self.roster.get(*id).is_some_and(|c| !c.is_agent_controlled())
                })
                .collect(),
            combatants: self
                .roster
                .iter()
                .map(|c| CombatantSnapshot::capture(c, &self.roster))
                .collect(),
        }
    }

    // ===== lifecycle =====

    /// Starts or resumes the encounter.
    ///
    /// Combatants that enter with no Health are defeated on the spot, so a
    /// side that starts empty resolves the encounter immediately.
    pub fn start(&mut self) -> Result<(), EncounterError> {
        let event = match self.state {
            EncounterState::Resolved { .. } => return Err(EncounterError::AlreadyResolved),
            EncounterState::Active => return Ok(()),
            EncounterState::NotStarted => CombatEvent::Started,
            EncounterState::Paused => CombatEvent::Resumed,
        };

        self.state = EncounterState::Active;
        for combatant in self.roster.iter_mut() {
            combatant.set_active(true);
        }
        self.update_time_scales();

        tracing::info!(resumed = (event == CombatEvent::Resumed), "encounter running");
        self.events.push(event);
        self.sweep_defeated();
        Ok(())
    }

    /// Pauses a running encounter. No combatant ticks or acts until `start`.
    pub fn stop(&mut self) {
        if self.state != EncounterState::Active {
            return;
        }

        self.state = EncounterState::Paused;
        for combatant in self.roster.iter_mut() {
            combatant.set_active(false);
        }

        tracing::info!("encounter paused");
        self.events.push(CombatEvent::Paused);
    }

    // ===== collaborator input =====

    /// Queues `(action, targets)` for `actor`, replacing any earlier choice.
    ///
    /// The choice is validated only when the combatant is admitted.
    pub fn queue_action(
        &mut self,
        actor: CombatantId,
        action: usize,
        targets: Vec<CombatantId>,
    ) -> Result<(), EncounterError> {
        if self.state.is_resolved() {
            return Err(EncounterError::AlreadyResolved);
        }

        let combatant = self.combatant(actor)?;
        let Some(chosen) = combatant.action(action) else {
            return Err(ActionError::UnknownAction {
                actor,
                index: action,
            }
            .into());
        };
        if combatant.is_defeated() {
            return Err(ActionError::IllegalAction {
                label: chosen.label.clone(),
                reason: IllegalReason::SourceDefeated,
            }
            .into());
        }

        tracing::debug!("combatant {} queued '{}' against {:?}", actor, chosen.label, targets);
        self.queued.insert(actor, QueuedChoice { action, targets });
        self.events.push(CombatEvent::ActionQueued { actor, action });
        Ok(())
    }

    /// Drops `actor`'s queued choice. Returns false if there was none.
    pub fn cancel_action(&mut self, actor: CombatantId) -> Result<bool, EncounterError> {
        self.combatant(actor)?;
        let cancelled = self.queued.remove(&actor).is_some();
        if cancelled {
            self.events.push(CombatEvent::ActionCancelled { actor });
        }
        Ok(cancelled)
    }

    /// Slows every combatant while a player is browsing menus.
    pub fn set_player_menu_open(&mut self, open: bool) {
        if self.player_menu_open != open {
            self.player_menu_open = open;
            self.update_time_scales();
        }
    }

    pub fn set_selected(&mut self, id: CombatantId, selected: bool) -> Result<(), EncounterError> {
        let combatant = self
            .roster
            .get_mut(id)
            .ok_or(EncounterError::UnknownCombatant { id })?;
        if !combatant.set_selected(selected) {
            return Err(EncounterError::NotSelectable { id });
        }
        self.flush(id);
        Ok(())
    }

    // ===== simulation =====

    /// Advances the encounter by `dt` simulated seconds.
    pub fn tick(&mut self, dt: f32, rolls: &mut impl RollSource) {
        if self.state != EncounterState::Active {
            return;
        }
        let dt = dt.max(0.0);

        self.advance_action(dt, rolls);
        if !self.is_active() {
            return;
        }

        for combatant in self.roster.iter_mut() {
            combatant.tick_bonuses(dt);
        }
        self.sweep_defeated();
        if !self.is_active() {
            return;
        }

        self.accrue(dt);
        self.run_agents(dt, rolls);
        self.admit(rolls);
    }

    /// Takes every event raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.flush_all();
        core::mem::take(&mut self.events)
    }

    // ===== tick phases =====

    fn accrue(&mut self, dt: f32) {
        let mut latched = Vec::new();
        for combatant in self.roster.iter_mut() {
            if combatant.tick(dt, &self.config) {
                latched.push(combatant.id());
            }
        }
        self.flush_all();

        for id in latched {
            self.on_ready(id);
        }
    }

    fn on_ready(&mut self, id: CombatantId) {
        let Some(combatant) = self.roster.get_mut(id) else {
            return;
        };
        tracing::debug!("combatant {} ({}) ready to act", id, combatant.name());

        self.ready_queue.push_back(id);
        match combatant.agent_mut() {
            Some(agent) => agent.begin_turn(),
            None => {
                if !self.queued.contains_key(&id) {
                    self.events.push(CombatEvent::AwaitingInput { actor: id });
                }
            }
        }
    }

    fn run_agents(&mut self, dt: f32, rolls: &mut impl RollSource) {
        let ready: Vec<CombatantId> = self.ready_queue.iter().copied().collect();

        for id in ready {
            if self.queued.contains_key(&id) {
                continue;
            }
            let Some(mut agent) = self.roster.get_mut(id).and_then(Combatant::take_agent) else {
                continue;
            };

            let step = agent.advance(dt, &self.roster, rolls);
            if let Some(combatant) = self.roster.get_mut(id) {
                combatant.restore_agent(agent);
            }

            match step {
                AgentStep::Waiting => {}
                AgentStep::Decided(decision) => {
                    self.events.push(CombatEvent::ActionQueued {
                        actor: id,
                        action: decision.action,
                    });
                    self.queued.insert(
                        id,
                        QueuedChoice {
                            action: decision.action,
                            targets: decision.targets,
                        },
                    );
                }
                AgentStep::Abstain => self.skip_turn(id),
            }
        }
    }

    fn skip_turn(&mut self, id: CombatantId) {
        self.ready_queue.retain(|&queued| queued != id);
        self.queued.remove(&id);
        if let Some(combatant) = self.roster.get_mut(id) {
            combatant.skip_turn(&self.config);
        }
        tracing::debug!("combatant {} skipped its turn", id);
        self.events.push(CombatEvent::TurnSkipped { actor: id });
        self.flush(id);
    }

    fn admit(&mut self, rolls: &mut impl RollSource) {
        if self.acting.is_some() {
            return;
        }

        let ready: Vec<CombatantId> = self.ready_queue.iter().copied().collect();
        for id in ready {
            let Some(choice) = self.queued.remove(&id) else {
                continue;
            };

            match self.validate(id, &choice) {
                Ok((action, targets)) => {
                    self.ready_queue.retain(|&queued| queued != id);
                    self.begin_action(id, choice.action, action, targets);
                    self.advance_action(0.0, rolls);
                    return;
                }
                Err(error) => self.reject(id, error),
            }
        }
    }

    /// Re-checks a queued choice against the current roster.
    ///
    /// Targets are kept in the supplied order, restricted to the action's
    /// possible targets that pass `is_target_valid`, without duplicates.
    fn validate(
        &self,
        id: CombatantId,
        choice: &QueuedChoice,
    ) -> Result<(Action, Vec<CombatantId>), ActionError> {
        let combatant = self
            .roster
            .get(id)
            .ok_or(ActionError::NotReady { actor: id })?;
        if !combatant.is_ready_to_act() {
            return Err(ActionError::NotReady { actor: id });
        }
        let action = combatant
            .action(choice.action)
            .ok_or(ActionError::UnknownAction {
                actor: id,
                index: choice.action,
            })?;

        let possible: BTreeSet<CombatantId> = action
            .possible_targets(combatant, &self.roster)
            .into_iter()
            .collect();
        let mut seen = BTreeSet::new();
        let mut targets: Vec<CombatantId> = action
            .filter_targets(&choice.targets, &self.roster)
            .into_iter()
            .filter(|id| possible.contains(id) && seen.insert(*id))
            .collect();
        if action.scope == TargetScope::Single {
            targets.truncate(1);
        }

        if targets.is_empty() && !choice.targets.is_empty() {
            return Err(ActionError::NoTargets {
                label: action.label.clone(),
            });
        }
        action.check_execute(combatant, &targets)?;
        Ok((action.clone(), targets))
    }

    fn reject(&mut self, id: CombatantId, error: ActionError) {
        let Some(combatant) = self.roster.get_mut(id) else {
            return;
        };

        match combatant.agent_mut() {
            Some(agent) => {
                tracing::debug!("agent {} choice rejected: {}; choosing again", id, error);
                agent.reselect();
            }
            None => {
                tracing::warn!("combatant {} queued action rejected: {}", id, error);
            }
        }

        let awaiting = !combatant.is_agent_controlled();
        self.events.push(CombatEvent::ActionRejected { actor: id, error });
        if awaiting {
            self.events.push(CombatEvent::AwaitingInput { actor: id });
        }
    }

    fn begin_action(
        &mut self,
        actor: CombatantId,
        index: usize,
        action: Action,
        targets: Vec<CombatantId>,
    ) {
        if let Some(combatant) = self.roster.get_mut(actor) {
            tracing::info!(
                "{} uses '{}' on {} target(s)",
                combatant.name(),
                action.label,
                targets.len()
            );
            combatant.begin_action(&action);
        }
        self.flush(actor);

        let sequence = ActionSequence::new(&targets, &self.config.pacing);
        self.events.push(CombatEvent::ActionStarted {
            actor,
            action: index,
            targets,
        });
        self.acting = Some(ActiveAction {
            actor,
            action,
            sequence,
        });
        self.update_time_scales();
    }

    fn advance_action(&mut self, dt: f32, rolls: &mut impl RollSource) {
        let Some(mut active) = self.acting.take() else {
            return;
        };

        for step in active.sequence.advance(dt) {
            match step {
                SequenceStep::MoveTo(target) => self.events.push(CombatEvent::MovedToward {
                    actor: active.actor,
                    target,
                }),
                SequenceStep::ApplyHit(target) => {
                    self.apply_hit(&active, target, rolls);
                    if self.state.is_resolved() {
                        // The rest of the sequence is abandoned.
                        return;
                    }
                }
                SequenceStep::MoveBack => {
                    self.events.push(CombatEvent::MovedBack {
                        actor: active.actor,
                    });
                }
                SequenceStep::Wait(_) => {}
            }
        }

        if active.sequence.is_finished() {
            self.finish_action(active);
        } else {
            self.acting = Some(active);
        }
    }

    fn apply_hit(&mut self, active: &ActiveAction, target: CombatantId, rolls: &mut impl RollSource) {
        let (Some(source), Some(defender)) = (self.roster.get(active.actor), self.roster.get(target))
        else {
            return;
        };
        if defender.is_defeated() {
            return;
        }

        let result = resolve_hit(
            &active.action,
            source.stats(),
            Some(defender.stats().evasion()),
            self.config.damage_variance,
            rolls,
        );
        self.events.push(CombatEvent::HitResolved {
            actor: active.actor,
            target,
            result,
        });

        let Some(defender) = self.roster.get_mut(target) else {
            return;
        };
        defender.receive_hit(&result);
        if let ActionEffect::Bonus {
            stat,
            value,
            duration,
            ..
        } = active.action.effect
        {
            if result.is_successful() && !defender.is_defeated() {
                defender.grant_bonus(stat, &value, duration);
            }
        }
        self.flush(target);
        self.sweep_defeated();
    }

    fn finish_action(&mut self, active: ActiveAction) {
        let actor = active.actor;
        let mut ready_again = false;
        if let Some(combatant) = self.roster.get_mut(actor) {
            combatant.finish_action(active.action.readiness_saved, &self.config);
            ready_again = combatant.is_ready_to_act();
        }
        self.flush(actor);

        self.acting = None;
        self.update_time_scales();

        if ready_again {
            self.on_ready(actor);
        }
    }

    /// Settles every combatant whose Health ran out, by a hit or a stat
    /// change, then checks whether a side is gone.
    fn sweep_defeated(&mut self) {
        let mut fallen = Vec::new();
        for combatant in self.roster.iter_mut() {
            combatant.settle_depletion();
            if combatant.is_defeated() && !self.defeated.contains(&combatant.id()) {
                fallen.push(combatant.id());
            }
        }
        self.flush_all();

        for id in fallen {
            self.on_defeated(id);
        }
        self.check_resolution();
    }

    fn on_defeated(&mut self, id: CombatantId) {
        tracing::info!("combatant {} defeated", id);
        self.defeated.insert(id);
        self.queued.remove(&id);
        self.ready_queue.retain(|&queued| queued != id);
    }

    fn check_resolution(&mut self) {
        if self.roster.is_side_defeated(Side::Enemy) {
            self.resolve(true);
        } else if self.roster.is_side_defeated(Side::Player) {
            self.resolve(false);
        }
    }

    fn resolve(&mut self, victory: bool) {
        if self.state.is_resolved() {
            return;
        }

        self.state = EncounterState::Resolved { victory };
        self.acting = None;
        self.ready_queue.clear();
        self.queued.clear();

        let winners = if victory { Side::Player } else { Side::Enemy };
        for combatant in self.roster.iter_mut() {
            combatant.set_active(false);
            if combatant.side() == winners {
                combatant.celebrate();
            }
        }
        self.flush_all();

        tracing::info!(victory, "combat finished");
        self.events.push(CombatEvent::CombatFinished { victory });
    }

    // ===== helpers =====

    fn combatant(&self, id: CombatantId) -> Result<&Combatant, EncounterError> {
        self.roster
            .get(id)
            .ok_or(EncounterError::UnknownCombatant { id })
    }

    /// Acting slot busy → acting scale; menu open → menu scale; otherwise 1.0.
    fn update_time_scales(&mut self) {
        let scale = if self.acting.is_some() {
            self.config.acting_time_scale
        } else if self.player_menu_open {
            self.config.menu_time_scale
        } else {
            1.0
        };
        for combatant in self.roster.iter_mut() {
            combatant.set_time_scale(scale);
        }
    }

    fn flush(&mut self, id: CombatantId) {
        if let Some(combatant) = self.roster.get_mut(id) {
            self.events.extend(
                combatant
                    .drain_events()
                    .into_iter()
                    .map(|event| CombatEvent::Combatant { id, event }),
            );
        }
    }

    fn flush_all(&mut self) {
        for combatant in self.roster.iter_mut() {
            let id = combatant.id();
            self.events.extend(
                combatant
                    .drain_events()
                    .into_iter()
                    .map(|event| CombatEvent::Combatant { id, event }),
            );
        }
    }
}
