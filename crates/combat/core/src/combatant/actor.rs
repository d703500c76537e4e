//! Live combatant state.

use crate::action::{Action, BonusValue};
use crate::ai::DecisionAgent;
use crate::combat::HitResult;
use crate::config::CombatConfig;
use crate::encounter::SetupError;
use crate::stats::{BonusKind, HealthChange, ModifierId, StatBlock, StatKind};

use super::events::CombatantEvent;
use super::template::CombatantTemplate;
use super::timed::TimedBonus;
use super::{CombatantId, Side, TurnPhase};

/// One participant in an encounter.
///
/// Couples a per-encounter [`StatBlock`], a readiness counter, a fixed
/// roster of actions and, for non-player combatants, a [`DecisionAgent`].
#[derive(Clone, Debug)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    side: Side,

    is_active: bool,
    is_selectable: bool,
    is_selected: bool,

    readiness: f32,
    time_scale: f32,
    phase: TurnPhase,

    stats: StatBlock,
    actions: Vec<Action>,
    agent: Option<DecisionAgent>,
    agent_controlled: bool,
    timed_bonuses: Vec<TimedBonus>,

    events: Vec<CombatantEvent>,
}

impl Combatant {
    /// Builds a combatant from its template, cloning the template's stats.
    ///
    /// Combatants start inactive; the encounter activates them on start.
    pub fn spawn(
        id: CombatantId,
        side: Side,
        template: &CombatantTemplate,
        config: &CombatConfig,
    ) -> Result<Self, SetupError> {
        let stats = template
            .stats
            .as_ref()
            .ok_or_else(|| SetupError::MissingConfiguration {
                name: template.name.clone(),
            })?
            .clone()
            .with_clamp_on_max_change(config.clamp_resources_on_max_change)
            .instantiate();

        let agent = template
            .agent
            .as_ref()
            .map(|agent| DecisionAgent::new(id, agent, config.default_turn_delay));

        Ok(Self {
            id,
            name: template.name.clone(),
            side,
            is_active: false,
            is_selectable: true,
            is_selected: false,
            readiness: 0.0,
            time_scale: 1.0,
            phase: TurnPhase::Ticking,
            stats,
            actions: template.actions.clone(),
            agent_controlled: agent.is_some(),
            agent,
            timed_bonuses: Vec::new(),
            events: Vec::new(),
        })
    }

    // ===== identity =====

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_player(&self) -> bool {
        self.side == Side::Player
    }

    /// True if a decision agent picks this combatant's actions.
    pub fn is_agent_controlled(&self) -> bool {
        self.agent_controlled
    }

    // ===== flags =====

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Defeated combatants stay inactive.
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active && self.phase != TurnPhase::Defeated;
    }

    pub fn is_selectable(&self) -> bool {
        self.is_selectable
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.is_selectable = selectable;
        if !selectable && self.is_selected {
            self.set_selected(false);
        }
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Returns false if selection was refused because the combatant is unselectable.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if selected && !self.is_selectable {
            return false;
        }
        self.is_selected = selected;
        self.events.push(CombatantEvent::SelectionToggled(selected));
        true
    }

    // ===== readiness =====

    pub fn readiness(&self) -> f32 {
        self.readiness
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_ready_to_act(&self) -> bool {
        self.phase == TurnPhase::Ready
    }

    /// Writes readiness, latching ready once the threshold is reached.
    ///
    /// Latching clamps readiness to the threshold, grants the per-turn
    /// energy and suspends accrual until the combatant acts or skips.
    pub fn set_readiness(&mut self, value: f32, config: &CombatConfig) {
        let latches = self.phase == TurnPhase::Ticking && value >= config.ready_threshold;
        self.readiness = if latches {
            config.ready_threshold
        } else {
            value
        };
        self.events
            .push(CombatantEvent::ReadinessChanged(self.readiness));

        if latches {
            self.phase = TurnPhase::Ready;
            self.stats.gain_energy(config.energy_per_turn);
            self.absorb_stat_events();
            self.events.push(CombatantEvent::ReadyToAct);
        }
    }

    /// Accrues `speed × dt × time_scale` readiness. Returns true on latching.
    pub fn tick(&mut self, dt: f32, config: &CombatConfig) -> bool {
        if !self.is_active || self.phase != TurnPhase::Ticking || !self.is_alive() {
            return false;
        }

        let gain = self.stats.speed() as f32 * dt * self.time_scale;
        self.set_readiness(self.readiness + gain, config);
        self.phase == TurnPhase::Ready
    }

    // ===== turn =====

    /// Enters the acting state and pays the action's energy cost up front.
    pub fn begin_action(&mut self, action: &Action) {
        self.phase = TurnPhase::Acting;
        self.stats.spend_energy(action.energy_cost);
        self.absorb_stat_events();
    }

    /// Leaves the acting state; survivors restart from `readiness_saved`.
    pub fn finish_action(&mut self, readiness_saved: f32, config: &CombatConfig) {
        if self.is_alive() && self.phase != TurnPhase::Defeated {
            self.phase = TurnPhase::Ticking;
            self.set_readiness(readiness_saved, config);
        }
        self.events.push(CombatantEvent::ActionFinished);
    }

    /// Gives up a ready turn and restarts accrual from zero.
    pub fn skip_turn(&mut self, config: &CombatConfig) {
        if self.phase == TurnPhase::Ready {
            self.phase = TurnPhase::Ticking;
            self.set_readiness(0.0, config);
        }
    }

    // ===== hits =====

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn is_defeated(&self) -> bool {
        self.phase == TurnPhase::Defeated
    }

    /// Applies a resolved hit. Misses change nothing but are still reported.
    pub fn receive_hit(&mut self, result: &HitResult) -> HealthChange {
        if self.is_defeated() {
            return HealthChange::Unchanged;
        }

        if !result.is_successful() {
            self.events.push(CombatantEvent::HitMissed);
            return HealthChange::Unchanged;
        }

        self.events
            .push(CombatantEvent::HitReceived(result.hit.damage));
        let change = self.stats.take_damage(result.hit.damage);
        self.absorb_stat_events();
        self.settle_depletion();
        change
    }

    /// Defeats the combatant if its Health has run out by any path.
    ///
    /// Returns true only when this call did the defeating.
    pub fn settle_depletion(&mut self) -> bool {
        if self.is_defeated() || self.is_alive() {
            return false;
        }
        self.defeat();
        true
    }

    /// Permanently removes the combatant from play.
    pub fn defeat(&mut self) {
        if self.is_defeated() {
            return;
        }

        self.phase = TurnPhase::Defeated;
        self.is_active = false;
        self.set_selectable(false);
        if let Some(agent) = self.agent.as_mut() {
            agent.on_defeat();
        }
        self.events.push(CombatantEvent::Defeated);
    }

    // ===== timed bonuses =====

    /// Grants a bonus that is removed after `duration` seconds.
    ///
    /// A non-positive duration keeps the bonus for the rest of the encounter.
    pub fn grant_bonus(&mut self, stat: StatKind, value: &BonusValue, duration: f32) -> ModifierId {
        let id = match *value {
            BonusValue::Flat(amount) => self.stats.add_stat_modifier(stat, amount),
            BonusValue::Multiplier(factor) => self.stats.add_stat_multiplier(stat, factor),
        };
        let timed = TimedBonus::new(stat, value, id, duration);

        self.absorb_stat_events();
        self.events.push(CombatantEvent::BonusGranted {
            stat,
            kind: timed.kind,
            id,
        });

        if duration > 0.0 {
            self.timed_bonuses.push(timed);
        }
        self.settle_depletion();
        id
    }

    /// Counts down timed bonuses and removes the expired ones.
    pub fn tick_bonuses(&mut self, dt: f32) {
        if self.timed_bonuses.is_empty() {
            return;
        }

        let mut expired = Vec::new();
        self.timed_bonuses.retain_mut(|bonus| {
            if bonus.tick(dt) {
                expired.push(*bonus);
                false
            } else {
                true
            }
        });

        for bonus in expired {
            let removed = match bonus.kind {
                BonusKind::Modifier => self.stats.remove_stat_modifier(bonus.stat, bonus.id).is_ok(),
                BonusKind::Multiplier => {
                    self.stats.remove_stat_multiplier(bonus.stat, bonus.id).is_ok()
                }
            };
            self.absorb_stat_events();
            if removed {
                self.events.push(CombatantEvent::BonusExpired {
                    stat: bonus.stat,
                    kind: bonus.kind,
                    id: bonus.id,
                });
            }
        }
        self.settle_depletion();
    }

    pub fn timed_bonuses(&self) -> &[TimedBonus] {
        &self.timed_bonuses
    }

    // ===== owned parts =====

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatBlock {
        &mut self.stats
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn agent(&self) -> Option<&DecisionAgent> {
        self.agent.as_ref()
    }

    pub fn agent_mut(&mut self) -> Option<&mut DecisionAgent> {
        self.agent.as_mut()
    }

    /// Lends the agent out so it can read the roster this combatant lives in.
    pub fn take_agent(&mut self) -> Option<DecisionAgent> {
        self.agent.take()
    }

    pub fn restore_agent(&mut self, agent: DecisionAgent) {
        self.agent = Some(agent);
    }

    /// Notifies the agent that its side won.
    pub fn celebrate(&mut self) {
        if let Some(agent) = self.agent.as_mut() {
            agent.on_victory();
        }
    }

    // ===== events =====

    /// Takes every event raised since the last drain, stat events included.
    pub fn drain_events(&mut self) -> Vec<CombatantEvent> {
        self.absorb_stat_events();
        core::mem::take(&mut self.events)
    }

    fn absorb_stat_events(&mut self) {
        self.events
            .extend(self.stats.drain_events().into_iter().map(CombatantEvent::Stats));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Hit, HitOutcome};
    use crate::stats::{BaseStats, StatEvent};

    fn spawn(base: BaseStats) -> Combatant {
        let template = CombatantTemplate::new("unit").with_stats(StatBlock::new(base));
        let mut combatant =
            Combatant::spawn(CombatantId(0), Side::Player, &template, &CombatConfig::default())
                .unwrap();
        combatant.set_active(true);
        combatant
    }

    fn hit(damage: i32) -> HitResult {
        HitResult {
            hit: Hit::new(damage, 100.0),
            outcome: HitOutcome::Hit,
        }
    }

    #[test]
    fn missing_stats_fail_setup() {
        let template = CombatantTemplate::new("ghost");
        let err = Combatant::spawn(CombatantId(3), Side::Enemy, &template, &CombatConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::MissingConfiguration {
                name: "ghost".into()
            }
        );
    }

    #[test]
    fn speed_seventy_latches_on_twelfth_tick() {
        let config = CombatConfig::default();
        let mut unit = spawn(BaseStats::default());

        let mut ticks = 0;
        while !unit.tick(0.125, &config) {
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(ticks + 1, 12);
        assert_eq!(unit.readiness(), 100.0);
        assert_eq!(unit.stats().energy(), 1);

        // Latched combatants stop accruing.
        assert!(!unit.tick(0.125, &config));
        assert_eq!(unit.readiness(), 100.0);
    }

    #[test]
    fn time_scale_slows_accrual() {
        let config = CombatConfig::default();
        let mut unit = spawn(BaseStats::default().with(StatKind::Speed, 40));
        unit.set_time_scale(0.5);
        unit.tick(1.0, &config);
        assert_eq!(unit.readiness(), 20.0);
    }

    #[test]
    fn inactive_combatants_do_not_accrue() {
        let config = CombatConfig::default();
        let mut unit = spawn(BaseStats::default());
        unit.set_active(false);
        assert!(!unit.tick(10.0, &config));
        assert_eq!(unit.readiness(), 0.0);
    }

    #[test]
    fn lethal_hit_defeats_permanently() {
        let mut unit = spawn(BaseStats::default().with(StatKind::MaxHealth, 12));
        unit.set_selected(true);
        assert!(unit.receive_hit(&hit(15)).is_depleted());

        assert!(unit.is_defeated());
        assert!(!unit.is_active());
        assert!(!unit.is_selectable());
        assert!(!unit.is_selected());

        unit.set_active(true);
        assert!(!unit.is_active());
        assert_eq!(unit.receive_hit(&hit(-50)), HealthChange::Unchanged);
        assert_eq!(unit.stats().health(), 0);

        let events = unit.drain_events();
        assert!(events.contains(&CombatantEvent::HitReceived(15)));
        assert!(events.contains(&CombatantEvent::Stats(StatEvent::HealthDepleted)));
        assert!(events.contains(&CombatantEvent::SelectionToggled(false)));
        assert_eq!(events.last(), Some(&CombatantEvent::Defeated));
    }

    #[test]
    fn max_health_debuff_defeats_when_pools_clamp() {
        let config = CombatConfig {
            clamp_resources_on_max_change: true,
            ..CombatConfig::default()
        };
        let template = CombatantTemplate::new("unit").with_stats(StatBlock::new(BaseStats::default()));
        let mut unit = Combatant::spawn(CombatantId(0), Side::Enemy, &template, &config).unwrap();
        unit.set_active(true);

        unit.grant_bonus(StatKind::MaxHealth, &BonusValue::Multiplier(-1.0), 5.0);
        assert_eq!(unit.stats().health(), 0);
        assert!(unit.is_defeated());
        assert!(!unit.is_active());
        assert!(!unit.is_selectable());
        assert!(!unit.tick(10.0, &config));
        assert_eq!(unit.drain_events().last(), Some(&CombatantEvent::Defeated));
    }

    #[test]
    fn zero_health_combatant_never_accrues() {
        let config = CombatConfig::default();
        let mut unit = spawn(BaseStats::default().with(StatKind::MaxHealth, 0));
        assert!(!unit.is_alive());
        assert!(!unit.tick(10.0, &config));
        assert_eq!(unit.readiness(), 0.0);

        assert!(unit.settle_depletion());
        assert!(!unit.settle_depletion());
        assert!(unit.is_defeated());
    }

    #[test]
    fn miss_is_reported_without_damage() {
        let mut unit = spawn(BaseStats::default());
        let miss = HitResult {
            hit: Hit::new(30, 50.0),
            outcome: HitOutcome::Miss,
        };
        assert_eq!(unit.receive_hit(&miss), HealthChange::Unchanged);
        assert_eq!(unit.stats().health(), 100);
        assert_eq!(unit.drain_events(), vec![CombatantEvent::HitMissed]);
    }

    #[test]
    fn finished_action_restores_saved_readiness() {
        let config = CombatConfig::default();
        let mut unit = spawn(BaseStats::default());
        unit.set_readiness(150.0, &config);
        assert!(unit.is_ready_to_act());

        let action = Action::attack("Quick", 1, 100.0).with_readiness_saved(40.0);
        unit.begin_action(&action);
        assert_eq!(unit.phase(), TurnPhase::Acting);
        unit.finish_action(action.readiness_saved, &config);

        assert_eq!(unit.phase(), TurnPhase::Ticking);
        assert_eq!(unit.readiness(), 40.0);
        assert_eq!(unit.drain_events().last(), Some(&CombatantEvent::ActionFinished));
    }

    #[test]
    fn energy_is_paid_before_acting() {
        let config = CombatConfig::default();
        let mut unit = spawn(BaseStats::default());
        unit.stats_mut().set_energy(4);
        unit.set_readiness(100.0, &config);
        assert_eq!(unit.stats().energy(), 5);

        unit.begin_action(&Action::attack("Blast", 10, 100.0).with_energy_cost(3));
        assert_eq!(unit.stats().energy(), 2);
    }

    #[test]
    fn timed_bonus_expires() {
        let mut unit = spawn(BaseStats::default());
        let id = unit.grant_bonus(StatKind::Defense, &BonusValue::Flat(5), 1.0);
        assert_eq!(unit.stats().defense(), 15);

        unit.tick_bonuses(0.5);
        assert_eq!(unit.stats().defense(), 15);
        unit.tick_bonuses(0.5);
        assert_eq!(unit.stats().defense(), 10);
        assert!(unit.timed_bonuses().is_empty());
        assert!(unit.drain_events().contains(&CombatantEvent::BonusExpired {
            stat: StatKind::Defense,
            kind: BonusKind::Modifier,
            id,
        }));
    }

    #[test]
    fn unselectable_combatant_refuses_selection() {
        let mut unit = spawn(BaseStats::default());
        unit.set_selectable(false);
        assert!(!unit.set_selected(true));
        assert!(!unit.is_selected());
    }
}
