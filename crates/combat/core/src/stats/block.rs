//! StatBlock - a combatant's live numeric state.
//!
//! Holds base values, one [`BonusStack`] per modifiable stat, the derived
//! values computed from them, and the current Health/Energy pools.
//!
//! A block loaded from configuration is a template. [`StatBlock::instantiate`]
//! produces the per-combatant copy with full Health and empty Energy, so the
//! template itself is never mutated during an encounter.

use core::str::FromStr;

use super::bonus::{BonusKind, BonusStack, ModifierId};
use super::element::Element;
use super::error::StatError;
use super::kind::StatKind;

// ============================================================================
// Base Stats
// ============================================================================

/// Base (unmodified) values for every modifiable stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub max_health: i32,
    pub max_energy: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub hit_chance: i32,
    pub evasion: i32,
}

impl BaseStats {
    pub const fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::MaxHealth => self.max_health,
            StatKind::MaxEnergy => self.max_energy,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
            StatKind::HitChance => self.hit_chance,
            StatKind::Evasion => self.evasion,
        }
    }

    pub fn set(&mut self, stat: StatKind, value: i32) {
        let slot = match stat {
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::MaxEnergy => &mut self.max_energy,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
            StatKind::HitChance => &mut self.hit_chance,
            StatKind::Evasion => &mut self.evasion,
        };
        *slot = value;
    }

    pub fn with(mut self, stat: StatKind, value: i32) -> Self {
        self.set(stat, value);
        self
    }
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_energy: 6,
            attack: 10,
            defense: 10,
            speed: 70,
            hit_chance: 100,
            evasion: 0,
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Observable changes raised by a [`StatBlock`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatEvent {
    HealthChanged { previous: i32, current: i32 },
    /// Raised only on the transition to exactly 0.
    HealthDepleted,
    EnergyChanged { previous: i32, current: i32 },
    /// A derived stat changed value after a recompute.
    StatChanged { stat: StatKind, value: i32 },
}

/// Outcome of a Health write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthChange {
    Unchanged,
    Changed,
    /// Health moved from a positive value to 0.
    Depleted,
}

impl HealthChange {
    pub const fn is_depleted(self) -> bool {
        matches!(self, HealthChange::Depleted)
    }
}

// ============================================================================
// StatBlock
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct StatBlock {
    affinity: Element,
    base: BaseStats,
    derived: [i32; StatKind::COUNT],
    bonuses: [BonusStack; StatKind::COUNT],
    health: i32,
    energy: i32,
    clamp_on_max_change: bool,
    events: Vec<StatEvent>,
}

impl StatBlock {
    /// Creates a template block. Pools start empty until [`Self::init`].
    pub fn new(base: BaseStats) -> Self {
        let mut derived = [0; StatKind::COUNT];
        for stat in StatKind::ALL {
            derived[stat.index()] = BonusStack::new().apply(base.get(stat));
        }

        Self {
            affinity: Element::None,
            base,
            derived,
            bonuses: Default::default(),
            health: 0,
            energy: 0,
            clamp_on_max_change: false,
            events: Vec::new(),
        }
    }

    pub fn with_affinity(mut self, affinity: Element) -> Self {
        self.affinity = affinity;
        self
    }

    /// Clamp Health/Energy down immediately when MaxHealth/MaxEnergy shrink.
    ///
    /// Off by default: a lowered max only bounds future writes.
    pub fn with_clamp_on_max_change(mut self, enabled: bool) -> Self {
        self.clamp_on_max_change = enabled;
        self
    }

    /// Returns a fresh per-encounter copy of this template.
    pub fn instantiate(&self) -> Self {
        let mut block = self.clone();
        block.init();
        block
    }

    /// Fills Health to MaxHealth and empties Energy without raising events.
    pub fn init(&mut self) {
        self.health = self.max_health();
        self.energy = 0;
        self.events.clear();
    }

    // ===== read access =====

    pub fn affinity(&self) -> Element {
        self.affinity
    }

    pub fn base(&self) -> &BaseStats {
        &self.base
    }

    /// Current derived value of a stat.
    pub fn get(&self, stat: StatKind) -> i32 {
        self.derived[stat.index()]
    }

    pub fn bonuses(&self, stat: StatKind) -> &BonusStack {
        &self.bonuses[stat.index()]
    }

    pub fn max_health(&self) -> i32 {
        self.get(StatKind::MaxHealth)
    }

    pub fn max_energy(&self) -> i32 {
        self.get(StatKind::MaxEnergy)
    }

    pub fn attack(&self) -> i32 {
        self.get(StatKind::Attack)
    }

    pub fn defense(&self) -> i32 {
        self.get(StatKind::Defense)
    }

    pub fn speed(&self) -> i32 {
        self.get(StatKind::Speed)
    }

    pub fn hit_chance(&self) -> i32 {
        self.get(StatKind::HitChance)
    }

    pub fn evasion(&self) -> i32 {
        self.get(StatKind::Evasion)
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    // ===== base values =====

    pub fn set_base(&mut self, stat: StatKind, value: i32) {
        self.base.set(stat, value);
        self.recompute(stat);
    }

    /// Recomputes one derived stat from its base and bonus stack.
    ///
    /// Only the named stat's derived value is written.
    pub fn recompute(&mut self, stat: StatKind) {
        let value = self.bonuses[stat.index()].apply(self.base.get(stat));
        let slot = &mut self.derived[stat.index()];
        if *slot == value {
            return;
        }
        *slot = value;
        self.events.push(StatEvent::StatChanged { stat, value });

        if self.clamp_on_max_change {
            match stat {
                StatKind::MaxHealth if self.health > value => {
                    self.set_health(value);
                }
                StatKind::MaxEnergy if self.energy > value => {
                    self.set_energy(value);
                }
                _ => {}
            }
        }
    }

    // ===== modifiers by name =====

    /// Adds a modifier by stat name, returning its id or `-1` for an unknown stat.
    pub fn add_modifier(&mut self, stat: &str, value: i32) -> i64 {
        ModifierId::raw_or_sentinel(self.try_add_modifier(stat, value))
    }

    /// Adds a multiplier by stat name, returning its id or `-1` for an unknown stat.
    pub fn add_multiplier(&mut self, stat: &str, value: f32) -> i64 {
        ModifierId::raw_or_sentinel(self.try_add_multiplier(stat, value))
    }

    pub fn try_add_modifier(&mut self, stat: &str, value: i32) -> Result<ModifierId, StatError> {
        let stat = Self::parse_stat(stat)?;
        Ok(self.add_stat_modifier(stat, value))
    }

    pub fn try_add_multiplier(&mut self, stat: &str, value: f32) -> Result<ModifierId, StatError> {
        let stat = Self::parse_stat(stat)?;
        Ok(self.add_stat_multiplier(stat, value))
    }

    pub fn remove_modifier(&mut self, stat: &str, id: ModifierId) -> Result<(), StatError> {
        let stat = Self::parse_stat(stat)?;
        self.remove_stat_modifier(stat, id).map(|_| ())
    }

    pub fn remove_multiplier(&mut self, stat: &str, id: ModifierId) -> Result<(), StatError> {
        let stat = Self::parse_stat(stat)?;
        self.remove_stat_multiplier(stat, id).map(|_| ())
    }

    // ===== modifiers by kind =====

    pub fn add_stat_modifier(&mut self, stat: StatKind, value: i32) -> ModifierId {
        let id = self.bonuses[stat.index()].add_modifier(value);
        self.recompute(stat);
        id
    }

    pub fn add_stat_multiplier(&mut self, stat: StatKind, value: f32) -> ModifierId {
        let id = self.bonuses[stat.index()].add_multiplier(value);
        self.recompute(stat);
        id
    }

    /// Removes a modifier and returns its value.
    pub fn remove_stat_modifier(&mut self, stat: StatKind, id: ModifierId) -> Result<i32, StatError> {
        match self.bonuses[stat.index()].remove_modifier(id) {
            Some(value) => {
                self.recompute(stat);
                Ok(value)
            }
            None => Err(Self::unknown_id(stat, BonusKind::Modifier, id)),
        }
    }

    /// Removes a multiplier and returns its value.
    pub fn remove_stat_multiplier(
        &mut self,
        stat: StatKind,
        id: ModifierId,
    ) -> Result<f32, StatError> {
        match self.bonuses[stat.index()].remove_multiplier(id) {
            Some(value) => {
                self.recompute(stat);
                Ok(value)
            }
            None => Err(Self::unknown_id(stat, BonusKind::Multiplier, id)),
        }
    }

    // ===== pools =====

    /// Writes Health, clamped to `[0, MaxHealth]`.
    pub fn set_health(&mut self, value: i32) -> HealthChange {
        let previous = self.health;
        let current = value.clamp(0, self.max_health().max(0));
        if current == previous {
            return HealthChange::Unchanged;
        }

        self.health = current;
        self.events
            .push(StatEvent::HealthChanged { previous, current });

        if current == 0 {
            self.events.push(StatEvent::HealthDepleted);
            HealthChange::Depleted
        } else {
            HealthChange::Changed
        }
    }

    /// Writes Energy, clamped to `[0, MaxEnergy]`. Returns true if it changed.
    pub fn set_energy(&mut self, value: i32) -> bool {
        let previous = self.energy;
        let current = value.clamp(0, self.max_energy().max(0));
        if current == previous {
            return false;
        }

        self.energy = current;
        self.events
            .push(StatEvent::EnergyChanged { previous, current });
        true
    }

    /// Subtracts a signed amount from Health. Negative amounts heal.
    pub fn take_damage(&mut self, amount: i32) -> HealthChange {
        self.set_health(self.health.saturating_sub(amount))
    }

    pub fn gain_energy(&mut self, amount: i32) -> bool {
        self.set_energy(self.energy.saturating_add(amount))
    }

    pub fn spend_energy(&mut self, amount: i32) -> bool {
        self.set_energy(self.energy.saturating_sub(amount))
    }

    /// Takes every event raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<StatEvent> {
        core::mem::take(&mut self.events)
    }

    // ===== helpers =====

    fn parse_stat(name: &str) -> Result<StatKind, StatError> {
        StatKind::from_str(name).map_err(|_| {
            tracing::warn!(stat = name, "rejected bonus on unknown stat");
            StatError::invalid_stat(name)
        })
    }

    fn unknown_id(stat: StatKind, kind: BonusKind, id: ModifierId) -> StatError {
        tracing::warn!(%stat, %kind, %id, "no such bonus to remove");
        StatError::UnknownModifierId { stat, kind, id }
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::new(BaseStats::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(base: BaseStats) -> StatBlock {
        StatBlock::new(base).instantiate()
    }

    #[test]
    fn instantiate_fills_health_and_leaves_template_untouched() {
        let template = StatBlock::new(BaseStats::default().with(StatKind::MaxHealth, 40));
        let mut live = template.instantiate();

        assert_eq!(live.health(), 40);
        assert_eq!(live.energy(), 0);
        assert!(live.drain_events().is_empty());

        live.add_stat_modifier(StatKind::Attack, 5);
        live.set_health(10);
        assert_eq!(template.attack(), 10);
        assert_eq!(template.health(), 0);
    }

    #[test]
    fn derived_value_follows_formula() {
        let mut stats = block(BaseStats::default());
        assert_eq!(stats.try_add_multiplier("attack", 0.5).unwrap(), ModifierId(0));
        assert_eq!(stats.try_add_multiplier("attack", -0.3).unwrap(), ModifierId(1));
        assert_eq!(stats.attack(), 12);

        assert_eq!(stats.add_modifier("attack", 3), 0);
        assert_eq!(stats.attack(), 15);
    }

    #[test]
    fn unknown_stat_returns_sentinel_and_changes_nothing() {
        let mut stats = block(BaseStats::default());
        let before: Vec<i32> = StatKind::ALL.iter().map(|&s| stats.get(s)).collect();

        assert_eq!(stats.add_modifier("luck", 5), -1);
        assert_eq!(stats.add_multiplier("base_speed", 1.0), -1);
        assert_eq!(
            stats.try_add_modifier("luck", 5),
            Err(StatError::invalid_stat("luck"))
        );

        let after: Vec<i32> = StatKind::ALL.iter().map(|&s| stats.get(s)).collect();
        assert_eq!(before, after);
        assert!(stats.drain_events().is_empty());
    }

    #[test]
    fn removing_bonus_round_trips() {
        let mut stats = block(BaseStats::default());
        stats.add_stat_multiplier(StatKind::Speed, 0.2);
        let before = stats.speed();

        let id = stats.add_stat_modifier(StatKind::Speed, -13);
        assert_ne!(stats.speed(), before);
        assert_eq!(stats.remove_stat_modifier(StatKind::Speed, id), Ok(-13));
        assert_eq!(stats.speed(), before);
    }

    #[test]
    fn removing_unknown_id_is_rejected() {
        let mut stats = block(BaseStats::default());
        let err = stats.remove_modifier("defense", ModifierId(3)).unwrap_err();
        assert!(matches!(
            err,
            StatError::UnknownModifierId {
                stat: StatKind::Defense,
                kind: BonusKind::Modifier,
                ..
            }
        ));
        assert_eq!(stats.defense(), 10);
    }

    #[test]
    fn recompute_touches_only_named_stat() {
        let mut stats = block(BaseStats::default());
        stats.add_stat_multiplier(StatKind::Attack, 1.0);
        assert_eq!(stats.attack(), 20);
        assert_eq!(stats.defense(), 10);
        assert_eq!(stats.speed(), 70);
        assert_eq!(
            stats.drain_events(),
            vec![StatEvent::StatChanged {
                stat: StatKind::Attack,
                value: 20
            }]
        );
    }

    #[test]
    fn health_is_clamped() {
        let mut stats = block(BaseStats::default().with(StatKind::MaxHealth, 50));
        assert_eq!(stats.set_health(500), HealthChange::Unchanged);
        assert_eq!(stats.health(), 50);

        assert_eq!(stats.set_health(-20), HealthChange::Depleted);
        assert_eq!(stats.health(), 0);
    }

    #[test]
    fn depletion_fires_once() {
        let mut stats = block(BaseStats::default().with(StatKind::MaxHealth, 12));
        stats.take_damage(5);
        stats.take_damage(20);
        stats.set_health(0);
        stats.take_damage(3);

        let depleted = stats
            .drain_events()
            .into_iter()
            .filter(|e| *e == StatEvent::HealthDepleted)
            .count();
        assert_eq!(depleted, 1);
    }

    #[test]
    fn healing_is_bounded_by_max() {
        let mut stats = block(BaseStats::default().with(StatKind::MaxHealth, 30));
        stats.set_health(10);
        stats.drain_events();

        assert_eq!(stats.take_damage(-50), HealthChange::Changed);
        assert_eq!(stats.health(), 30);
        assert_eq!(
            stats.drain_events(),
            vec![StatEvent::HealthChanged {
                previous: 10,
                current: 30
            }]
        );
    }

    #[test]
    fn energy_is_clamped_and_reports_changes() {
        let mut stats = block(BaseStats::default());
        assert!(stats.gain_energy(4));
        assert!(stats.gain_energy(10));
        assert_eq!(stats.energy(), 6);
        assert!(!stats.gain_energy(1));
        assert!(stats.spend_energy(2));
        assert_eq!(stats.energy(), 4);
    }

    #[test]
    fn lowered_max_does_not_clamp_by_default() {
        let mut stats = block(BaseStats::default());
        let id = stats.add_stat_modifier(StatKind::MaxHealth, -40);
        assert_eq!(stats.max_health(), 60);
        assert_eq!(stats.health(), 100);

        // Next write respects the new max.
        stats.take_damage(1);
        assert_eq!(stats.health(), 60);

        stats.remove_stat_modifier(StatKind::MaxHealth, id).unwrap();
        assert_eq!(stats.max_health(), 100);
    }

    #[test]
    fn lowered_max_clamps_when_enabled() {
        let mut stats = StatBlock::new(BaseStats::default())
            .with_clamp_on_max_change(true)
            .instantiate();
        stats.add_stat_modifier(StatKind::MaxHealth, -40);
        assert_eq!(stats.health(), 60);
        assert!(stats.drain_events().contains(&StatEvent::HealthChanged {
            previous: 100,
            current: 60
        }));
    }
}
