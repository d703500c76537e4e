//! Action definitions.
//!
//! Actions are immutable configuration owned by a combatant's roster. All
//! per-use state lives in the encounter's resolution step, so the same
//! `Action` value can be offered every turn.

use crate::stats::{Element, StatKind};

/// Which combatants an action may be aimed at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetScope {
    /// Only the acting combatant. Side flags are ignored.
    SelfOnly,
    /// One combatant chosen from the possible targets.
    #[default]
    Single,
    /// Every possible target at once.
    All,
}

/// Bonus granted by a buff/debuff effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusValue {
    /// Additive modifier on the derived value.
    Flat(i32),
    /// Delta on the multiplicative factor.
    Multiplier(f32),
}

/// What an action does to each target it hits.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEffect {
    /// Damage of `base_damage + source attack`, with variance.
    Attack { base_damage: i32, hit_chance: f32 },

    /// Healing of `amount`, with variance. Source attack does not apply.
    Heal { amount: i32, hit_chance: f32 },

    /// Timed bonus on one stat, removed after `duration` seconds.
    Bonus {
        stat: StatKind,
        value: BonusValue,
        duration: f32,
        hit_chance: f32,
    },
}

impl ActionEffect {
    /// Action-specific base to-hit percentage.
    pub const fn hit_chance(&self) -> f32 {
        match *self {
            ActionEffect::Attack { hit_chance, .. }
            | ActionEffect::Heal { hit_chance, .. }
            | ActionEffect::Bonus { hit_chance, .. } => hit_chance,
        }
    }

    pub const fn is_attack(&self) -> bool {
        matches!(self, ActionEffect::Attack { .. })
    }
}

impl Default for ActionEffect {
    fn default() -> Self {
        ActionEffect::Attack {
            base_damage: 0,
            hit_chance: 100.0,
        }
    }
}

/// A selectable, costed, targetable combat move.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Action {
    pub label: String,
    pub description: String,
    /// Presentation reference, passed through untouched.
    pub icon: Option<String>,

    pub scope: TargetScope,
    pub targets_friendlies: bool,
    pub targets_enemies: bool,

    pub element: Element,
    pub energy_cost: i32,
    /// Readiness the actor restarts from after acting, in `[0, 100]`.
    pub readiness_saved: f32,

    pub effect: ActionEffect,
}

impl Action {
    pub fn new(label: impl Into<String>, effect: ActionEffect) -> Self {
        Self {
            label: label.into(),
            effect,
            ..Self::default()
        }
    }

    /// Single-target attack against the opposing side.
    pub fn attack(label: impl Into<String>, base_damage: i32, hit_chance: f32) -> Self {
        Self::new(
            label,
            ActionEffect::Attack {
                base_damage,
                hit_chance,
            },
        )
        .against_enemies()
    }

    /// Single-target heal on the acting combatant's side.
    pub fn heal(label: impl Into<String>, amount: i32) -> Self {
        Self::new(
            label,
            ActionEffect::Heal {
                amount,
                hit_chance: 100.0,
            },
        )
        .against_friendlies()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_scope(mut self, scope: TargetScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn against_enemies(mut self) -> Self {
        self.targets_enemies = true;
        self
    }

    pub fn against_friendlies(mut self) -> Self {
        self.targets_friendlies = true;
        self
    }

    pub fn with_energy_cost(mut self, cost: i32) -> Self {
        self.energy_cost = cost.max(0);
        self
    }

    pub fn with_readiness_saved(mut self, readiness: f32) -> Self {
        self.readiness_saved = readiness.clamp(0.0, 100.0);
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn hit_chance(&self) -> f32 {
        self.effect.hit_chance()
    }

    pub fn targets_all(&self) -> bool {
        self.scope == TargetScope::All
    }
}

impl Default for Action {
    fn default() -> Self {
        Self {
            label: "Base combat action".to_owned(),
            description: "A combat action.".to_owned(),
            icon: None,
            scope: TargetScope::Single,
            targets_friendlies: false,
            targets_enemies: false,
            element: Element::None,
            energy_cost: 0,
            readiness_saved: 0.0,
            effect: ActionEffect::default(),
        }
    }
}
