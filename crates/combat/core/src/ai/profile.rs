//! Agent configuration.

/// How an agent chooses among executable actions and valid targets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentProfile {
    /// Uniform random action, uniform random single target.
    #[default]
    Uniform,

    /// Random choice skewed by two probability gates.
    ///
    /// Each executable action passes a gate: attacks are kept when a unit
    /// roll is `<= attack_probability`, other actions when it is above.
    /// Targets are gated the same way with `target_enemy_probability`,
    /// enemies kept below, friendlies above. An empty result falls back to
    /// the unfiltered list.
    Biased {
        attack_probability: f32,
        target_enemy_probability: f32,
    },

    /// Highest `action_priority`; ties go to the earliest action.
    Priority,
}

impl AgentProfile {
    pub const DEFAULT_ATTACK_PROBABILITY: f32 = 0.7;
    pub const DEFAULT_TARGET_ENEMY_PROBABILITY: f32 = 0.8;

    pub const fn biased() -> Self {
        AgentProfile::Biased {
            attack_probability: Self::DEFAULT_ATTACK_PROBABILITY,
            target_enemy_probability: Self::DEFAULT_TARGET_ENEMY_PROBABILITY,
        }
    }
}

/// Per-combatant agent settings carried by a template.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Seconds to wait before choosing. `None` uses the encounter default.
    pub turn_delay: Option<f32>,
    pub profile: AgentProfile,
}

impl AgentConfig {
    pub fn new(profile: AgentProfile) -> Self {
        Self {
            turn_delay: None,
            profile,
        }
    }

    pub fn with_turn_delay(mut self, delay: f32) -> Self {
        self.turn_delay = Some(delay.max(0.0));
        self
    }
}
