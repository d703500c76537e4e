/// Combat tuning constants and tunable parameters.
///
/// All durations are in simulated seconds; the scheduler converts tick
/// deltas into progress through these values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Readiness at which a combatant latches ready and requests a turn.
    pub ready_threshold: f32,

    /// Energy granted each time a combatant latches ready.
    pub energy_per_turn: i32,

    /// Symmetric damage spread as a fraction of the base damage.
    pub damage_variance: f32,

    /// Time scale applied to every combatant while a player menu is open.
    pub menu_time_scale: f32,

    /// Time scale applied to every combatant while an action resolves.
    pub acting_time_scale: f32,

    /// Delay before an agent with no explicit delay picks its action.
    pub default_turn_delay: f32,

    /// Clamp current health/energy down when a max stat shrinks.
    pub clamp_resources_on_max_change: bool,

    /// Delays of the action presentation sequence.
    pub pacing: ActionPacing,
}

impl CombatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_READY_THRESHOLD: f32 = 100.0;
    pub const DEFAULT_ENERGY_PER_TURN: i32 = 1;
    pub const DEFAULT_DAMAGE_VARIANCE: f32 = 0.1;
    pub const DEFAULT_MENU_TIME_SCALE: f32 = 0.05;
    pub const DEFAULT_ACTING_TIME_SCALE: f32 = 1.0;
    pub const DEFAULT_TURN_DELAY: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            ready_threshold: Self::DEFAULT_READY_THRESHOLD,
            energy_per_turn: Self::DEFAULT_ENERGY_PER_TURN,
            damage_variance: Self::DEFAULT_DAMAGE_VARIANCE,
            menu_time_scale: Self::DEFAULT_MENU_TIME_SCALE,
            acting_time_scale: Self::DEFAULT_ACTING_TIME_SCALE,
            default_turn_delay: Self::DEFAULT_TURN_DELAY,
            clamp_resources_on_max_change: false,
            pacing: ActionPacing::default(),
        }
    }

    /// Configuration with every presentation wait removed.
    ///
    /// Actions resolve within the tick that admits them and agents decide in
    /// the tick they become ready.
    pub fn instant() -> Self {
        Self {
            default_turn_delay: 0.0,
            pacing: ActionPacing::instant(),
            ..Self::new()
        }
    }

    pub fn with_ready_threshold(mut self, threshold: f32) -> Self {
        self.ready_threshold = threshold;
        self
    }

    pub fn with_pacing(mut self, pacing: ActionPacing) -> Self {
        self.pacing = pacing;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits inserted between the steps of an action's execute sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionPacing {
    /// Pause before the actor starts moving.
    pub lead_in: f32,
    /// Time the presentation layer is given to animate each movement.
    pub movement: f32,
    /// Pause between consecutive targets.
    pub between_targets: f32,
}

impl ActionPacing {
    pub const fn instant() -> Self {
        Self {
            lead_in: 0.0,
            movement: 0.0,
            between_targets: 0.0,
        }
    }
}

impl Default for ActionPacing {
    fn default() -> Self {
        Self {
            lead_in: 0.1,
            movement: 0.3,
            between_targets: 0.1,
        }
    }
}
