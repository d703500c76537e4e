//! Hit values and per-target resolution.

use crate::action::Action;
use crate::rng::RollSource;
use crate::stats::StatBlock;

use super::damage::calculate_damage;
use super::hit::{adjusted_hit_chance, check_hit, effective_hit_chance};

/// Outcome of applying one action to one target, before the hit roll.
///
/// Produced and consumed within a single resolution step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    /// Signed magnitude subtracted from Health. Negative heals.
    pub damage: i32,
    /// Source-side to-hit percentage, before target evasion.
    pub hit_chance: f32,
}

impl Hit {
    pub const fn new(damage: i32, hit_chance: f32) -> Self {
        Self { damage, hit_chance }
    }

    pub const fn is_heal(&self) -> bool {
        self.damage < 0
    }
}

/// Whether the hit roll succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    Hit,
    Miss,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitResult {
    pub hit: Hit,
    pub outcome: HitOutcome,
}

impl HitResult {
    pub const fn is_successful(&self) -> bool {
        matches!(self.outcome, HitOutcome::Hit)
    }
}

/// Builds the [`Hit`] for one target. Draws the damage variance.
pub fn compute_hit(
    action: &Action,
    source: &StatBlock,
    damage_variance: f32,
    rolls: &mut impl RollSource,
) -> Hit {
    let draw = rolls.roll_variance();
    let damage = calculate_damage(&action.effect, source.attack(), damage_variance, draw);
    let hit_chance = effective_hit_chance(action.hit_chance(), source.hit_chance());
    Hit::new(damage, hit_chance)
}

/// Resolve one target: damage variance first, then the hit roll.
pub fn resolve_hit(
    action: &Action,
    source: &StatBlock,
    target_evasion: Option<i32>,
    damage_variance: f32,
    rolls: &mut impl RollSource,
) -> HitResult {
    let hit = compute_hit(action, source, damage_variance, rolls);
    let chance = adjusted_hit_chance(hit.hit_chance, target_evasion);

    let outcome = if check_hit(chance, rolls.roll_percent()) {
        HitOutcome::Hit
    } else {
        HitOutcome::Miss
    };

    HitResult { hit, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRolls;
    use crate::stats::BaseStats;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn full_chance_always_hits() {
        let action = Action::attack("Strike", 5, 100.0);
        let source = StatBlock::new(BaseStats::default());
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..500 {
            let result = resolve_hit(&action, &source, Some(0), 0.1, &mut rng);
            assert!(result.is_successful());
            assert!((13..=16).contains(&result.hit.damage));
        }
    }

    #[test]
    fn evasion_turns_marginal_roll_into_miss() {
        let action = Action::attack("Jab", 0, 100.0);
        let source = StatBlock::new(BaseStats::default());
        let mut rolls = ScriptedRolls {
            percent: 60.0,
            variance: 0.0,
            index: 0,
        };

        assert!(resolve_hit(&action, &source, None, 0.1, &mut rolls).is_successful());
        assert!(!resolve_hit(&action, &source, Some(50), 0.1, &mut rolls).is_successful());
    }

    #[test]
    fn source_hit_chance_scales_action_chance() {
        let action = Action::attack("Jab", 0, 80.0);
        let source = StatBlock::new(BaseStats {
            hit_chance: 50,
            ..BaseStats::default()
        });
        let hit = compute_hit(&action, &source, 0.1, &mut ScriptedRolls::certain());
        assert_eq!(hit.hit_chance, 40.0);
        assert_eq!(hit.damage, 10);
    }
}
