//! Damage and healing magnitude.

use crate::action::ActionEffect;

/// Signed damage for one target, before the hit check.
///
/// # Formula
///
/// ```text
/// attack: base = base_damage + source_attack
/// heal:   base = amount                      (result negated)
/// bonus:  0
///
/// damage = trunc(base + base × variance × draw)
/// ```
///
/// `draw` is a uniform value in `[-1, 1]`; `variance` is the symmetric
/// spread as a fraction of `base` (0.1 for ±10%).
pub fn calculate_damage(effect: &ActionEffect, source_attack: i32, variance: f32, draw: f32) -> i32 {
    match *effect {
        ActionEffect::Attack { base_damage, .. } => {
            spread(base_damage.saturating_add(source_attack), variance, draw)
        }
        ActionEffect::Heal { amount, .. } => -spread(amount, variance, draw),
        ActionEffect::Bonus { .. } => 0,
    }
}

fn spread(base: i32, variance: f32, draw: f32) -> i32 {
    let base = base as f64;
    let offset = base * variance as f64 * draw.clamp(-1.0, 1.0) as f64;
    (base + offset) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRIKE: ActionEffect = ActionEffect::Attack {
        base_damage: 5,
        hit_chance: 100.0,
    };

    #[test]
    fn attack_adds_source_attack() {
        assert_eq!(calculate_damage(&STRIKE, 10, 0.1, 0.0), 15);
    }

    #[test]
    fn variance_is_symmetric_and_truncated() {
        // 15 ± 1.5
        assert_eq!(calculate_damage(&STRIKE, 10, 0.1, 1.0), 16);
        assert_eq!(calculate_damage(&STRIKE, 10, 0.1, -1.0), 13);
        for step in -10..=10 {
            let damage = calculate_damage(&STRIKE, 10, 0.1, step as f32 / 10.0);
            assert!((13..=16).contains(&damage));
        }
    }

    #[test]
    fn heal_is_negative_and_ignores_attack() {
        let mend = ActionEffect::Heal {
            amount: 20,
            hit_chance: 100.0,
        };
        assert_eq!(calculate_damage(&mend, 50, 0.1, 0.0), -20);
        assert_eq!(calculate_damage(&mend, 50, 0.1, 1.0), -22);
    }
}
