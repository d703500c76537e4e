//! To-hit calculations.

/// Source-side chance: action base scaled by the source's HitChance stat.
///
/// # Formula
///
/// ```text
/// effective = action_hit_chance × (source_hit_chance / 100)
/// ```
pub fn effective_hit_chance(action_hit_chance: f32, source_hit_chance: i32) -> f32 {
    action_hit_chance * (source_hit_chance as f32 / 100.0)
}

/// Chance after the target's evasion, or unchanged when there is none.
///
/// # Formula
///
/// ```text
/// adjusted = effective × (1 - evasion / 100)
/// ```
pub fn adjusted_hit_chance(effective: f32, target_evasion: Option<i32>) -> f32 {
    match target_evasion {
        Some(evasion) => effective * (1.0 - evasion as f32 / 100.0),
        None => effective,
    }
}

/// A roll in `[0, 100)` hits when it does not exceed the chance.
pub fn check_hit(chance: f32, roll: f32) -> bool {
    roll <= chance
}
