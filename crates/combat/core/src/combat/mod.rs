//! Hit resolution.
//!
//! Pure functions turning an action, a source and a target into a signed
//! damage value and a hit/miss roll. Nothing here mutates combatants.
//!
//! # Core Functions
//!
//! - `resolve_hit`: Complete per-target resolution (variance + hit roll)
//! - `calculate_damage`: Signed damage/heal magnitude
//! - `effective_hit_chance` / `adjusted_hit_chance`: To-hit before and after evasion

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::calculate_damage;
pub use hit::{adjusted_hit_chance, check_hit, effective_hit_chance};
pub use result::{Hit, HitOutcome, HitResult, compute_hit, resolve_hit};
