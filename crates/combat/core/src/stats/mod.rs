//! Stat system.
//!
//! ```text
//! [ BaseStats ] ──► [ BonusStack per stat ] ──► [ derived values ]
//!                                                    │
//!                               [ Health / Energy pools, clamped to Max* ]
//! ```
//!
//! ## Principles
//!
//! 1. **Order independent**: bonuses are summed, so insertion order never matters
//! 2. **Isolated recompute**: changing one stat's bonuses never touches another stat
//! 3. **Template + instance**: configured blocks are cloned per combatant
//!
//! ## Bonus Stack
//!
//! `Multipliers (Σ, floored) → Modifiers (Σ) → Floor at 0 → Round`

pub mod block;
pub mod bonus;
pub mod element;
pub mod error;
pub mod kind;

pub use block::{BaseStats, HealthChange, StatBlock, StatEvent};
pub use bonus::{BonusKind, BonusStack, ModifierId};
pub use element::Element;
pub use error::StatError;
pub use kind::StatKind;
