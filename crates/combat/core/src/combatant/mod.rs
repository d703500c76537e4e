//! Combatants and their per-turn state machine.
//!
//! ```text
//! Ticking ──(readiness ≥ threshold)──► Ready ──(admitted)──► Acting
//!    ▲                                   │                     │
//!    └──────── skip ◄────────────────────┘                     │
//!    └──────── readiness = saved ◄─────────────────────────────┤
//!                                                              ▼
//!                                         Defeated (Health = 0, terminal)
//! ```

pub mod actor;
pub mod events;
pub mod template;
pub mod timed;

pub use actor::Combatant;
pub use events::CombatantEvent;
pub use template::CombatantTemplate;
pub use timed::TimedBonus;

/// Position of a combatant in the encounter roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two opposing teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Enemy => "enemy",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// Readiness accrues each tick.
    Ticking,
    /// Latched at the threshold, waiting to be admitted.
    Ready,
    /// Resolving an action. At most one combatant per encounter.
    Acting,
    /// Health reached 0. Terminal.
    Defeated,
}
