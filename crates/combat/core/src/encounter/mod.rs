//! Encounter orchestration: roster, scheduler, events and snapshots.
//!
//! [`EncounterScheduler`] is the only place where combatants interact. It
//! owns the [`Roster`], decides who acts next and applies every hit.
pub mod error;
pub mod events;
pub mod roster;
pub mod scheduler;
pub mod snapshot;

pub use error::{EncounterError, SetupError};
pub use events::CombatEvent;
pub use roster::Roster;
pub use scheduler::{EncounterScheduler, EncounterState};
pub use snapshot::{ActionSummary, CombatantSnapshot, EncounterSnapshot};
