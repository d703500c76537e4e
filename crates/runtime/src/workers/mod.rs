//! Worker tasks that back the runtime orchestration.
//!
//! The encounter worker owns the scheduler; everything else talks to it
//! through commands and the event bus.

mod encounter;

pub use encounter::{Command, EncounterWorker};
