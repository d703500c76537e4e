//! Action domain.
//!
//! # Module Structure
//!
//! - `types`: Action configuration (scope, side flags, cost, effect)
//! - `targeting`: Execution preconditions and possible-target computation
//! - `sequence`: Step-wise execute sequence driven by simulated time
//! - `error`: Action error types (ActionError, IllegalReason)

pub mod error;
pub mod sequence;
pub mod targeting;
pub mod types;

pub use error::{ActionError, IllegalReason};
pub use sequence::{ActionSequence, SequenceStep};
pub use types::{Action, ActionEffect, BonusValue, TargetScope};
