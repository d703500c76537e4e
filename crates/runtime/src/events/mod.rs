//! Topic-based event bus for encounter events.
//!
//! The encounter worker drains the scheduler after every command and tick
//! and publishes each event to its topic. Consumers subscribe only to the
//! topics they need.

mod bus;

pub use bus::{Event, EventBus, Topic};
