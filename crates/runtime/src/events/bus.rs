//! Topic-based event bus implementation.

use std::sync::Arc;

use combat_core::CombatEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Encounter lifecycle (start, pause, resume, finish)
    Encounter,
    /// Turn flow (awaiting input, queued, admitted, rejected, skipped)
    Turn,
    /// Per-combatant changes and action presentation (stats, readiness, hits, movement)
    Combatant,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Encounter, Topic::Turn, Topic::Combatant];

    const fn index(self) -> usize {
        match self {
            Topic::Encounter => 0,
            Topic::Turn => 1,
            Topic::Combatant => 2,
        }
    }

    /// Topic a scheduler event is published on.
    pub fn of(event: &CombatEvent) -> Self {
        match event {
            CombatEvent::Started
            | CombatEvent::Paused
            | CombatEvent::Resumed
            | CombatEvent::CombatFinished { .. } => Topic::Encounter,
            CombatEvent::AwaitingInput { .. }
            | CombatEvent::ActionQueued { .. }
            | CombatEvent::ActionCancelled { .. }
            | CombatEvent::ActionRejected { .. }
            | CombatEvent::ActionStarted { .. }
            | CombatEvent::TurnSkipped { .. } => Topic::Turn,
            CombatEvent::MovedToward { .. }
            | CombatEvent::MovedBack { .. }
            | CombatEvent::HitResolved { .. }
            | CombatEvent::Combatant { .. } => Topic::Combatant,
        }
    }
}

/// A scheduler event stamped with the simulated time it was raised at.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Simulated seconds since the encounter worker started.
    pub elapsed: f32,
    pub event: CombatEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::of(&self.event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events sent while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 3]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channel = || broadcast::channel(capacity.max(1)).0;
        Self {
            channels: Arc::new([channel(), channel(), channel()]),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic, in the order requested.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::CombatantId;

    fn stamped(event: CombatEvent) -> Event {
        Event {
            elapsed: 0.0,
            event,
        }
    }

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut encounter = bus.subscribe(Topic::Encounter);
        let mut turn = bus.subscribe(Topic::Turn);

        bus.publish(stamped(CombatEvent::Started));
        bus.publish(stamped(CombatEvent::AwaitingInput {
            actor: CombatantId(0),
        }));
        bus.publish(stamped(CombatEvent::MovedBack {
            actor: CombatantId(0),
        }));

        assert_eq!(encounter.try_recv().unwrap().event, CombatEvent::Started);
        assert!(encounter.try_recv().is_err());
        assert_eq!(
            turn.try_recv().unwrap().event,
            CombatEvent::AwaitingInput {
                actor: CombatantId(0)
            }
        );
        assert!(turn.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(stamped(CombatEvent::Paused));
        let mut late = bus.subscribe(Topic::Encounter);
        assert!(late.try_recv().is_err());
    }
}
