//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! controlling the encounter or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{CombatantId, EncounterSnapshot, EncounterState};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Start the encounter, or resume it after [`Self::stop`].
    pub async fn start(&self) -> Result<()> {
        self.request(|reply| Command::Start { reply }).await??;
        Ok(())
    }

    /// Pause the encounter.
    pub async fn stop(&self) -> Result<()> {
        self.request(|reply| Command::Stop { reply }).await
    }

    /// Queue an action choice for a combatant; validated when it is admitted.
    pub async fn queue_action(
        &self,
        actor: CombatantId,
        action: usize,
        targets: Vec<CombatantId>,
    ) -> Result<()> {
        self.request(|reply| Command::QueueAction {
            actor,
            action,
            targets,
            reply,
        })
        .await??;
        Ok(())
    }

    /// Drop a queued choice. Returns false if there was none.
    pub async fn cancel_action(&self, actor: CombatantId) -> Result<bool> {
        Ok(self
            .request(|reply| Command::CancelAction { actor, reply })
            .await??)
    }

    /// Report whether a player menu is open; the scheduler slows time while it is.
    pub async fn set_menu_open(&self, open: bool) -> Result<()> {
        self.request(|reply| Command::SetMenuOpen { open, reply })
            .await
    }

    /// Step the encounter by `dt` simulated seconds.
    ///
    /// Events raised during the step are published before this returns.
    pub async fn advance(&self, dt: f32) -> Result<EncounterState> {
        self.request(|reply| Command::Advance { dt, reply }).await
    }

    /// Query a read-only snapshot of the encounter
    pub async fn query_state(&self) -> Result<EncounterSnapshot> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Encounter` - Start, pause, resume and the final result
    /// - `Topic::Turn` - Awaiting input, queued/admitted/rejected actions, skipped turns
    /// - `Topic::Combatant` - Readiness, stats, hits and movement
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut turn_rx = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turn_rx.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
