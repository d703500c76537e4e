//! High-level runtime orchestrator.
//!
//! The runtime owns the encounter worker, wires up command/event channels,
//! routes `AwaitingInput` to the configured [`PlayerInput`], and exposes a
//! builder-based API for clients to drive an encounter.

use std::time::Duration;

use combat_core::{
    CombatConfig, CombatEvent, CombatantId, CombatantTemplate, EncounterScheduler,
    EncounterSnapshot,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{PlayerChoice, PlayerInput, Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, EncounterWorker};

/// How simulated time advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// The worker ticks on a wall-clock interval of `tick_interval`.
    Realtime,
    /// Time only moves through [`RuntimeHandle::advance`]; `run_until_finished`
    /// steps by `tick_interval` as fast as it can.
    Manual,
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Seed for the encounter's ChaCha8 generator.
    pub seed: u64,
    /// Wall-clock period in realtime mode; simulated step in both modes.
    pub tick_interval: Duration,
    pub clock: ClockMode,
    /// Manual mode only: give up after this many steps.
    pub max_ticks: Option<u64>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);
    pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            seed: 0,
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            clock: ClockMode::Realtime,
            max_ticks: None,
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates one encounter
///
/// Design: Runtime owns the worker and coordinates player input.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Player input (injected by user)
    player_input: Option<Box<dyn PlayerInput>>,

    config: RuntimeConfig,

    // Background worker
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to one event topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Set the player input
    pub fn set_player_input(&mut self, input: impl PlayerInput + 'static) {
        self.player_input = Some(Box::new(input));
    }

    /// Start the encounter and drive it to the end.
    ///
    /// Returns the victory flag from `CombatFinished`. Without a player input,
    /// player-controlled combatants only act on choices queued through the
    /// handle.
    pub async fn run_until_finished(&mut self) -> Result<bool> {
        let mut encounter_rx = self.handle.subscribe(Topic::Encounter);
        let mut turn_rx = self.handle.subscribe(Topic::Turn);
        self.handle.start().await?;

        match self.config.clock {
            ClockMode::Realtime => loop {
                tokio::select! {
                    received = encounter_rx.recv() => {
                        if let Some(victory) = Self::received(Topic::Encounter, received)?
                            .and_then(|event| Self::finished(&event))
                        {
                            return Ok(victory);
                        }
                    }
                    received = turn_rx.recv() => match received {
                        Ok(event) => self.on_turn_event(&event).await?,
                        Err(RecvError::Lagged(skipped)) => self.recover_lagged_turns(skipped).await?,
                        Err(RecvError::Closed) => {
                            return Err(RuntimeError::EventStreamClosed { topic: Topic::Turn });
                        }
                    }
                }
            },
            ClockMode::Manual => {
                let dt = self.config.tick_interval.as_secs_f32();
                let mut ticks = 0u64;
                loop {
                    loop {
                        match turn_rx.try_recv() {
                            Ok(event) => self.on_turn_event(&event).await?,
                            Err(TryRecvError::Empty) => break,
                            Err(TryRecvError::Lagged(skipped)) => {
                                self.recover_lagged_turns(skipped).await?;
                            }
                            Err(TryRecvError::Closed) => {
                                return Err(RuntimeError::EventStreamClosed { topic: Topic::Turn });
                            }
                        }
                    }
                    while let Some(event) = Self::try_received(Topic::Encounter, &mut encounter_rx)? {
                        if let Some(victory) = Self::finished(&event) {
                            return Ok(victory);
                        }
                    }

                    if let Some(limit) = self.config.max_ticks
                        && ticks >= limit
                    {
                        return Err(RuntimeError::TickLimitReached { ticks });
                    }
                    self.handle.advance(dt).await?;
                    ticks += 1;
                }
            }
        }
    }

    async fn on_turn_event(&self, event: &Event) -> Result<()> {
        let CombatEvent::AwaitingInput { actor } = event.event else {
            return Ok(());
        };
        if self.player_input.is_none() {
            return Ok(());
        }

        let snapshot = self.handle.query_state().await?;
        if snapshot.state.is_resolved() {
            return Ok(());
        }
        self.prompt(actor, &snapshot).await
    }

    /// Dropped turn events may include `AwaitingInput`, so every combatant the
    /// snapshot still lists as waiting is prompted again.
    async fn recover_lagged_turns(&self, skipped: u64) -> Result<()> {
        tracing::warn!(topic = ?Topic::Turn, skipped, "turn events lagged; re-prompting from snapshot");
        if self.player_input.is_none() {
            return Ok(());
        }

        let snapshot = self.handle.query_state().await?;
        if snapshot.state.is_resolved() {
            return Ok(());
        }
        for &actor in &snapshot.awaiting_input {
            self.prompt(actor, &snapshot).await?;
        }
        Ok(())
    }

    async fn prompt(&self, actor: CombatantId, snapshot: &EncounterSnapshot) -> Result<()> {
        let Some(input) = self.player_input.as_ref() else {
            return Ok(());
        };

        match input.choose(actor, snapshot).await? {
            PlayerChoice::Act { action, targets } => {
                self.forward_choice(actor, action, targets).await
            }
            PlayerChoice::Cancel => {
                self.handle.cancel_action(actor).await?;
                Ok(())
            }
        }
    }

    async fn forward_choice(
        &self,
        actor: CombatantId,
        action: usize,
        targets: Vec<CombatantId>,
    ) -> Result<()> {
        match self.handle.queue_action(actor, action, targets).await {
            // Finished between the snapshot and the queue; CombatFinished follows.
            Err(RuntimeError::Encounter(combat_core::EncounterError::AlreadyResolved)) => Ok(()),
            other => other,
        }
    }

    fn finished(event: &Event) -> Option<bool> {
        match event.event {
            CombatEvent::CombatFinished { victory } => Some(victory),
            _ => None,
        }
    }

    fn received(
        topic: Topic,
        received: std::result::Result<Event, RecvError>,
    ) -> Result<Option<Event>> {
        match received {
            Ok(event) => Ok(Some(event)),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(?topic, skipped, "event subscriber lagged");
                Ok(None)
            }
            Err(RecvError::Closed) => Err(RuntimeError::EventStreamClosed { topic }),
        }
    }

    fn try_received(topic: Topic, rx: &mut broadcast::Receiver<Event>) -> Result<Option<Event>> {
        loop {
            match rx.try_recv() {
                Ok(event) => return Ok(Some(event)),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(?topic, skipped, "event subscriber lagged");
                }
                Err(TryRecvError::Closed) => return Err(RuntimeError::EventStreamClosed { topic }),
            }
        }
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    players: Vec<CombatantTemplate>,
    enemies: Vec<CombatantTemplate>,
    player_input: Option<Box<dyn PlayerInput>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            players: Vec::new(),
            enemies: Vec::new(),
            player_input: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Player-side templates, in roster order
    pub fn players(mut self, players: impl IntoIterator<Item = CombatantTemplate>) -> Self {
        self.players = players.into_iter().collect();
        self
    }

    /// Enemy-side templates, in roster order
    pub fn enemies(mut self, enemies: impl IntoIterator<Item = CombatantTemplate>) -> Self {
        self.enemies = enemies.into_iter().collect();
        self
    }

    /// Set player input (optional)
    pub fn player_input(mut self, input: impl PlayerInput + 'static) -> Self {
        self.player_input = Some(Box::new(input));
        self
    }

    /// Build the runtime and spawn its worker
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(mut self) -> Result<Runtime> {
        if self.players.is_empty() && self.enemies.is_empty() {
            return Err(RuntimeError::MissingRoster);
        }
        self.config.tick_interval = self.config.tick_interval.max(RuntimeConfig::MIN_TICK_INTERVAL);

        let scheduler =
            EncounterScheduler::new(self.config.combat.clone(), &self.players, &self.enemies)?;
        let rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = EncounterWorker::new(
            scheduler,
            rng,
            command_rx,
            event_bus,
            self.config.clock,
            self.config.tick_interval,
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            player_input: self.player_input,
            config: self.config,
            worker_handle,
        })
    }
}
