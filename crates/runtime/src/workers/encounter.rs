//! Encounter worker that owns the authoritative [`EncounterScheduler`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives
//! the scheduler's tick, and publishes every scheduler event to the
//! [`EventBus`].

use std::time::Duration;

use combat_core::{
    CombatantId, EncounterError, EncounterScheduler, EncounterSnapshot, EncounterState,
};
use rand_chacha::ChaCha8Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::events::{Event, EventBus};
use crate::runtime::ClockMode;

/// Commands that can be sent to the encounter worker
pub enum Command {
    /// Start the encounter, or resume it when paused.
    Start {
        reply: oneshot::Sender<Result<(), EncounterError>>,
    },
    /// Pause the encounter.
    Stop { reply: oneshot::Sender<()> },
    /// Queue an action choice for a combatant.
    QueueAction {
        actor: CombatantId,
        action: usize,
        targets: Vec<CombatantId>,
        reply: oneshot::Sender<Result<(), EncounterError>>,
    },
    /// Drop a queued choice.
    CancelAction {
        actor: CombatantId,
        reply: oneshot::Sender<Result<bool, EncounterError>>,
    },
    /// Player menu opened or closed.
    SetMenuOpen {
        open: bool,
        reply: oneshot::Sender<()>,
    },
    /// Step the scheduler by `dt` simulated seconds.
    Advance {
        dt: f32,
        reply: oneshot::Sender<EncounterState>,
    },
    /// Read-only snapshot of the encounter.
    QueryState {
        reply: oneshot::Sender<EncounterSnapshot>,
    },
}

/// Background task that owns the scheduler and its generator.
///
/// In [`ClockMode::Realtime`] the worker ticks on its own interval while the
/// encounter is active. In [`ClockMode::Manual`] time only moves on
/// [`Command::Advance`].
pub struct EncounterWorker {
    scheduler: EncounterScheduler,
    rng: ChaCha8Rng,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    clock: ClockMode,
    tick_interval: Duration,
    elapsed: f32,
}

impl EncounterWorker {
    pub fn new(
        scheduler: EncounterScheduler,
        rng: ChaCha8Rng,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        clock: ClockMode,
        tick_interval: Duration,
    ) -> Self {
        tracing::info!(
            combatants = scheduler.roster().len(),
            ?clock,
            "EncounterWorker initialized"
        );

        Self {
            scheduler,
            rng,
            command_rx,
            event_bus,
            clock,
            tick_interval,
            elapsed: 0.0,
        }
    }

    /// Main worker loop. Ends when every command sender is dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let dt = self.tick_interval.as_secs_f32();

        loop {
            let realtime = self.clock == ClockMode::Realtime && self.scheduler.is_active();
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = ticker.tick(), if realtime => self.advance(dt),
            }
        }

        debug!("EncounterWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { reply } => {
                let result = self.scheduler.start();
                self.publish();
                if reply.send(result).is_err() {
                    debug!("Start reply channel closed (caller dropped)");
                }
            }
            Command::Stop { reply } => {
                self.scheduler.stop();
                self.publish();
                let _ = reply.send(());
            }
            Command::QueueAction {
                actor,
                action,
                targets,
                reply,
            } => {
                let result = self.scheduler.queue_action(actor, action, targets);
                self.publish();
                if reply.send(result).is_err() {
                    debug!("QueueAction reply channel closed (caller dropped)");
                }
            }
            Command::CancelAction { actor, reply } => {
                let result = self.scheduler.cancel_action(actor);
                self.publish();
                let _ = reply.send(result);
            }
            Command::SetMenuOpen { open, reply } => {
                self.scheduler.set_player_menu_open(open);
                let _ = reply.send(());
            }
            Command::Advance { dt, reply } => {
                self.advance(dt);
                let _ = reply.send(self.scheduler.state());
            }
            Command::QueryState { reply } => {
                if reply.send(self.scheduler.snapshot()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn advance(&mut self, dt: f32) {
        if !self.scheduler.is_active() {
            return;
        }
        self.elapsed += dt.max(0.0);
        self.scheduler.tick(dt, &mut self.rng);
        self.publish();
    }

    fn publish(&mut self) {
        for event in self.scheduler.drain_events() {
            self.event_bus.publish(Event {
                elapsed: self.elapsed,
                event,
            });
        }
    }
}
