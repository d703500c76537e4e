//! Event stream logging.

use combat_core::{CombatEvent, CombatantEvent, EncounterSnapshot};
use runtime::{Event, RuntimeHandle, Topic};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Logs every event until the bus closes.
///
/// Encounter and turn events go to `info`; per-combatant detail to `debug`.
pub fn spawn(handle: RuntimeHandle) -> JoinHandle<()> {
    let receivers = handle.subscribe_multiple(&Topic::ALL);
    drop(handle);

    tokio::spawn(async move {
        let tasks: Vec<_> = receivers
            .into_iter()
            .map(|(topic, mut rx)| {
                tokio::spawn(async move {
                    loop {
                        match rx.recv().await {
                            Ok(event) => log_event(topic, &event),
                            Err(RecvError::Lagged(skipped)) => {
                                tracing::warn!(?topic, skipped, "reporter lagged");
                            }
                            Err(RecvError::Closed) => break,
                        }
                    }
                })
            })
            .collect();

        for task in tasks {
            let _ = task.await;
        }
    })
}

fn log_event(topic: Topic, stamped: &Event) {
    let t = stamped.elapsed;
    match (&stamped.event, topic) {
        (CombatEvent::CombatFinished { victory }, _) => {
            tracing::info!(t, victory, "combat finished");
        }
        (CombatEvent::HitResolved { actor, target, result }, _) => {
            if result.is_successful() {
                tracing::info!(t, %actor, %target, damage = result.hit.damage, "hit");
            } else {
                tracing::info!(t, %actor, %target, "miss");
            }
        }
        (CombatEvent::Combatant { id, event: CombatantEvent::Defeated }, _) => {
            tracing::info!(t, %id, "defeated");
        }
        (event, Topic::Combatant) => tracing::debug!(t, ?event),
        (event, _) => tracing::info!(t, ?event),
    }
}

/// Logs the final standing of every combatant.
pub fn summary(snapshot: &EncounterSnapshot) {
    for combatant in &snapshot.combatants {
        tracing::info!(
            id = %combatant.id,
            name = %combatant.name,
            side = %combatant.side,
            health = combatant.health,
            max_health = combatant.max_health,
            "final standing"
        );
    }
}
