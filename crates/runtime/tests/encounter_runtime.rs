use std::time::Duration;

use combat_core::{
    Action, AgentConfig, AgentProfile, BaseStats, CombatConfig, CombatEvent, CombatantId,
    CombatantTemplate, EncounterError, EncounterState, StatBlock,
};
use runtime::{ClockMode, Runtime, RuntimeConfig, RuntimeError, ScriptedPlayer, Topic};

fn template(name: &str, speed: i32, max_health: i32) -> CombatantTemplate {
    CombatantTemplate::new(name)
        .with_stats(StatBlock::new(BaseStats {
            speed,
            max_health,
            ..BaseStats::default()
        }))
        .with_action(Action::attack("Strike", 5, 100.0))
}

fn manual_config(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        combat: CombatConfig::instant(),
        seed,
        tick_interval: Duration::from_millis(100),
        clock: ClockMode::Manual,
        max_ticks: Some(10_000),
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn scripted_player_wins_in_manual_mode() {
    let mut runtime = Runtime::builder()
        .config(manual_config(1))
        .players([template("hero", 100, 200)])
        .enemies([template("slime", 40, 30).with_agent(AgentConfig::new(AgentProfile::Uniform))])
        .player_input(ScriptedPlayer)
        .build()
        .await
        .unwrap();

    let victory = runtime.run_until_finished().await.unwrap();
    assert!(victory);

    let snapshot = runtime.handle().query_state().await.unwrap();
    assert_eq!(snapshot.state, EncounterState::Resolved { victory: true });
    assert!(snapshot.get(CombatantId(1)).is_some_and(|c| !c.is_alive()));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn realtime_clock_ticks_on_its_own() {
    let config = RuntimeConfig {
        combat: CombatConfig::instant().with_ready_threshold(1.0),
        tick_interval: Duration::from_millis(1),
        clock: ClockMode::Realtime,
        ..RuntimeConfig::default()
    };
    let mut runtime = Runtime::builder()
        .config(config)
        .players([template("hero", 100, 100)])
        .enemies([template("dummy", 0, 10)])
        .player_input(ScriptedPlayer)
        .build()
        .await
        .unwrap();

    let victory = tokio::time::timeout(Duration::from_secs(5), runtime.run_until_finished())
        .await
        .expect("encounter should finish in time")
        .unwrap();
    assert!(victory);
}

#[tokio::test]
async fn handle_commands_reach_the_scheduler() {
    let runtime = Runtime::builder()
        .config(manual_config(5))
        .players([template("hero", 50, 100)])
        .enemies([template("slime", 0, 100)])
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut encounter_rx = handle.subscribe(Topic::Encounter);
    let mut turn_rx = handle.subscribe(Topic::Turn);

    assert_eq!(
        handle.query_state().await.unwrap().state,
        EncounterState::NotStarted
    );
    assert_eq!(handle.advance(1.0).await.unwrap(), EncounterState::NotStarted);

    handle.start().await.unwrap();
    assert_eq!(encounter_rx.recv().await.unwrap().event, CombatEvent::Started);

    let err = handle
        .queue_action(CombatantId(7), 0, vec![CombatantId(1)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Encounter(EncounterError::UnknownCombatant { .. })
    ));

    handle.advance(1.0).await.unwrap();
    let snapshot = handle.query_state().await.unwrap();
    assert_eq!(snapshot.get(CombatantId(0)).unwrap().readiness, 50.0);

    handle.advance(1.0).await.unwrap();
    let awaiting = turn_rx.recv().await.unwrap();
    assert_eq!(
        awaiting.event,
        CombatEvent::AwaitingInput {
            actor: CombatantId(0)
        }
    );
    assert!((awaiting.elapsed - 2.0).abs() < 1e-6);

    handle.stop().await.unwrap();
    assert_eq!(encounter_rx.recv().await.unwrap().event, CombatEvent::Paused);
    assert_eq!(handle.advance(1.0).await.unwrap(), EncounterState::Paused);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn lagged_turn_events_reprompt_waiting_players() {
    // One-slot topics: the hero's AwaitingInput is overwritten by the
    // squire's on the tick both latch.
    let config = RuntimeConfig {
        event_buffer_size: 1,
        max_ticks: Some(500),
        ..manual_config(11)
    };
    let squire = CombatantTemplate::new("squire")
        .with_stats(StatBlock::new(BaseStats {
            speed: 100,
            ..BaseStats::default()
        }))
        .with_action(Action::heal("Mend", 5));
    let mut runtime = Runtime::builder()
        .config(config)
        .players([template("hero", 100, 100), squire])
        .enemies([template("slime", 0, 30)])
        .player_input(ScriptedPlayer)
        .build()
        .await
        .unwrap();

    // Only the hero can damage the slime.
    let victory = runtime.run_until_finished().await.unwrap();
    assert!(victory);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn manual_mode_respects_tick_limit() {
    let config = RuntimeConfig {
        max_ticks: Some(20),
        ..manual_config(3)
    };
    // Nobody can ever act: both sides have zero speed.
    let mut runtime = Runtime::builder()
        .config(config)
        .players([template("statue", 0, 100)])
        .enemies([template("gargoyle", 0, 100)])
        .player_input(ScriptedPlayer)
        .build()
        .await
        .unwrap();

    let err = runtime.run_until_finished().await.unwrap_err();
    assert!(matches!(err, RuntimeError::TickLimitReached { ticks: 20 }));
}

#[tokio::test]
async fn missing_stats_fail_the_build() {
    let result = Runtime::builder()
        .players([CombatantTemplate::new("ghost")])
        .enemies([template("slime", 10, 10)])
        .build()
        .await;
    assert!(matches!(result, Err(RuntimeError::Setup(_))));
}

#[tokio::test]
async fn bundled_content_runs_to_completion() {
    use combat_content::ContentFactory;

    let factory = ContentFactory::new(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../combat/content/data"),
    );
    let catalog = factory.load_actions().unwrap();
    let content = factory.load_encounter("training", &catalog).unwrap();

    let mut runtime = Runtime::builder()
        .config(RuntimeConfig {
            combat: factory.load_config().unwrap(),
            ..manual_config(2024)
        })
        .players(content.players)
        .enemies(content.enemies)
        .player_input(ScriptedPlayer)
        .build()
        .await
        .unwrap();

    runtime.run_until_finished().await.unwrap();
}
