//! Full encounters driven by a seeded generator.

use combat_core::{
    Action, AgentConfig, AgentProfile, BaseStats, CombatConfig, CombatEvent, CombatantTemplate,
    EncounterScheduler, EncounterState, Side, StatBlock, TargetScope,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DT: f32 = 0.1;
const MAX_TICKS: usize = 5_000;

fn fighter(name: &str, speed: i32, profile: AgentProfile) -> CombatantTemplate {
    CombatantTemplate::new(name)
        .with_stats(StatBlock::new(BaseStats {
            speed,
            ..BaseStats::default()
        }))
        .with_actions([
            Action::attack("Strike", 5, 95.0),
            Action::attack("Sweep", 2, 80.0)
                .with_scope(TargetScope::All)
                .with_energy_cost(2),
            Action::heal("Mend", 12).with_energy_cost(1),
        ])
        .with_agent(AgentConfig::new(profile).with_turn_delay(0.25))
}

fn run(seed: u64) -> (EncounterState, Vec<CombatEvent>) {
    let players = [
        fighter("knight", 60, AgentProfile::Priority),
        fighter("ranger", 85, AgentProfile::biased()),
    ];
    let enemies = [
        fighter("orc", 55, AgentProfile::Uniform),
        fighter("wolf", 90, AgentProfile::Uniform),
    ];

    let mut encounter = EncounterScheduler::new(CombatConfig::new(), &players, &enemies).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    encounter.start().unwrap();

    let mut events = Vec::new();
    for _ in 0..MAX_TICKS {
        encounter.tick(DT, &mut rng);
        events.extend(encounter.drain_events());
        if encounter.state().is_resolved() {
            break;
        }
    }
    (encounter.state(), events)
}

#[test]
fn agents_fight_to_a_resolution() {
    let (state, events) = run(42);

    let EncounterState::Resolved { victory } = state else {
        panic!("encounter did not resolve: {state:?}");
    };
    let finished: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::CombatFinished { .. }))
        .collect();
    assert_eq!(finished, vec![&CombatEvent::CombatFinished { victory }]);
    assert_eq!(events.last(), Some(&CombatEvent::CombatFinished { victory }));
}

#[test]
fn same_seed_replays_the_same_encounter() {
    assert_eq!(run(7), run(7));
}

#[test]
fn at_most_one_action_in_flight() {
    let (_, events) = run(3);

    let mut in_flight = 0;
    for event in &events {
        match event {
            CombatEvent::ActionStarted { .. } => {
                in_flight += 1;
                assert_eq!(in_flight, 1, "two actions overlapped");
            }
            CombatEvent::Combatant {
                event: combat_core::CombatantEvent::ActionFinished,
                ..
            } => in_flight -= 1,
            _ => {}
        }
    }
}

#[test]
fn losing_side_is_fully_defeated() {
    let players = [fighter("knight", 60, AgentProfile::Priority)];
    let enemies = [fighter("orc", 55, AgentProfile::Uniform)];
    let mut encounter = EncounterScheduler::new(CombatConfig::new(), &players, &enemies).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    encounter.start().unwrap();

    for _ in 0..MAX_TICKS {
        encounter.tick(DT, &mut rng);
        if encounter.state().is_resolved() {
            break;
        }
    }

    let EncounterState::Resolved { victory } = encounter.state() else {
        panic!("encounter did not resolve");
    };
    let losers = if victory { Side::Enemy } else { Side::Player };
    assert!(encounter.roster().is_side_defeated(losers));
    assert!(encounter.roster().living(losers.opposite()).count() > 0);
}
