//! Integration tests running the forager agent against the arena
//!
//! - Seeded games replay identically
//! - Every order the agent submits is legal for the snapshot it saw
//! - On a threat-free board the workers bring gold home

use ahash::AHashSet;

use threat_forager::agent::{AgentStats, ForagerAgent};
use threat_forager::arena::{Arena, ArenaConfig, Outcome};
use threat_forager::core::types::GridPos;
use threat_forager::core::PlannerConfig;
use threat_forager::world::{Action, WorldView};

fn play(config: ArenaConfig, max_ticks: u64) -> (Outcome, u64, u32, AgentStats) {
    let mut arena = Arena::new(config.clone()).unwrap();
    let mut agent = ForagerAgent::new(PlannerConfig::default(), config.width, config.height).unwrap();

    while !arena.is_over() && arena.current_tick() < max_ticks {
        let actions = agent.tick(&arena.snapshot()).unwrap();
        arena.step(&actions);
    }

    (arena.outcome(), arena.current_tick(), arena.delivered(), agent.stats())
}

#[test]
fn test_seeded_game_is_deterministic() {
    let config = ArenaConfig {
        width: 24,
        height: 24,
        seed: 1234,
        ..ArenaConfig::default()
    };

    let first = play(config.clone(), 300);
    let second = play(config, 300);

    assert_eq!(first, second);
    assert_eq!(first.3.ticks, first.1);
}

#[test]
fn test_orders_are_always_legal() {
    let config = ArenaConfig {
        width: 20,
        height: 20,
        seed: 99,
        threat_count: 5,
        initial_workers: 3,
        ..ArenaConfig::default()
    };
    let mut arena = Arena::new(config.clone()).unwrap();
    let mut agent = ForagerAgent::new(PlannerConfig::default(), config.width, config.height).unwrap();

    for _ in 0..200 {
        if arena.is_over() {
            break;
        }
        let snapshot = arena.snapshot();
        let actions = agent.tick(&snapshot).unwrap();

        let mut destinations: AHashSet<GridPos> = AHashSet::new();
        for (id, action) in &actions {
            if let Action::Move(direction) = action {
                let from = snapshot.worker(*id).expect("moves only go to live workers").position;
                let to = from.step(*direction);
                assert!(snapshot.in_bounds(to), "{:?} walks off the board", id);
                assert!(snapshot.resource_at(to).is_none(), "{:?} walks into a resource", id);
                assert!(snapshot.occupant_at(to).is_none(), "{:?} walks into an occupant", id);
                assert!(destinations.insert(to), "two units ordered into {}", to);
            }
        }

        arena.step(&actions);
    }
}

#[test]
fn test_threat_free_board_delivers_gold() {
    let config = ArenaConfig {
        width: 16,
        height: 16,
        seed: 5,
        threat_count: 0,
        tree_count: 0,
        ..ArenaConfig::default()
    };

    let (outcome, _, delivered, stats) = play(config, 600);

    assert_ne!(outcome, Outcome::Defeat);
    assert!(delivered > 0, "no gold delivered");
    assert_eq!(stats.deaths, 0);
    assert_eq!(stats.hits, 0);
}
