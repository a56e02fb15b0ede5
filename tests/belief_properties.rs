//! Property tests for the belief update and the move planner
//!
//! - Probabilities stay finite and inside [0, 1] under any observation stream
//! - Directly seen cells never move
//! - Snapping is idempotent
//! - The planner never picks an illegal or already claimed cell

use proptest::prelude::*;

use threat_forager::belief::{settle, BeliefMap, Observation, ObservationModel, ObservedKind};
use threat_forager::core::types::GridPos;
use threat_forager::core::PlannerConfig;
use threat_forager::planner::{MovePlanner, PlanContext, ReservationSet};
use threat_forager::tracker::StateTracker;
use threat_forager::world::{Action, ResourceKind, WorldSnapshot, WorldView};

const SIDE: i32 = 12;

fn observation() -> impl Strategy<Value = Observation> {
    prop_oneof![Just(Observation::Hit), Just(Observation::Miss), Just(Observation::Death)]
}

fn cell() -> impl Strategy<Value = (i32, i32)> {
    (0..SIDE, 0..SIDE)
}

proptest! {
    #[test]
    fn test_probabilities_stay_bounded(
        prior in 0.0f64..0.2,
        events in prop::collection::vec((cell(), observation()), 1..40),
    ) {
        let config = PlannerConfig { prior_density: prior, ..PlannerConfig::default() };
        let model = ObservationModel::new(&config);
        let mut map = BeliefMap::new(SIDE, SIDE, prior).unwrap();

        for ((x, y), outcome) in events {
            model.observe(&mut map, GridPos::new(x, y), outcome);
            for (_, c) in map.iter() {
                prop_assert!(c.threat_probability.is_finite());
                prop_assert!((0.0..=1.0).contains(&c.threat_probability));
                prop_assert!(c.hit_count <= c.visit_count);
            }
        }
    }

    #[test]
    fn test_seen_cells_never_move(
        seen in prop::collection::vec((cell(), any::<bool>()), 1..30),
        events in prop::collection::vec((cell(), observation()), 1..30),
    ) {
        let config = PlannerConfig { prior_density: 0.02, ..PlannerConfig::default() };
        let model = ObservationModel::new(&config);
        let mut map = BeliefMap::new(SIDE, SIDE, 0.02).unwrap();
        for ((x, y), hostile) in &seen {
            let kind = if *hostile { ObservedKind::Hostile } else { ObservedKind::Empty };
            map.mark_observed(GridPos::new(*x, *y), kind);
        }
        let pinned: Vec<(GridPos, f64)> = map
            .iter()
            .filter(|(_, c)| c.seen)
            .map(|(p, c)| (p, c.threat_probability))
            .collect();

        for ((x, y), outcome) in events {
            model.observe(&mut map, GridPos::new(x, y), outcome);
        }

        for (pos, p) in pinned {
            prop_assert_eq!(map.probability_at(pos), p);
            prop_assert!(map.is_seen(pos));
        }
    }

    #[test]
    fn test_settle_is_idempotent(p in -1.0f64..2.0) {
        let once = settle(p);
        prop_assert_eq!(settle(once), once);
        prop_assert!((0.0..=1.0).contains(&once));
    }

    #[test]
    fn test_planner_respects_claims_and_blockers(
        unit in cell(),
        claimed in prop::collection::vec(cell(), 0..12),
        blockers in prop::collection::vec(cell(), 0..12),
        prior in 0.0f64..0.1,
    ) {
        let unit_pos = GridPos::new(unit.0, unit.1);
        let mut world = WorldSnapshot::new(SIDE, SIDE).with_worker(1, unit_pos, 50);
        for (i, (x, y)) in blockers.iter().enumerate() {
            let pos = GridPos::new(*x, *y);
            if pos != unit_pos {
                world = world.with_resource(i as u32 + 10, ResourceKind::Wood, pos);
            }
        }

        let config = PlannerConfig { prior_density: prior, ..PlannerConfig::default() };
        let map = BeliefMap::new(SIDE, SIDE, prior).unwrap();
        let tracker = StateTracker::new();
        let ctx = PlanContext {
            world: &world,
            map: &map,
            tracker: &tracker,
            resource: None,
            hint: GridPos::new(SIDE - 1, 0),
        };

        let mut reservations = ReservationSet::new();
        for (x, y) in &claimed {
            reservations.claim(GridPos::new(*x, *y));
        }
        let before = reservations.clone();

        let decision = MovePlanner::new(&config).decide(&ctx, &world.workers[0], &mut reservations);

        match decision.action {
            Some(Action::Move(direction)) => {
                let to = unit_pos.step(direction);
                prop_assert!(world.in_bounds(to));
                prop_assert!(world.resource_at(to).is_none());
                prop_assert!(!before.is_claimed(to));
                prop_assert!(reservations.is_claimed(to));
                prop_assert_eq!(decision.destination, Some(to));
            }
            None => prop_assert!(reservations.is_claimed(unit_pos)),
            Some(other) => prop_assert!(false, "unexpected action {:?}", other),
        }
    }
}
