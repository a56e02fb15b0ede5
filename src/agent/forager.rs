//! The forager agent: one owned value holding the belief map, the unit
//! tracker and the planner, driven one tick at a time.

use serde::{Deserialize, Serialize};

use crate::belief::{sweep, BeliefMap, Observation, ObservationModel};
use crate::core::config::PlannerConfig;
use crate::core::error::{ForagerError, Result};
use crate::core::types::{GridPos, Tick, UnitId};
use crate::planner::{production_order, Decision, MovePlanner, PlanContext, ReservationSet};
use crate::tracker::StateTracker;
use crate::world::{ActionMap, ResourceNode, WorldView};

/// Running totals over the agent's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    pub ticks: u64,
    pub hits: u32,
    pub misses: u32,
    pub deaths: u32,
    pub births: u32,
    pub production_orders: u32,
}

#[derive(Debug)]
pub struct ForagerAgent {
    config: PlannerConfig,
    map: BeliefMap,
    observer: ObservationModel,
    tracker: StateTracker,
    planner: MovePlanner,
    resource: Option<ResourceNode>,
    tick: Tick,
    stats: AgentStats,
}

impl ForagerAgent {
    /// Build an agent for a `width x height` board
    pub fn new(config: PlannerConfig, width: i32, height: i32) -> Result<Self> {
        config.validate()?;
        let map = BeliefMap::new(width, height, config.prior_density)?;

        Ok(Self {
            observer: ObservationModel::new(&config),
            planner: MovePlanner::new(&config),
            tracker: StateTracker::new(),
            map,
            resource: None,
            tick: 0,
            stats: AgentStats::default(),
            config,
        })
    }

    /// Build an agent sized to the board `world` describes
    pub fn for_world<W: WorldView + ?Sized>(config: PlannerConfig, world: &W) -> Result<Self> {
        Self::new(config, world.width(), world.height())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn belief(&self) -> &BeliefMap {
        &self.map
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    pub fn resource(&self) -> Option<&ResourceNode> {
        self.resource.as_ref()
    }

    pub fn stats(&self) -> AgentStats {
        self.stats
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Record a harvest target learned outside the visibility sweep.
    /// Only the configured resource kind is accepted; the first one sticks.
    pub fn note_resource(&mut self, node: ResourceNode) {
        if node.kind != self.config.target_resource || self.resource.is_some() {
            return;
        }
        tracing::info!("Resource {:?} sighted at {}", node.id, node.position);
        self.resource = Some(node);
    }

    /// Heading used before the resource has been sighted
    pub fn resource_hint(&self) -> GridPos {
        let hint = self
            .config
            .resource_hint
            .unwrap_or_else(|| GridPos::new(self.map.width() - 5, 2));
        GridPos::new(
            hint.x.clamp(0, self.map.width() - 1),
            hint.y.clamp(0, self.map.height() - 1),
        )
    }

    /// Run one tick: diff the roster, update the belief map, plan every
    /// unit in roster order, then let the base decide on production.
    pub fn tick<W: WorldView + ?Sized>(&mut self, world: &W) -> Result<ActionMap> {
        let expected = (self.map.width(), self.map.height());
        let actual = (world.width(), world.height());
        if expected != actual {
            return Err(ForagerError::BoardMismatch { expected, actual });
        }

        let tick = self.tick;
        self.tick += 1;
        self.stats.ticks += 1;

        self.update_beliefs(world, tick);
        let actions = self.plan(world);

        tracing::debug!(
            "Tick {}: {} workers, {} orders, unseen mass {:.3}",
            tick,
            world.workers().len(),
            actions.len(),
            self.map.unseen_mass()
        );
        Ok(actions)
    }

    fn update_beliefs<W: WorldView + ?Sized>(&mut self, world: &W, tick: Tick) {
        let roster = self.tracker.sync(world, tick);

        for record in &roster.died {
            let cell = record.last_known_cell();
            tracing::info!("Unit {:?} lost near {} (tick {})", record.id, cell, tick);
            self.observer.observe(&mut self.map, cell, Observation::Death);
            self.stats.deaths += 1;
        }

        for id in &roster.born {
            tracing::info!("Tracking unit {:?} from tick {}", id, tick);
            self.stats.births += 1;
        }

        for worker in world.workers() {
            let sighted = sweep(&mut self.map, world, worker.position, self.config.visibility_radius);
            for node in sighted {
                self.note_resource(node);
            }
        }

        for observation in &roster.observations {
            match observation.outcome {
                Observation::Hit => {
                    tracing::info!("Unit {:?} hit at {}", observation.id, observation.position);
                    self.stats.hits += 1;
                }
                _ => self.stats.misses += 1,
            }
            self.observer
                .observe(&mut self.map, observation.position, observation.outcome);
        }
    }

    fn plan<W: WorldView + ?Sized>(&mut self, world: &W) -> ActionMap {
        let ctx = PlanContext {
            world,
            map: &self.map,
            tracker: &self.tracker,
            resource: self.resource.as_ref(),
            hint: self.resource_hint(),
        };

        let mut reservations = ReservationSet::new();
        let decisions: Vec<(UnitId, Decision)> = world
            .workers()
            .iter()
            .map(|unit| (unit.id, self.planner.decide(&ctx, unit, &mut reservations)))
            .collect();

        let mut actions = ActionMap::new();
        for (id, decision) in decisions {
            self.tracker.set_intent(id, decision.activity, decision.destination);
            if let Some(action) = decision.action {
                actions.insert(id, action);
            }
        }

        if let Some((base, order)) = production_order(world, &self.config) {
            tracing::info!("Base {:?} orders a new worker", base);
            self.stats.production_orders += 1;
            actions.insert(base, order);
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Direction, ResourceId};
    use crate::world::{Action, ResourceKind, WorldSnapshot};

    #[test]
    fn test_rejects_mismatched_board() {
        let mut agent = ForagerAgent::new(PlannerConfig::default(), 10, 10).unwrap();
        let result = agent.tick(&WorldSnapshot::new(12, 10));
        assert!(matches!(
            result,
            Err(ForagerError::BoardMismatch {
                expected: (10, 10),
                actual: (12, 10)
            })
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PlannerConfig {
            prior_density: 2.0,
            ..PlannerConfig::default()
        };
        assert!(ForagerAgent::new(config, 10, 10).is_err());
    }

    #[test]
    fn test_default_resource_hint() {
        let agent = ForagerAgent::new(PlannerConfig::default(), 20, 12).unwrap();
        assert_eq!(agent.resource_hint(), GridPos::new(15, 2));

        let small = ForagerAgent::new(PlannerConfig::default(), 3, 3).unwrap();
        assert_eq!(small.resource_hint(), GridPos::new(0, 2));
    }

    #[test]
    fn test_note_resource_ignores_other_kinds() {
        let mut agent = ForagerAgent::new(PlannerConfig::default(), 10, 10).unwrap();
        agent.note_resource(ResourceNode {
            id: ResourceId(1),
            kind: ResourceKind::Wood,
            position: GridPos::new(3, 3),
        });
        assert!(agent.resource().is_none());

        agent.note_resource(ResourceNode {
            id: ResourceId(2),
            kind: ResourceKind::Gold,
            position: GridPos::new(9, 0),
        });
        assert_eq!(agent.resource().unwrap().id, ResourceId(2));
    }

    #[test]
    fn test_sweep_discovers_resource_and_gathers() {
        let world = WorldSnapshot::new(10, 10)
            .with_worker(1, GridPos::new(8, 1), 50)
            .with_resource(5, ResourceKind::Gold, GridPos::new(9, 0));
        let mut agent = ForagerAgent::for_world(PlannerConfig::default(), &world).unwrap();

        let actions = agent.tick(&world).unwrap();

        assert_eq!(agent.resource().unwrap().position, GridPos::new(9, 0));
        assert_eq!(actions.get(&UnitId(1)), Some(&Action::Gather(ResourceId(5))));
    }

    #[test]
    fn test_tick_counts_and_records_intent() {
        let world = WorldSnapshot::new(20, 20).with_worker(1, GridPos::new(10, 10), 50);
        let mut agent = ForagerAgent::for_world(PlannerConfig::default(), &world).unwrap();

        let actions = agent.tick(&world).unwrap();
        let Some(Action::Move(direction)) = actions.get(&UnitId(1)).copied() else {
            panic!("expected a move, got {:?}", actions);
        };

        let record = agent.tracker().get(UnitId(1)).unwrap();
        assert_eq!(record.intended, Some(GridPos::new(10, 10).step(direction)));
        assert_eq!(agent.current_tick(), 1);
        assert_eq!(agent.stats().births, 1);
        assert!(Direction::ALL.contains(&direction));
    }
}
