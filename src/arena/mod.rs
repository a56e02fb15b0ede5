//! Reference simulator
//!
//! A small deterministic game the agent can be run against: a base, a gold
//! mine, some trees and hidden threats that strike any worker wandering into
//! range. The agent only ever sees [`Arena::snapshot`], which hides threats
//! outside every worker's sight.

pub mod config;
pub mod layout;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{Direction, GridPos, ResourceId, TemplateId, Tick, UnitId};
use crate::world::{
    Action, ActionMap, BaseSnapshot, Occupant, ResourceKind, ResourceNode, UnitSnapshot, WorldSnapshot,
};

pub use config::ArenaConfig;
pub use layout::ArenaLayout;

pub const BASE_ID: UnitId = UnitId(1);
pub const MINE_ID: ResourceId = ResourceId(1);
pub const WORKER_TEMPLATE: TemplateId = TemplateId(1);

const FIRST_WORKER_ID: u32 = 10;
const FIRST_THREAT_ID: u32 = 10_000;
const FIRST_TREE_ID: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    /// Enough gold delivered
    Victory,
    /// Every worker dead
    Defeat,
}

/// What happened during one [`Arena::step`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub tick: Tick,
    /// Workers struck by a threat, once per landed strike
    pub hits: Vec<UnitId>,
    pub deaths: Vec<UnitId>,
    /// Gold handed in at the base this step
    pub deposited: u32,
    pub produced: Option<UnitId>,
}

#[derive(Debug, Clone, Copy)]
struct Worker {
    id: UnitId,
    position: GridPos,
    hp: i32,
    cargo: u32,
}

#[derive(Debug, Clone, Copy)]
struct Threat {
    id: UnitId,
    position: GridPos,
}

#[derive(Debug, Clone)]
pub struct Arena {
    config: ArenaConfig,
    rng: ChaCha8Rng,
    base: GridPos,
    mine: GridPos,
    mine_left: u32,
    trees: Vec<ResourceNode>,
    workers: Vec<Worker>,
    threats: Vec<Threat>,
    stock: u32,
    delivered: u32,
    workers_lost: u32,
    next_worker: u32,
    tick: Tick,
}

impl Arena {
    /// Generate a board from `config.seed`
    pub fn new(config: ArenaConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let layout = ArenaLayout::generate(&config, &mut rng)?;
        Ok(Self::build(config, layout, rng))
    }

    /// Use a hand-made layout; threat strikes still draw from `config.seed`
    pub fn with_layout(config: ArenaConfig, layout: ArenaLayout) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self::build(config, layout, rng))
    }

    fn build(config: ArenaConfig, layout: ArenaLayout, rng: ChaCha8Rng) -> Self {
        let workers: Vec<Worker> = layout
            .workers
            .iter()
            .enumerate()
            .map(|(i, &position)| Worker {
                id: UnitId(FIRST_WORKER_ID + i as u32),
                position,
                hp: config.worker_hp,
                cargo: 0,
            })
            .collect();
        let threats = layout
            .threats
            .iter()
            .enumerate()
            .map(|(i, &position)| Threat {
                id: UnitId(FIRST_THREAT_ID + i as u32),
                position,
            })
            .collect();
        let trees = layout
            .trees
            .iter()
            .enumerate()
            .map(|(i, &position)| ResourceNode {
                id: ResourceId(FIRST_TREE_ID + i as u32),
                kind: ResourceKind::Wood,
                position,
            })
            .collect();

        Self {
            mine_left: config.mine_amount,
            next_worker: FIRST_WORKER_ID + workers.len() as u32,
            base: layout.base,
            mine: layout.mine,
            trees,
            workers,
            threats,
            stock: 0,
            delivered: 0,
            workers_lost: 0,
            tick: 0,
            rng,
            config,
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Gold handed in over the whole game, before production spending
    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    pub fn workers_lost(&self) -> u32 {
        self.workers_lost
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn threat_positions(&self) -> Vec<GridPos> {
        self.threats.iter().map(|t| t.position).collect()
    }

    pub fn outcome(&self) -> Outcome {
        if self.delivered >= self.config.target_gold {
            Outcome::Victory
        } else if self.workers.is_empty() {
            Outcome::Defeat
        } else {
            Outcome::InProgress
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome() != Outcome::InProgress
    }

    fn mine_node(&self) -> ResourceNode {
        ResourceNode {
            id: MINE_ID,
            kind: ResourceKind::Gold,
            position: self.mine,
        }
    }

    /// What the agent may see this tick
    pub fn snapshot(&self) -> WorldSnapshot {
        let sight = self.config.sight_radius;
        let others = self
            .threats
            .iter()
            .filter(|t| self.workers.iter().any(|w| w.position.chebyshev(&t.position) <= sight))
            .map(|t| Occupant {
                id: t.id,
                position: t.position,
            })
            .collect();

        let mut resources = vec![self.mine_node()];
        resources.extend(self.trees.iter().copied());

        WorldSnapshot {
            width: self.config.width,
            height: self.config.height,
            workers: self
                .workers
                .iter()
                .map(|w| UnitSnapshot {
                    id: w.id,
                    position: w.position,
                    hp: w.hp,
                    carrying: w.cargo > 0,
                })
                .collect(),
            base: Some(BaseSnapshot {
                id: BASE_ID,
                position: self.base,
            }),
            resources,
            others,
            stock: self.stock,
            worker_template: WORKER_TEMPLATE,
        }
    }

    /// Cell nobody stands on and nothing blocks
    fn is_free(&self, pos: GridPos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.config.width
            && pos.y < self.config.height
            && pos != self.base
            && pos != self.mine
            && !self.trees.iter().any(|t| t.position == pos)
            && !self.workers.iter().any(|w| w.position == pos)
            && !self.threats.iter().any(|t| t.position == pos)
    }

    /// Apply the agent's orders, then let the threats strike
    pub fn step(&mut self, actions: &ActionMap) -> StepReport {
        let mut report = StepReport {
            tick: self.tick,
            ..StepReport::default()
        };

        for (&id, &action) in actions {
            match action {
                Action::Produce(template) if id == BASE_ID && template == WORKER_TEMPLATE => {
                    report.produced = self.produce();
                }
                Action::Move(direction) => self.move_worker(id, direction),
                Action::Gather(resource) if resource == MINE_ID => self.gather(id),
                Action::Deposit(base) if base == BASE_ID => report.deposited += self.deposit(id),
                other => tracing::debug!("Ignoring {:?} from {:?}", other, id),
            }
        }

        self.strike(&mut report);

        let lost: Vec<UnitId> = self.workers.iter().filter(|w| w.hp <= 0).map(|w| w.id).collect();
        if !lost.is_empty() {
            self.workers.retain(|w| w.hp > 0);
            self.workers_lost += lost.len() as u32;
            for id in &lost {
                tracing::info!("Worker {:?} killed on tick {}", id, self.tick);
            }
            report.deaths = lost;
        }

        self.tick += 1;
        report
    }

    fn worker_index(&self, id: UnitId) -> Option<usize> {
        self.workers.iter().position(|w| w.id == id)
    }

    fn move_worker(&mut self, id: UnitId, direction: Direction) {
        let Some(index) = self.worker_index(id) else {
            return;
        };
        let destination = self.workers[index].position.step(direction);
        if self.is_free(destination) {
            self.workers[index].position = destination;
        }
    }

    fn gather(&mut self, id: UnitId) {
        let Some(index) = self.worker_index(id) else {
            return;
        };
        let worker = &mut self.workers[index];
        if worker.cargo > 0 || !worker.position.is_adjacent(&self.mine) || self.mine_left == 0 {
            return;
        }
        let amount = self.config.gather_amount.min(self.mine_left);
        self.mine_left -= amount;
        worker.cargo = amount;
    }

    fn deposit(&mut self, id: UnitId) -> u32 {
        let Some(index) = self.worker_index(id) else {
            return 0;
        };
        let worker = &mut self.workers[index];
        if !worker.position.is_adjacent(&self.base) {
            return 0;
        }
        let amount = std::mem::take(&mut worker.cargo);
        self.stock += amount;
        self.delivered += amount;
        amount
    }

    fn produce(&mut self) -> Option<UnitId> {
        if self.stock < self.config.production_cost {
            return None;
        }
        let spawn = Direction::ALL
            .iter()
            .map(|&d| self.base.step(d))
            .find(|&pos| self.is_free(pos))?;

        self.stock -= self.config.production_cost;
        let id = UnitId(self.next_worker);
        self.next_worker += 1;
        self.workers.push(Worker {
            id,
            position: spawn,
            hp: self.config.worker_hp,
            cargo: 0,
        });
        tracing::info!("Base produced worker {:?} at {}", id, spawn);
        Some(id)
    }

    /// Each threat strikes the nearest worker in range; ties go to roster order
    fn strike(&mut self, report: &mut StepReport) {
        for threat in &self.threats {
            let target = self
                .workers
                .iter_mut()
                .filter(|w| w.hp > 0)
                .map(|w| (w.position.chebyshev(&threat.position), w))
                .filter(|(d, _)| *d <= self.config.threat_range)
                .min_by_key(|(d, _)| *d);

            if let Some((_, worker)) = target {
                if self.rng.gen_bool(self.config.hit_chance) {
                    worker.hp -= self.config.damage;
                    report.hits.push(worker.id);
                    tracing::trace!("Threat {:?} hit worker {:?}", threat.id, worker.id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_config() -> ArenaConfig {
        ArenaConfig {
            width: 12,
            height: 12,
            initial_workers: 1,
            threat_count: 0,
            tree_count: 0,
            ..ArenaConfig::default()
        }
    }

    fn layout(config: &ArenaConfig, workers: Vec<GridPos>, threats: Vec<GridPos>) -> ArenaLayout {
        ArenaLayout {
            workers,
            threats,
            ..ArenaLayout::fixed(config)
        }
    }

    fn first_worker(arena: &Arena) -> UnitSnapshot {
        arena.snapshot().workers[0]
    }

    #[test]
    fn test_snapshot_hides_distant_threats() {
        let config = open_config();
        let arena = Arena::with_layout(
            config.clone(),
            layout(&config, vec![GridPos::new(5, 5)], vec![GridPos::new(6, 6), GridPos::new(10, 10)]),
        )
        .unwrap();

        let snapshot = arena.snapshot();
        assert_eq!(snapshot.others.len(), 1);
        assert_eq!(snapshot.others[0].position, GridPos::new(6, 6));
        assert_eq!(snapshot.resources[0].id, MINE_ID);
    }

    #[test]
    fn test_move_into_blocked_cell_is_ignored() {
        let config = open_config();
        let mut arena = Arena::with_layout(config.clone(), layout(&config, vec![GridPos::new(2, 10)], vec![])).unwrap();

        // The base sits at (1, 10)
        arena.step(&ActionMap::from([(UnitId(10), Action::Move(Direction::West))]));
        assert_eq!(first_worker(&arena).position, GridPos::new(2, 10));

        arena.step(&ActionMap::from([(UnitId(10), Action::Move(Direction::North))]));
        assert_eq!(first_worker(&arena).position, GridPos::new(2, 9));
    }

    #[test]
    fn test_gather_then_deposit() {
        let config = open_config();
        let mine = ArenaLayout::fixed(&config).mine;
        let mut arena = Arena::with_layout(
            config.clone(),
            layout(&config, vec![GridPos::new(mine.x - 1, mine.y)], vec![]),
        )
        .unwrap();

        arena.step(&ActionMap::from([(UnitId(10), Action::Gather(MINE_ID))]));
        assert!(first_worker(&arena).carrying);

        // Deposit away from the base does nothing
        let report = arena.step(&ActionMap::from([(UnitId(10), Action::Deposit(BASE_ID))]));
        assert_eq!(report.deposited, 0);
        assert!(first_worker(&arena).carrying);
    }

    #[test]
    fn test_deposit_and_produce() {
        let config = open_config();
        let base = ArenaLayout::fixed(&config).base;
        let mut arena =
            Arena::with_layout(config.clone(), layout(&config, vec![base.step(Direction::East)], vec![])).unwrap();
        arena.workers[0].cargo = 400;

        let report = arena.step(&ActionMap::from([(UnitId(10), Action::Deposit(BASE_ID))]));
        assert_eq!(report.deposited, 400);
        assert_eq!(arena.stock(), 400);

        let report = arena.step(&ActionMap::from([(BASE_ID, Action::Produce(WORKER_TEMPLATE))]));
        assert_eq!(report.produced, Some(UnitId(11)));
        assert_eq!(arena.stock(), 0);
        assert_eq!(arena.worker_count(), 2);
        assert_eq!(arena.delivered(), 400);
    }

    #[test]
    fn test_certain_threat_kills() {
        let config = ArenaConfig {
            hit_chance: 1.0,
            damage: 25,
            ..open_config()
        };
        let mut arena = Arena::with_layout(
            config.clone(),
            layout(&config, vec![GridPos::new(5, 5)], vec![GridPos::new(8, 8)]),
        )
        .unwrap();

        let first = arena.step(&ActionMap::new());
        assert_eq!(first.hits, vec![UnitId(10)]);
        assert!(first.deaths.is_empty());

        let second = arena.step(&ActionMap::new());
        assert_eq!(second.deaths, vec![UnitId(10)]);
        assert_eq!(arena.outcome(), Outcome::Defeat);
        assert_eq!(arena.workers_lost(), 1);
    }

    #[test]
    fn test_threat_out_of_range_is_harmless() {
        let config = ArenaConfig {
            hit_chance: 1.0,
            ..open_config()
        };
        let mut arena = Arena::with_layout(
            config.clone(),
            layout(&config, vec![GridPos::new(2, 2)], vec![GridPos::new(7, 2)]),
        )
        .unwrap();

        let report = arena.step(&ActionMap::new());
        assert!(report.hits.is_empty());
        assert_eq!(arena.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_victory_on_target_gold() {
        let config = ArenaConfig {
            target_gold: 100,
            ..open_config()
        };
        let base = ArenaLayout::fixed(&config).base;
        let mut arena =
            Arena::with_layout(config.clone(), layout(&config, vec![base.step(Direction::North)], vec![])).unwrap();
        arena.workers[0].cargo = 100;

        arena.step(&ActionMap::from([(UnitId(10), Action::Deposit(BASE_ID))]));
        assert_eq!(arena.outcome(), Outcome::Victory);
        assert!(arena.is_over());
    }
}
