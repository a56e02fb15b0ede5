//! Unit state tracker
//!
//! Diffs each tick's roster against the previous one: new ids are births,
//! missing ids are deaths, survivors yield a hit/miss observation.

pub mod record;

use std::collections::BTreeMap;

use ahash::AHashSet;

use crate::belief::Observation;
use crate::core::types::{GridPos, Tick, UnitId};
use crate::world::WorldView;

pub use record::{UnitActivity, UnitRecord};

/// A survivor's outcome this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitObservation {
    pub id: UnitId,
    pub position: GridPos,
    pub outcome: Observation,
}

/// Result of syncing the tracker with a snapshot
#[derive(Debug, Default)]
pub struct RosterUpdate {
    /// Ids seen for the first time, in roster order
    pub born: Vec<UnitId>,
    /// Records of units no longer in the roster, in id order
    pub died: Vec<UnitRecord>,
    /// Survivors' outcomes, in roster order
    pub observations: Vec<UnitObservation>,
}

#[derive(Debug, Default)]
pub struct StateTracker {
    records: BTreeMap<UnitId, UnitRecord>,
    /// Every cell any worker has stood on while carrying cargo
    productive: AHashSet<GridPos>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the tracker in line with `world`'s live roster
    pub fn sync<W: WorldView + ?Sized>(&mut self, world: &W, tick: Tick) -> RosterUpdate {
        let live: AHashSet<UnitId> = world.workers().iter().map(|w| w.id).collect();
        let mut update = RosterUpdate::default();

        let gone: Vec<UnitId> = self
            .records
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in gone {
            if let Some(record) = self.records.remove(&id) {
                update.died.push(record);
            }
        }

        for worker in world.workers() {
            match self.records.get_mut(&worker.id) {
                None => {
                    self.records.insert(worker.id, UnitRecord::new(worker, tick));
                    update.born.push(worker.id);
                }
                Some(record) => {
                    let hit = record.refresh(worker);
                    update.observations.push(UnitObservation {
                        id: worker.id,
                        position: worker.position,
                        outcome: if hit { Observation::Hit } else { Observation::Miss },
                    });
                }
            }
            if worker.carrying {
                self.productive.insert(worker.position);
            }
        }

        update
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitRecord> {
        self.records.get(&id)
    }

    /// Remember what a unit was told to do this tick
    pub fn set_intent(&mut self, id: UnitId, activity: UnitActivity, destination: Option<GridPos>) {
        if let Some(record) = self.records.get_mut(&id) {
            record.activity = activity;
            record.intended = destination;
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &UnitRecord> {
        self.records.values()
    }

    /// True when some worker has walked `pos` with cargo
    pub fn is_productive(&self, pos: GridPos) -> bool {
        self.productive.contains(&pos)
    }
}
