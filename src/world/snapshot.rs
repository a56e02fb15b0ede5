//! Per-tick world snapshot
//!
//! The simulator owns the world; the agent only ever sees it through
//! [`WorldView`]. [`WorldSnapshot`] is the plain data implementation used by
//! the arena and by tests.

use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, ResourceId, TemplateId, UnitId};

/// Kinds of resource node found on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Gold,
    Wood,
}

/// A resource node. Resource cells can never be walked onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub position: GridPos,
}

/// A live friendly worker as seen this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub position: GridPos,
    pub hp: i32,
    pub carrying: bool,
}

/// The home base (deposit target, producer of new workers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSnapshot {
    pub id: UnitId,
    pub position: GridPos,
}

/// Any other unit standing on the board (e.g. a threat in plain sight)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: UnitId,
    pub position: GridPos,
}

/// Read-only view of the world for one tick
pub trait WorldView {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    /// Live friendly workers, in the simulator's roster order
    fn workers(&self) -> &[UnitSnapshot];

    fn worker(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.workers().iter().find(|w| w.id == id)
    }

    fn base(&self) -> Option<BaseSnapshot>;

    fn resource_at(&self, pos: GridPos) -> Option<ResourceNode>;

    /// Id of whatever unit stands on `pos`, friendly or not
    fn occupant_at(&self, pos: GridPos) -> Option<UnitId>;

    /// Resource stock held at the base
    fn stock(&self) -> u32;

    /// Template the base uses to produce a worker
    fn worker_template(&self) -> TemplateId;
}

/// Plain-data world snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub width: i32,
    pub height: i32,
    pub workers: Vec<UnitSnapshot>,
    pub base: Option<BaseSnapshot>,
    pub resources: Vec<ResourceNode>,
    /// Visible non-friendly units
    pub others: Vec<Occupant>,
    pub stock: u32,
    pub worker_template: TemplateId,
}

impl WorldSnapshot {
    /// Empty board with nothing on it
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            workers: Vec::new(),
            base: None,
            resources: Vec::new(),
            others: Vec::new(),
            stock: 0,
            worker_template: TemplateId(0),
        }
    }

    pub fn with_worker(mut self, id: u32, position: GridPos, hp: i32) -> Self {
        self.workers.push(UnitSnapshot {
            id: UnitId(id),
            position,
            hp,
            carrying: false,
        });
        self
    }

    pub fn with_base(mut self, id: u32, position: GridPos) -> Self {
        self.base = Some(BaseSnapshot {
            id: UnitId(id),
            position,
        });
        self
    }

    pub fn with_resource(mut self, id: u32, kind: ResourceKind, position: GridPos) -> Self {
        self.resources.push(ResourceNode {
            id: ResourceId(id),
            kind,
            position,
        });
        self
    }

    pub fn with_other(mut self, id: u32, position: GridPos) -> Self {
        self.others.push(Occupant {
            id: UnitId(id),
            position,
        });
        self
    }

    pub fn worker_mut(&mut self, id: UnitId) -> Option<&mut UnitSnapshot> {
        self.workers.iter_mut().find(|w| w.id == id)
    }
}

impl WorldView for WorldSnapshot {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn workers(&self) -> &[UnitSnapshot] {
        &self.workers
    }

    fn base(&self) -> Option<BaseSnapshot> {
        self.base
    }

    fn resource_at(&self, pos: GridPos) -> Option<ResourceNode> {
        self.resources.iter().find(|r| r.position == pos).copied()
    }

    fn occupant_at(&self, pos: GridPos) -> Option<UnitId> {
        if let Some(worker) = self.workers.iter().find(|w| w.position == pos) {
            return Some(worker.id);
        }
        if let Some(base) = self.base.filter(|b| b.position == pos) {
            return Some(base.id);
        }
        self.others.iter().find(|o| o.position == pos).map(|o| o.id)
    }

    fn stock(&self) -> u32 {
        self.stock
    }

    fn worker_template(&self) -> TemplateId {
        self.worker_template
    }
}
