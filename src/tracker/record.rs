//! What the agent remembers about one worker between ticks

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, Tick, UnitId};
use crate::world::UnitSnapshot;

/// What a live unit was last ordered to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitActivity {
    #[default]
    Idle,
    Moving,
    Gathering,
    Depositing,
}

#[derive(Debug, Clone)]
pub struct UnitRecord {
    pub id: UnitId,
    pub hp: i32,
    pub position: GridPos,
    pub carrying: bool,
    pub activity: UnitActivity,
    /// Destination of the move ordered last tick, if any
    pub intended: Option<GridPos>,
    pub first_seen: Tick,
    /// Cells this unit has stood on, and whether it carried cargo there
    cargo_trail: AHashMap<GridPos, bool>,
}

impl UnitRecord {
    pub fn new(snapshot: &UnitSnapshot, tick: Tick) -> Self {
        let mut cargo_trail = AHashMap::new();
        cargo_trail.insert(snapshot.position, snapshot.carrying);
        Self {
            id: snapshot.id,
            hp: snapshot.hp,
            position: snapshot.position,
            carrying: snapshot.carrying,
            activity: UnitActivity::Idle,
            intended: None,
            first_seen: tick,
            cargo_trail,
        }
    }

    /// Where the unit most plausibly was when it died: the cell it was
    /// ordered into while moving, else the cell it was last seen on.
    pub fn last_known_cell(&self) -> GridPos {
        match self.activity {
            UnitActivity::Moving => self.intended.unwrap_or(self.position),
            UnitActivity::Idle | UnitActivity::Gathering | UnitActivity::Depositing => self.position,
        }
    }

    /// Fold a fresh snapshot in. Returns true when HP dropped.
    pub(crate) fn refresh(&mut self, snapshot: &UnitSnapshot) -> bool {
        let hit = snapshot.hp < self.hp;
        self.hp = snapshot.hp;
        self.position = snapshot.position;
        self.carrying = snapshot.carrying;
        self.intended = None;

        let carried = self.cargo_trail.entry(snapshot.position).or_insert(false);
        *carried |= snapshot.carrying;
        hit
    }

    /// True when this unit has stood on `pos` while carrying cargo
    pub fn carried_through(&self, pos: GridPos) -> bool {
        self.cargo_trail.get(&pos).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(hp: i32, x: i32, y: i32, carrying: bool) -> UnitSnapshot {
        UnitSnapshot {
            id: UnitId(1),
            position: GridPos::new(x, y),
            hp,
            carrying,
        }
    }

    #[test]
    fn test_refresh_detects_hp_loss() {
        let mut record = UnitRecord::new(&snap(50, 0, 0, false), 0);
        assert!(!record.refresh(&snap(50, 1, 0, false)));
        assert!(record.refresh(&snap(40, 2, 0, false)));
        assert_eq!(record.hp, 40);
        assert!(!record.refresh(&snap(45, 2, 1, false)));
    }

    #[test]
    fn test_cargo_trail_remembers_carrying_cells() {
        let mut record = UnitRecord::new(&snap(50, 0, 0, false), 0);
        record.refresh(&snap(50, 1, 0, true));
        record.refresh(&snap(50, 2, 0, false));
        record.refresh(&snap(50, 1, 0, false));

        assert!(record.carried_through(GridPos::new(1, 0)));
        assert!(!record.carried_through(GridPos::new(2, 0)));
        assert!(!record.carried_through(GridPos::new(0, 0)));
        assert!(!record.carried_through(GridPos::new(5, 5)));
    }

    #[test]
    fn test_last_known_cell_prefers_intended_destination() {
        let mut record = UnitRecord::new(&snap(50, 3, 3, false), 0);
        assert_eq!(record.last_known_cell(), GridPos::new(3, 3));
        record.activity = UnitActivity::Moving;
        record.intended = Some(GridPos::new(4, 3));
        assert_eq!(record.last_known_cell(), GridPos::new(4, 3));
        record.refresh(&snap(50, 4, 3, false));
        assert_eq!(record.intended, None);
        assert_eq!(record.last_known_cell(), GridPos::new(4, 3));
    }

    #[test]
    fn test_last_known_cell_ignores_stale_intent_when_not_moving() {
        let mut record = UnitRecord::new(&snap(50, 3, 3, false), 0);
        record.intended = Some(GridPos::new(4, 3));
        record.activity = UnitActivity::Gathering;
        assert_eq!(record.last_known_cell(), GridPos::new(3, 3));
    }
}
