//! Threat belief map
//!
//! One [`GridCell`] per board cell holding the current probability that a
//! hidden threat stands there, whether the cell has been seen directly, and
//! the visit/hit counters the observation model reads.

use serde::{Deserialize, Serialize};

use crate::core::error::{ForagerError, Result};
use crate::core::types::GridPos;
use crate::spatial::Grid;

/// What a unit saw standing on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservedKind {
    Empty,
    Resource,
    Friendly,
    Base,
    Hostile,
}

/// Belief state of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub threat_probability: f64,
    pub seen: bool,
    pub visit_count: u32,
    /// Never exceeds `visit_count`
    pub hit_count: u32,
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            threat_probability: 0.0,
            seen: false,
            visit_count: 0,
            hit_count: 0,
        }
    }
}

impl GridCell {
    fn with_prior(prior: f64) -> Self {
        Self {
            threat_probability: prior,
            ..Self::default()
        }
    }

    /// Unseen cells still open to inference (not seen, not pinned at certainty)
    pub fn is_open(&self) -> bool {
        !self.seen && self.threat_probability < 1.0
    }
}

/// Grid of per-cell threat beliefs with fixed dimensions
#[derive(Debug, Clone)]
pub struct BeliefMap {
    cells: Grid<GridCell>,
}

/// Largest board the map accepts, in cells
pub const MAX_BOARD_CELLS: usize = 1 << 24;

impl BeliefMap {
    /// Fill a `width x height` board with a uniform prior
    pub fn new(width: i32, height: i32, prior_density: f64) -> Result<Self> {
        if width <= 0 || height <= 0 || width as usize * height as usize > MAX_BOARD_CELLS {
            return Err(ForagerError::InvalidBoard { width, height });
        }
        if !(0.0..=1.0).contains(&prior_density) {
            return Err(ForagerError::InvalidConfig(format!(
                "prior density {} outside [0, 1]",
                prior_density
            )));
        }

        Ok(Self {
            cells: Grid::filled(width, height, GridCell::with_prior(prior_density)),
        })
    }

    pub fn width(&self) -> i32 {
        self.cells.width()
    }

    pub fn height(&self) -> i32 {
        self.cells.height()
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        self.cells.contains(pos)
    }

    pub fn cell(&self, pos: GridPos) -> Option<&GridCell> {
        self.cells.get(pos)
    }

    pub(crate) fn cell_mut(&mut self, pos: GridPos) -> Option<&mut GridCell> {
        self.cells.get_mut(pos)
    }

    /// Current threat belief; 0.0 ("no risk") outside the board
    pub fn probability_at(&self, pos: GridPos) -> f64 {
        self.cells
            .get(pos)
            .map(|c| c.threat_probability)
            .unwrap_or(0.0)
    }

    pub fn is_seen(&self, pos: GridPos) -> bool {
        self.cells.get(pos).map(|c| c.seen).unwrap_or(false)
    }

    /// Pin a directly observed cell. Resources and friendly/base occupants
    /// pin to 0, anything hostile pins to 1.
    pub fn mark_observed(&mut self, pos: GridPos, kind: ObservedKind) {
        let Some(cell) = self.cells.get_mut(pos) else {
            return;
        };

        cell.threat_probability = match kind {
            ObservedKind::Hostile => 1.0,
            ObservedKind::Empty
            | ObservedKind::Resource
            | ObservedKind::Friendly
            | ObservedKind::Base => 0.0,
        };
        cell.seen = true;
    }

    /// Total probability mass still held by open cells
    pub fn unseen_mass(&self) -> f64 {
        self.cells
            .values()
            .filter(|c| c.is_open())
            .map(|c| c.threat_probability)
            .sum()
    }

    pub fn seen_count(&self) -> usize {
        self.cells.values().filter(|c| c.seen).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &GridCell)> {
        self.cells.iter()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut GridCell> {
        self.cells.values_mut()
    }

    /// Cells believed to hold a threat with certainty
    pub fn certain_threats(&self) -> Vec<GridPos> {
        self.iter()
            .filter(|(_, c)| c.threat_probability >= 1.0)
            .map(|(p, _)| p)
            .collect()
    }

    /// ASCII heat map, one row per line.
    ///
    /// `.` seen and clear, `#` certain threat, digits 0-9 the unseen
    /// probability in tenths.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(((self.width() + 1) * self.height()) as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let cell = self.cells.get(GridPos::new(x, y)).copied().unwrap_or_default();
                let glyph = if cell.threat_probability >= 1.0 {
                    '#'
                } else if cell.seen {
                    '.'
                } else {
                    let tenths = (cell.threat_probability * 10.0).floor().clamp(0.0, 9.0) as u32;
                    char::from_digit(tenths, 10).unwrap_or('?')
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}
