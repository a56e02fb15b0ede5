//! Goal-directed part of a move's score (lower is better)
//!
//! Progress toward the current goal is rewarded, more strongly once the
//! goal is close. Far from the goal a small exploration bias steers units
//! toward whichever half of the board currently looks least threatened,
//! and steps along the safer of the two axes toward the goal are preferred.

use crate::belief::BeliefMap;
use crate::core::config::PlannerConfig;
use crate::core::types::GridPos;
use crate::world::{BaseSnapshot, ResourceNode};

/// Where a unit is heading this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Goal {
    /// Empty-handed, resource already sighted
    Resource(ResourceNode),
    /// Carrying cargo home
    Base(BaseSnapshot),
    /// Empty-handed, resource not sighted yet: head for the hint cell
    Explore(GridPos),
}

impl Goal {
    /// Pick the goal for a unit. `None` only when carrying with no base.
    pub fn resolve(
        carrying: bool,
        resource: Option<&ResourceNode>,
        base: Option<BaseSnapshot>,
        hint: GridPos,
    ) -> Option<Goal> {
        if carrying {
            base.map(Goal::Base)
        } else {
            Some(resource.map_or(Goal::Explore(hint), |r| Goal::Resource(*r)))
        }
    }

    pub fn position(&self) -> GridPos {
        match self {
            Goal::Resource(node) => node.position,
            Goal::Base(base) => base.position,
            Goal::Explore(pos) => *pos,
        }
    }

    pub fn seeks_resource(&self) -> bool {
        matches!(self, Goal::Resource(_) | Goal::Explore(_))
    }
}

/// Side of the board relative to a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    West,
    East,
    North,
    South,
}

/// Mean threat belief of the four half-planes around a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlaneDensity {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
}

impl HalfPlaneDensity {
    /// Empty half-planes (unit on the board edge) count as infinitely dense
    /// so they are never preferred.
    pub fn around(map: &BeliefMap, pos: GridPos) -> Self {
        let mut sums = [0.0f64; 4];
        let mut counts = [0u32; 4];

        for (cell_pos, cell) in map.iter() {
            let p = cell.threat_probability;
            if cell_pos.x < pos.x {
                sums[0] += p;
                counts[0] += 1;
            } else if cell_pos.x > pos.x {
                sums[1] += p;
                counts[1] += 1;
            }
            if cell_pos.y < pos.y {
                sums[2] += p;
                counts[2] += 1;
            } else if cell_pos.y > pos.y {
                sums[3] += p;
                counts[3] += 1;
            }
        }

        let mean = |i: usize| {
            if counts[i] == 0 {
                f64::INFINITY
            } else {
                sums[i] / counts[i] as f64
            }
        };

        Self {
            west: mean(0),
            east: mean(1),
            north: mean(2),
            south: mean(3),
        }
    }

    /// Least threatened side; ties go to West, East, North, South in order
    pub fn safest(&self) -> Side {
        let mut best = (Side::West, self.west);
        for candidate in [(Side::East, self.east), (Side::North, self.north), (Side::South, self.south)] {
            if candidate.1 < best.1 {
                best = candidate;
            }
        }
        best.0
    }
}

/// Direction of travel between a unit and its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Means closer than this count as equally safe
const AXIS_TIE: f64 = 1e-9;

/// Mean threat belief of the strips a unit crosses on its way to a goal
///
/// `columns` spans the columns from the unit's up to the goal's (exclusive)
/// over every row; `rows` spans the rows likewise over every column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStrips {
    pub columns: f64,
    pub rows: f64,
}

impl AxisStrips {
    /// `None` when the unit already shares a column or a row with the goal
    pub fn between(map: &BeliefMap, from: GridPos, to: GridPos) -> Option<Self> {
        let (x_lo, x_hi) = strip_bounds(from.x, to.x);
        let (y_lo, y_hi) = strip_bounds(from.y, to.y);
        if x_lo == x_hi || y_lo == y_hi {
            return None;
        }

        let mut column_sum = 0.0;
        let mut row_sum = 0.0;
        for (pos, cell) in map.iter() {
            if (x_lo..x_hi).contains(&pos.x) {
                column_sum += cell.threat_probability;
            }
            if (y_lo..y_hi).contains(&pos.y) {
                row_sum += cell.threat_probability;
            }
        }

        Some(Self {
            columns: column_sum / ((x_hi - x_lo) as f64 * map.height() as f64),
            rows: row_sum / ((y_hi - y_lo) as f64 * map.width() as f64),
        })
    }

    /// The axis whose strip is clearly safer; `None` on a tie
    pub fn safer(&self) -> Option<Axis> {
        if (self.columns - self.rows).abs() < AXIS_TIE {
            None
        } else if self.columns < self.rows {
            Some(Axis::Horizontal)
        } else {
            Some(Axis::Vertical)
        }
    }
}

/// Half-open range of lines from `from` toward `to`, including `from`
fn strip_bounds(from: i32, to: i32) -> (i32, i32) {
    if from <= to {
        (from, to)
    } else {
        (to + 1, from + 1)
    }
}

/// Does moving from `from` to `to` along one coordinate approach `target`?
fn approaches(from: i32, to: i32, target: i32) -> bool {
    to != from && (to - from).signum() == (target - from).signum()
}

/// Does stepping from `from` to `to` head into `side`?
fn heads_into(side: Side, from: GridPos, to: GridPos) -> bool {
    match side {
        Side::West => to.x < from.x,
        Side::East => to.x > from.x,
        Side::North => to.y < from.y,
        Side::South => to.y > from.y,
    }
}

/// Objective scorer for one unit's candidate moves this tick
#[derive(Debug, Clone)]
pub struct Objective<'a> {
    config: &'a PlannerConfig,
    goal: Option<Goal>,
    current: GridPos,
    safest: Option<Side>,
    axis: Option<Axis>,
    span: f64,
}

impl<'a> Objective<'a> {
    pub fn new(config: &'a PlannerConfig, map: &BeliefMap, current: GridPos, goal: Option<Goal>) -> Self {
        let safest = if config.exploration_weight > 0.0 {
            Some(HalfPlaneDensity::around(map, current).safest())
        } else {
            None
        };

        let axis = match goal {
            Some(goal) if config.axis_weight > 0.0 => {
                AxisStrips::between(map, current, goal.position()).and_then(|s| s.safer())
            }
            _ => None,
        };

        Self {
            config,
            goal,
            current,
            safest,
            axis,
            span: (map.width() + map.height()).max(1) as f64,
        }
    }

    /// Score a step to `next`. `productive` says whether `next` lies on a
    /// cell walked before with cargo.
    pub fn score(&self, next: GridPos, productive: bool) -> f64 {
        let mut value = 0.0;

        let remaining = match self.goal {
            Some(goal) => {
                let target = goal.position();
                let d_cur = self.current.manhattan(&target);
                let d_next = next.manhattan(&target);
                let gain = (d_cur - d_next) as f64;

                if gain > 0.0 {
                    value -= self.config.progress_weight * gain;
                }
                if d_cur < self.config.near_goal_radius {
                    value -= self.config.near_goal_weight * gain;
                }
                if productive && goal.seeks_resource() {
                    value -= self.config.path_reuse_bonus;
                }
                if let Some(axis) = self.axis {
                    let weight = self.config.axis_weight;
                    if approaches(self.current.x, next.x, target.x) {
                        value += if axis == Axis::Horizontal { -weight } else { weight };
                    }
                    if approaches(self.current.y, next.y, target.y) {
                        value += if axis == Axis::Vertical { -weight } else { weight };
                    }
                }
                (d_cur as f64 / self.span).min(1.0)
            }
            None => 1.0,
        };

        if let Some(side) = self.safest {
            let bias = if heads_into(side, self.current, next) { -1.0 } else { 1.0 };
            value += self.config.exploration_weight * remaining * bias;
        }

        value
    }
}
