//! Neighbourhood risk estimate
//!
//! An approximation of the expected number of threats within striking range
//! of a cell. Overlapping threat ranges are counted more than once.

use crate::belief::map::BeliefMap;
use crate::core::config::PlannerConfig;
use crate::core::types::GridPos;

#[derive(Debug, Clone, Copy)]
pub struct RiskEstimator {
    radius: i32,
    scale: f64,
}

impl RiskEstimator {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            radius: config.risk_radius,
            scale: config.risk_scale,
        }
    }

    /// Scaled sum of threat beliefs over the square of `radius` around `pos`.
    /// Cells off the board contribute nothing.
    pub fn risk_at(&self, map: &BeliefMap, pos: GridPos) -> f64 {
        let total: f64 = pos
            .square(self.radius)
            .map(|p| map.probability_at(p))
            .sum();
        self.scale * total
    }
}
