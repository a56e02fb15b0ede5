//! Observation model: turns "this unit got hit / did not get hit here" into
//! an update of the belief map.
//!
//! Each observation is scored with a binomial likelihood evaluated at the
//! observation cell's visit/hit counters. A hit concentrates belief into the
//! neighbourhood within striking range; a miss drains it from there and
//! spreads the drained mass over every other open cell.

use serde::{Deserialize, Serialize};

use crate::belief::map::BeliefMap;
use crate::belief::{settle, CERTAIN};
use crate::core::config::PlannerConfig;
use crate::core::types::GridPos;

/// Outcome of one unit's tick at its current cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Observation {
    /// HP dropped since the previous tick
    Hit,
    /// HP unchanged
    Miss,
    /// The unit vanished from the roster; treated as a certain hit
    Death,
}

/// What an update did, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpdateSummary {
    /// Open cells inside the update radius
    pub touched: usize,
    /// Likelihood factor applied (complement for misses)
    pub factor: f64,
    /// Mass of the renormalised set before the update
    pub mass_before: f64,
    /// Mass of the renormalised set after the update (after clamping)
    pub mass_after: f64,
    /// False when renormalisation was skipped on a zero divisor
    pub renormalized: bool,
}

/// `C(n, k) * p^k * (1 - p)^(n - k)`, computed in log space so large visit
/// counts neither overflow the coefficient nor underflow the powers into NaN.
pub fn binomial_likelihood(visits: u32, hits: u32, p: f64) -> f64 {
    if hits > visits {
        return 0.0;
    }
    let misses = visits - hits;
    let q = 1.0 - p;

    let mut ln = ln_choose(visits, hits);
    if hits > 0 {
        if p <= 0.0 {
            return 0.0;
        }
        ln += hits as f64 * p.ln();
    }
    if misses > 0 {
        if q <= 0.0 {
            return 0.0;
        }
        ln += misses as f64 * q.ln();
    }
    ln.exp().clamp(0.0, 1.0)
}

fn ln_choose(n: u32, k: u32) -> f64 {
    let k = k.min(n - k);
    (1..=k)
        .map(|i| ((n - k + i) as f64).ln() - (i as f64).ln())
        .sum()
}

/// Applies hit/miss evidence to a [`BeliefMap`]
#[derive(Debug, Clone, Copy)]
pub struct ObservationModel {
    radius: i32,
    hit_likelihood: f64,
}

impl ObservationModel {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            radius: config.update_radius,
            hit_likelihood: config.hit_likelihood,
        }
    }

    /// Likelihood of the counters observed at a cell
    pub fn likelihood(&self, visits: u32, hits: u32) -> f64 {
        binomial_likelihood(visits, hits, self.hit_likelihood)
    }

    /// Count the visit at `pos` and fold the outcome into the map.
    /// Out-of-bounds positions are ignored.
    pub fn observe(&self, map: &mut BeliefMap, pos: GridPos, outcome: Observation) -> UpdateSummary {
        let Some(cell) = map.cell_mut(pos) else {
            return UpdateSummary::default();
        };

        cell.visit_count += 1;
        if matches!(outcome, Observation::Hit | Observation::Death) {
            cell.hit_count = (cell.hit_count + 1).min(cell.visit_count);
        }
        let (visits, hits) = (cell.visit_count, cell.hit_count);

        let summary = match outcome {
            Observation::Hit => self.apply_hit(map, pos, self.likelihood(visits, hits)),
            Observation::Death => self.apply_hit(map, pos, 1.0),
            Observation::Miss => self.apply_miss(map, pos, 1.0 - self.likelihood(visits, hits)),
        };

        tracing::trace!(
            "{:?} at {} (visits={}, hits={}): touched={} factor={:.4} mass {:.4} -> {:.4}",
            outcome,
            pos,
            visits,
            hits,
            summary.touched,
            summary.factor,
            summary.mass_before,
            summary.mass_after
        );
        summary
    }

    /// Open cells within the update radius of `pos`
    fn touched_cells(&self, map: &BeliefMap, pos: GridPos) -> Vec<GridPos> {
        pos.square(self.radius)
            .filter(|p| map.cell(*p).map(|c| c.is_open()).unwrap_or(false))
            .collect()
    }

    /// Scale the local neighbourhood by `factor`, then restore its mass.
    ///
    /// The restored mass is the pre-update mass, raised to one expected
    /// threat unless a certain threat already sits within range and
    /// explains the hit.
    fn apply_hit(&self, map: &mut BeliefMap, pos: GridPos, factor: f64) -> UpdateSummary {
        let touched = self.touched_cells(map, pos);
        let explained = pos
            .square(self.radius)
            .any(|p| map.probability_at(p) >= CERTAIN);

        let mass_before: f64 = touched.iter().map(|p| map.probability_at(*p)).sum();
        let mut scaled = 0.0;
        for p in &touched {
            if let Some(cell) = map.cell_mut(*p) {
                cell.threat_probability *= factor;
                scaled += cell.threat_probability;
            }
        }

        let renormalized = scaled > 0.0;
        if renormalized {
            let target = if explained {
                mass_before
            } else {
                mass_before.max(1.0)
            };
            let scale = target / scaled;
            for p in &touched {
                if let Some(cell) = map.cell_mut(*p) {
                    cell.threat_probability *= scale;
                }
            }
        }

        let mut mass_after = 0.0;
        for p in &touched {
            if let Some(cell) = map.cell_mut(*p) {
                cell.threat_probability = settle(cell.threat_probability);
                mass_after += cell.threat_probability;
            }
        }

        UpdateSummary {
            touched: touched.len(),
            factor,
            mass_before,
            mass_after,
            renormalized,
        }
    }

    /// Scale the local neighbourhood by `factor`, then rescale every open
    /// cell so the board's total open mass is unchanged.
    fn apply_miss(&self, map: &mut BeliefMap, pos: GridPos, factor: f64) -> UpdateSummary {
        let mass_before = map.unseen_mass();
        let touched = self.touched_cells(map, pos);

        for p in &touched {
            if let Some(cell) = map.cell_mut(*p) {
                cell.threat_probability *= factor;
            }
        }

        let remaining = map.unseen_mass();
        let renormalized = remaining > 0.0;
        let scale = if renormalized { mass_before / remaining } else { 1.0 };

        let mut mass_after = 0.0;
        for cell in map.cells_mut() {
            if cell.is_open() {
                cell.threat_probability = settle(cell.threat_probability * scale);
                if cell.threat_probability < CERTAIN {
                    mass_after += cell.threat_probability;
                }
            }
        }

        UpdateSummary {
            touched: touched.len(),
            factor,
            mass_before,
            mass_after,
            renormalized,
        }
    }
}
