//! Probabilistic threat belief: the map, the observation model that updates
//! it, the risk estimate read from it, and the visibility sweep that pins
//! directly seen cells.

pub mod map;
pub mod observation;
pub mod risk;
pub mod visibility;

pub use map::{BeliefMap, GridCell, ObservedKind};
pub use observation::{binomial_likelihood, Observation, ObservationModel, UpdateSummary};
pub use risk::RiskEstimator;
pub use visibility::sweep;

/// Probabilities below this snap to zero
pub const SNAP_TO_ZERO: f64 = 1e-6;

/// Probabilities above this snap to certainty. A coarse threshold rather
/// than a true posterior.
pub const SNAP_TO_CERTAIN: f64 = 0.5;

/// Belief value of a cell known to hold a threat
pub const CERTAIN: f64 = 1.0;

/// Apply the snapping thresholds and keep the value inside [0, 1]
pub fn settle(p: f64) -> f64 {
    if !p.is_finite() || p < SNAP_TO_ZERO {
        0.0
    } else if p > SNAP_TO_CERTAIN {
        CERTAIN
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_thresholds() {
        assert_eq!(settle(5e-7), 0.0);
        assert_eq!(settle(-0.2), 0.0);
        assert_eq!(settle(0.51), 1.0);
        assert_eq!(settle(3.0), 1.0);
        assert_eq!(settle(0.5), 0.5);
        assert_eq!(settle(f64::NAN), 0.0);
        assert_eq!(settle(0.01), 0.01);
    }
}
