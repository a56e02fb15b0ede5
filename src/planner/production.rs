//! Base-level production rule
//!
//! When the workforce is down to a single worker and the stock can pay for
//! it, the base orders a replacement. Production never takes a reservation.

use crate::core::config::PlannerConfig;
use crate::core::types::UnitId;
use crate::world::{Action, WorldView};

/// The base's order for this tick, if any
pub fn production_order<W: WorldView + ?Sized>(world: &W, config: &PlannerConfig) -> Option<(UnitId, Action)> {
    let base = world.base()?;
    if world.workers().len() != 1 || world.stock() < config.production_threshold {
        return None;
    }
    Some((base.id, Action::Produce(world.worker_template())))
}
