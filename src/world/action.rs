//! Actions the agent submits back to the simulator

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{Direction, ResourceId, TemplateId, UnitId};

/// One order for one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step one cell
    Move(Direction),
    /// Harvest from an adjacent resource node
    Gather(ResourceId),
    /// Hand cargo to an adjacent base
    Deposit(UnitId),
    /// Base-only: start producing a unit from a template
    Produce(TemplateId),
}

/// Orders for one tick, keyed by the acting unit
pub type ActionMap = BTreeMap<UnitId, Action>;
