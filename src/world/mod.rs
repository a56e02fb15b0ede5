//! The simulator-facing surface: what the agent reads each tick and what it
//! hands back.

pub mod action;
pub mod snapshot;

pub use action::{Action, ActionMap};
pub use snapshot::{
    BaseSnapshot, Occupant, ResourceKind, ResourceNode, UnitSnapshot, WorldSnapshot, WorldView,
};
