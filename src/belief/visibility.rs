//! Line-of-sight sweep around a unit
//!
//! Everything inside the visibility square is observed directly, so those
//! cells leave the inference and get pinned on the belief map.

use crate::belief::map::{BeliefMap, ObservedKind};
use crate::core::types::GridPos;
use crate::world::{ResourceNode, WorldView};

/// Classify what stands on a cell. Resources win over occupants.
pub fn classify<W: WorldView + ?Sized>(world: &W, pos: GridPos) -> (ObservedKind, Option<ResourceNode>) {
    if let Some(node) = world.resource_at(pos) {
        return (ObservedKind::Resource, Some(node));
    }

    match world.occupant_at(pos) {
        None => (ObservedKind::Empty, None),
        Some(id) if world.base().map(|b| b.id) == Some(id) => (ObservedKind::Base, None),
        Some(id) if world.worker(id).is_some() => (ObservedKind::Friendly, None),
        Some(_) => (ObservedKind::Hostile, None),
    }
}

/// Pin every in-bounds cell within `radius` of `center`.
///
/// Returns the resource nodes sighted during the sweep.
pub fn sweep<W: WorldView + ?Sized>(
    map: &mut BeliefMap,
    world: &W,
    center: GridPos,
    radius: i32,
) -> Vec<ResourceNode> {
    let mut sighted = Vec::new();

    for pos in center.square(radius) {
        if !world.in_bounds(pos) || !map.in_bounds(pos) {
            continue;
        }

        let (kind, node) = classify(world, pos);
        if kind == ObservedKind::Hostile && !map.is_seen(pos) {
            tracing::info!("Threat spotted at {}", pos);
        }
        map.mark_observed(pos, kind);
        if let Some(node) = node {
            sighted.push(node);
        }
    }

    sighted
}
