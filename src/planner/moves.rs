//! Greedy one-step move planner
//!
//! Each unit either works the target it stands next to, or takes the single
//! step that minimises `risk + objective`. Chosen cells are reserved so no
//! later unit in the same tick can pick them.

use crate::belief::{BeliefMap, RiskEstimator};
use crate::core::config::PlannerConfig;
use crate::core::types::{Direction, GridPos};
use crate::planner::objective::{Goal, Objective};
use crate::planner::reservation::ReservationSet;
use crate::tracker::{StateTracker, UnitActivity};
use crate::world::{Action, ResourceNode, UnitSnapshot, WorldView};

/// Everything the planner reads for one tick
pub struct PlanContext<'a, W: WorldView + ?Sized> {
    pub world: &'a W,
    pub map: &'a BeliefMap,
    pub tracker: &'a StateTracker,
    /// Harvest target, once sighted
    pub resource: Option<&'a ResourceNode>,
    /// Heading while the resource is still unknown
    pub hint: GridPos,
}

/// The planner's verdict for one unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Option<Action>,
    pub activity: UnitActivity,
    /// Cell the unit is ordered into, when moving
    pub destination: Option<GridPos>,
    pub score: Option<f64>,
}

impl Decision {
    fn stay(action: Option<Action>, activity: UnitActivity) -> Self {
        Self {
            action,
            activity,
            destination: None,
            score: None,
        }
    }
}

/// A legal step and its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub direction: Direction,
    pub destination: GridPos,
    pub risk: f64,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct MovePlanner {
    config: PlannerConfig,
    risk: RiskEstimator,
}

impl MovePlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            config: config.clone(),
            risk: RiskEstimator::new(config),
        }
    }

    /// Decide one unit's action and claim its cell
    pub fn decide<W: WorldView + ?Sized>(
        &self,
        ctx: &PlanContext<'_, W>,
        unit: &UnitSnapshot,
        reservations: &mut ReservationSet,
    ) -> Decision {
        if !unit.carrying {
            if let Some(resource) = ctx.resource.filter(|r| unit.position.is_adjacent(&r.position)) {
                reservations.claim(unit.position);
                return Decision::stay(Some(Action::Gather(resource.id)), UnitActivity::Gathering);
            }
        } else if let Some(base) = ctx.world.base().filter(|b| unit.position.is_adjacent(&b.position)) {
            reservations.claim(unit.position);
            return Decision::stay(Some(Action::Deposit(base.id)), UnitActivity::Depositing);
        }

        let goal = Goal::resolve(unit.carrying, ctx.resource, ctx.world.base(), ctx.hint);
        match self.best_step(ctx, unit, goal, reservations) {
            Some(best) => {
                reservations.claim(best.destination);
                tracing::debug!(
                    "Unit {:?} at {} -> {:?} (risk={:.3}, score={:.3}, goal={:?})",
                    unit.id,
                    unit.position,
                    best.direction,
                    best.risk,
                    best.score,
                    goal.map(|g| g.position())
                );
                Decision {
                    action: Some(Action::Move(best.direction)),
                    activity: UnitActivity::Moving,
                    destination: Some(best.destination),
                    score: Some(best.score),
                }
            }
            None => {
                tracing::debug!("Unit {:?} at {} has no legal move", unit.id, unit.position);
                reservations.claim(unit.position);
                Decision::stay(None, UnitActivity::Idle)
            }
        }
    }

    /// Can a unit step into `pos` this tick?
    pub fn is_legal<W: WorldView + ?Sized>(
        &self,
        ctx: &PlanContext<'_, W>,
        pos: GridPos,
        reservations: &ReservationSet,
    ) -> bool {
        ctx.world.in_bounds(pos)
            && ctx.map.in_bounds(pos)
            && ctx.world.resource_at(pos).is_none()
            && ctx.world.occupant_at(pos).is_none()
            && !reservations.is_claimed(pos)
    }

    /// Every legal step, scored, in enumeration order
    pub fn candidates<W: WorldView + ?Sized>(
        &self,
        ctx: &PlanContext<'_, W>,
        unit: &UnitSnapshot,
        goal: Option<Goal>,
        reservations: &ReservationSet,
    ) -> Vec<Candidate> {
        let objective = Objective::new(&self.config, ctx.map, unit.position, goal);
        let trail = ctx.tracker.get(unit.id);

        Direction::ALL
            .iter()
            .filter_map(|&direction| {
                let destination = unit.position.step(direction);
                if !self.is_legal(ctx, destination, reservations) {
                    return None;
                }

                let productive = ctx.tracker.is_productive(destination)
                    || trail.map(|r| r.carried_through(destination)).unwrap_or(false);
                let risk = self.risk.risk_at(ctx.map, destination);
                let score = risk + objective.score(destination, productive);

                Some(Candidate {
                    direction,
                    destination,
                    risk,
                    score,
                })
            })
            .collect()
    }

    /// Lowest-scoring step; the earliest direction wins ties
    fn best_step<W: WorldView + ?Sized>(
        &self,
        ctx: &PlanContext<'_, W>,
        unit: &UnitSnapshot,
        goal: Option<Goal>,
        reservations: &ReservationSet,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for candidate in self.candidates(ctx, unit, goal, reservations) {
            if best.map_or(true, |b| candidate.score < b.score) {
                best = Some(candidate);
            }
        }
        best
    }
}
