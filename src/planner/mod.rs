//! Risk-aware action planning: per-unit move selection, the tick's
//! reservation set and the base's production rule.

pub mod moves;
pub mod objective;
pub mod production;
pub mod reservation;

pub use moves::{Candidate, Decision, MovePlanner, PlanContext};
pub use objective::{Goal, HalfPlaneDensity, Objective, Side};
pub use production::production_order;
pub use reservation::ReservationSet;
