//! Arena parameters

use serde::{Deserialize, Serialize};

use crate::core::error::{ForagerError, Result};

/// Smallest board the layout generator can place a base and a mine on
pub const MIN_BOARD_SIDE: i32 = 8;

/// Configuration for one arena game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // === BOARD ===
    pub width: i32,
    pub height: i32,
    pub seed: u64,

    /// Hidden threats placed at generation time
    pub threat_count: u32,
    /// Threats never spawn closer than this (Chebyshev) to the base
    pub min_threat_distance: i32,
    /// Impassable trees scattered over the board
    pub tree_count: u32,

    // === THREATS ===
    /// Chebyshev range a threat strikes within
    pub threat_range: i32,
    /// Chance each strike lands
    pub hit_chance: f64,
    /// HP removed per landed strike
    pub damage: i32,

    // === WORKERS ===
    pub initial_workers: u32,
    pub worker_hp: i32,
    /// Gold carried home per gather
    pub gather_amount: u32,
    /// How far a worker sees threats (Chebyshev)
    pub sight_radius: i32,

    // === ECONOMY ===
    /// Gold held by the mine at the start
    pub mine_amount: u32,
    /// Stock spent per produced worker
    pub production_cost: u32,
    /// Gold delivered over the game needed to win
    pub target_gold: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            seed: 42,
            threat_count: 8,
            min_threat_distance: 6,
            tree_count: 12,

            threat_range: 4,
            hit_chance: 0.75,
            damage: 10,

            initial_workers: 2,
            worker_hp: 50,
            gather_amount: 100,
            sight_radius: 2,

            mine_amount: 5000,
            production_cost: 400,
            target_gold: 2000,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_BOARD_SIDE || self.height < MIN_BOARD_SIDE {
            return Err(ForagerError::InvalidBoard {
                width: self.width,
                height: self.height,
            });
        }

        if !(0.0..=1.0).contains(&self.hit_chance) {
            return Err(ForagerError::InvalidConfig(format!(
                "hit_chance ({}) must be within [0, 1]",
                self.hit_chance
            )));
        }

        if self.worker_hp <= 0 || self.damage < 0 {
            return Err(ForagerError::InvalidConfig(
                "worker_hp must be positive and damage non-negative".into(),
            ));
        }

        if self.initial_workers == 0 || self.initial_workers > 8 {
            return Err(ForagerError::InvalidConfig(format!(
                "initial_workers ({}) must be between 1 and 8",
                self.initial_workers
            )));
        }

        if self.threat_range < 0 || self.sight_radius < 0 || self.min_threat_distance < 0 {
            return Err(ForagerError::InvalidConfig(
                "ranges must be non-negative".into(),
            ));
        }

        Ok(())
    }
}
