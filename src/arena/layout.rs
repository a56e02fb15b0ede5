//! Seeded board generation

use ahash::AHashSet;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::arena::config::ArenaConfig;
use crate::core::error::{ForagerError, Result};
use crate::core::types::{Direction, GridPos};

const PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Where everything starts on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaLayout {
    pub base: GridPos,
    pub mine: GridPos,
    pub trees: Vec<GridPos>,
    pub threats: Vec<GridPos>,
    pub workers: Vec<GridPos>,
}

impl ArenaLayout {
    /// Base in the bottom-left corner, mine top-right, workers around the base
    pub fn fixed(config: &ArenaConfig) -> Self {
        let base = GridPos::new(1, config.height - 2);
        let mine = GridPos::new(config.width - 3, 2);
        let workers = Direction::ALL
            .iter()
            .map(|&d| base.step(d))
            .take(config.initial_workers as usize)
            .collect();

        Self {
            base,
            mine,
            trees: Vec::new(),
            threats: Vec::new(),
            workers,
        }
    }

    /// Fixed anchors plus trees and threats scattered by `rng`
    pub fn generate(config: &ArenaConfig, rng: &mut ChaCha8Rng) -> Result<Self> {
        let mut layout = Self::fixed(config);
        let mut taken: AHashSet<GridPos> = layout.workers.iter().copied().collect();
        taken.insert(layout.base);
        taken.insert(layout.mine);

        // Trees stay clear of the base and the mine so both remain reachable
        for _ in 0..config.tree_count {
            let pos = random_cell(config, rng, |pos| {
                !taken.contains(&pos) && pos.chebyshev(&layout.base) > 2 && pos.chebyshev(&layout.mine) > 1
            })?;
            taken.insert(pos);
            layout.trees.push(pos);
        }

        for _ in 0..config.threat_count {
            let pos = random_cell(config, rng, |pos| {
                !taken.contains(&pos)
                    && pos.chebyshev(&layout.base) >= config.min_threat_distance
                    && pos.chebyshev(&layout.mine) > 1
            })?;
            taken.insert(pos);
            layout.threats.push(pos);
        }

        tracing::debug!(
            "Generated {}x{} arena: {} trees, {} threats (seed {})",
            config.width,
            config.height,
            layout.trees.len(),
            layout.threats.len(),
            config.seed
        );
        Ok(layout)
    }
}

fn random_cell(
    config: &ArenaConfig,
    rng: &mut ChaCha8Rng,
    accept: impl Fn(GridPos) -> bool,
) -> Result<GridPos> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let pos = GridPos::new(rng.gen_range(0..config.width), rng.gen_range(0..config.height));
        if accept(pos) {
            return Ok(pos);
        }
    }
    Err(ForagerError::InvalidConfig(format!(
        "could not place everything on a {}x{} board",
        config.width, config.height
    )))
}
