//! Planner configuration with documented constants
//!
//! Every tunable of the belief update, risk estimate and move objective lives
//! here. Values are fixed for the whole run; nothing is persisted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ForagerError, Result};
use crate::core::types::GridPos;
use crate::world::ResourceKind;

/// Configuration for the belief map and move planner
///
/// Loaded from TOML; missing keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    // === BELIEF MAP ===
    /// Prior probability that any unseen cell hides a threat
    ///
    /// Roughly the expected threat count divided by the board area.
    pub prior_density: f64,

    /// How far a unit sees around itself (square radius, cells)
    ///
    /// Seen cells are pinned to 0 or 1 and leave the inference entirely.
    pub visibility_radius: i32,

    // === OBSERVATION MODEL ===
    /// Radius of cells a single hit/miss observation touches
    ///
    /// Should match the striking range of the threats.
    pub update_radius: i32,

    /// Per-visit chance that a threat in range lands a hit
    ///
    /// The `p` of the binomial likelihood.
    pub hit_likelihood: f64,

    // === RISK ESTIMATOR ===
    /// Radius of the neighbourhood summed into a risk score
    pub risk_radius: i32,

    /// Scale applied to the summed neighbourhood probability
    pub risk_scale: f64,

    // === OBJECTIVE ===
    /// Reward per cell of Manhattan progress toward the goal
    pub progress_weight: f64,

    /// Extra reward per cell of progress once within `near_goal_radius`
    ///
    /// Applies in both signs, so stepping away near the goal is penalised.
    pub near_goal_weight: f64,

    /// Manhattan distance under which the near-goal term kicks in
    pub near_goal_radius: i32,

    /// Maximum weight of the exploration bias
    ///
    /// Scaled by how far the unit still is from its goal, so it fades as
    /// the goal gets close.
    pub exploration_weight: f64,

    /// Bonus for stepping along the safer axis toward the goal
    ///
    /// Compares the mean belief of the column strip and the row strip
    /// between the unit and its goal. Steps along the safer axis earn it,
    /// steps along the other axis pay it.
    pub axis_weight: f64,

    /// Bonus for re-walking cells previously crossed while carrying cargo
    ///
    /// Experimental; 0.0 disables it.
    pub path_reuse_bonus: f64,

    // === GOALS & PRODUCTION ===
    /// Resource kind the workers harvest
    pub target_resource: ResourceKind,

    /// Where to head before the resource has been sighted
    ///
    /// `None` means `(width - 5, 2)` clamped into the board.
    pub resource_hint: Option<GridPos>,

    /// Stock needed before the base produces a replacement worker
    pub production_threshold: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            prior_density: 0.0085,
            visibility_radius: 2,

            update_radius: 4,
            hit_likelihood: 0.75,

            risk_radius: 4,
            risk_scale: 0.75,

            progress_weight: 0.4,
            near_goal_weight: 0.2,
            near_goal_radius: 7,
            exploration_weight: 0.3,
            axis_weight: 0.5,
            path_reuse_bonus: 0.0,

            target_resource: ResourceKind::Gold,
            resource_hint: None,
            production_threshold: 400,
        }
    }
}

impl PlannerConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.prior_density) {
            return Err(ForagerError::InvalidConfig(format!(
                "prior_density ({}) must be within [0, 1]",
                self.prior_density
            )));
        }

        if !(0.0..=1.0).contains(&self.hit_likelihood) {
            return Err(ForagerError::InvalidConfig(format!(
                "hit_likelihood ({}) must be within [0, 1]",
                self.hit_likelihood
            )));
        }

        if self.visibility_radius < 0 || self.update_radius < 0 || self.risk_radius < 0 {
            return Err(ForagerError::InvalidConfig(
                "radii must be non-negative".into(),
            ));
        }

        if self.risk_scale < 0.0
            || self.exploration_weight < 0.0
            || self.axis_weight < 0.0
            || self.path_reuse_bonus < 0.0
        {
            return Err(ForagerError::InvalidConfig(
                "risk_scale, exploration_weight, axis_weight and path_reuse_bonus must be non-negative".into(),
            ));
        }

        Ok(())
    }
}

/// Load a planner config from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<PlannerConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config = PlannerConfig::from_toml_str(&contents)?;
    tracing::debug!("Loaded planner config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.update_radius, 4);
        assert_eq!(config.risk_scale, 0.75);
        assert_eq!(config.path_reuse_bonus, 0.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PlannerConfig::from_toml_str("prior_density = 0.02\nvisibility_radius = 3\n")
            .expect("partial config should parse");
        assert_eq!(config.prior_density, 0.02);
        assert_eq!(config.visibility_radius, 3);
        assert_eq!(config.risk_radius, PlannerConfig::default().risk_radius);
    }

    #[test]
    fn test_resource_hint_from_toml() {
        let config = PlannerConfig::from_toml_str("[resource_hint]\nx = 7\ny = 1\n").unwrap();
        assert_eq!(config.resource_hint, Some(GridPos::new(7, 1)));
    }

    #[test]
    fn test_rejects_out_of_range_prior() {
        let result = PlannerConfig::from_toml_str("prior_density = 1.5\n");
        assert!(matches!(result, Err(ForagerError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_negative_radius() {
        let config = PlannerConfig {
            risk_radius: -1,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = PlannerConfig::from_toml_str("prior_density = [");
        assert!(matches!(result, Err(ForagerError::TomlError(_))));
    }

    #[test]
    fn test_load_bundled_default() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/planner/default.toml");
        let config = load_config(path).expect("bundled config should load");
        assert_eq!(config, PlannerConfig::default());
    }
}
