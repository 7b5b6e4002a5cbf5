//! Global configuration constants and the tunable [`PhysicsConfig`].

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default edge length of a spatial index cell, in world units.
pub const DEFAULT_CELL_SIZE: f32 = 300.0;

/// Upper bound on a single frame's delta time (in seconds).
pub const MAX_DELTA_TIME: f32 = 0.1;

/// Divisor applied to the mover's vertical speed when choosing the resolution axis.
pub const VERTICAL_BIAS_DIVISOR: f32 = 50.0;

/// Frame budget used when reporting slow frames (in milliseconds).
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 1000.0 / 60.0;

/// What happens when two non-pushable entities interpenetrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImmovablePairPolicy {
    /// The entity being updated is pushed out, as if it were pushable.
    #[default]
    MoveMover,
    /// Neither entity moves and no callback fires.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub cell_size: f32,
    pub max_delta_time: f32,
    pub vertical_bias_divisor: f32,
    pub immovable_pairs: ImmovablePairPolicy,
    pub frame_budget_ms: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            max_delta_time: MAX_DELTA_TIME,
            vertical_bias_divisor: VERTICAL_BIAS_DIVISOR,
            immovable_pairs: ImmovablePairPolicy::default(),
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> EngineResult<()> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !positive(self.cell_size) {
            return Err(EngineError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if !positive(self.max_delta_time) {
            return Err(EngineError::InvalidConfig(format!(
                "max_delta_time must be positive, got {}",
                self.max_delta_time
            )));
        }
        if !positive(self.vertical_bias_divisor) {
            return Err(EngineError::InvalidConfig(format!(
                "vertical_bias_divisor must be positive, got {}",
                self.vertical_bias_divisor
            )));
        }
        if !positive(self.frame_budget_ms) {
            return Err(EngineError::InvalidConfig(format!(
                "frame_budget_ms must be positive, got {}",
                self.frame_budget_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: PhysicsConfig =
            serde_json::from_str(r#"{ "cell_size": 64.0, "immovable_pairs": "ignore" }"#).unwrap();
        assert_eq!(config.cell_size, 64.0);
        assert_eq!(config.max_delta_time, MAX_DELTA_TIME);
        assert_eq!(config.immovable_pairs, ImmovablePairPolicy::Ignore);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        let config = PhysicsConfig {
            cell_size: 0.0,
            ..PhysicsConfig::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }
}
