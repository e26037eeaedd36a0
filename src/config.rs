//! Creature tuning and logging configuration.

use std::f32::consts::PI;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FOOTPRINT: f32 = 16.0;
pub const DEFAULT_MAX_MOVE_SPEED: f32 = 1.0;
/// One percent of max speed per tick, at sixty ticks per second.
pub const DEFAULT_MOVE_ACCELERATION: f32 = 100.0 / 60.0 / 100.0;
pub const DEFAULT_VISUAL_RANGE: f32 = 100.0;
pub const DEFAULT_VISUAL_ANGLE: f32 = 130.0;

/// Kinematic and perception constants shared by every creature of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureParams {
    pub size: f32,
    pub max_move_speed: f32,
    pub move_acceleration: f32,
    pub max_turn_speed: f32,
    pub turn_acceleration: f32,
    pub visual_range: f32,
    /// Full width of the visual cone in degrees.
    pub visual_angle: f32,
}

impl CreatureParams {
    /// Parameters for a creature of the given footprint. The max turn speed
    /// is the rotation that rolls the body's circumference by `max_move_speed`.
    pub fn for_footprint(size: f32, max_move_speed: f32) -> Self {
        Self {
            size,
            max_move_speed,
            move_acceleration: DEFAULT_MOVE_ACCELERATION,
            max_turn_speed: rolling_turn_speed(size, max_move_speed),
            turn_acceleration: DEFAULT_MOVE_ACCELERATION,
            visual_range: DEFAULT_VISUAL_RANGE,
            visual_angle: DEFAULT_VISUAL_ANGLE,
        }
    }

    pub fn half_visual_angle(&self) -> f32 {
        self.visual_angle / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.size > 0.0, "creature size must be positive");
        ensure!(self.max_move_speed > 0.0, "max_move_speed must be positive");
        ensure!(self.move_acceleration > 0.0, "move_acceleration must be positive");
        ensure!(self.max_turn_speed > 0.0, "max_turn_speed must be positive");
        ensure!(self.turn_acceleration > 0.0, "turn_acceleration must be positive");
        ensure!(self.visual_range > 0.0, "visual_range must be positive");
        ensure!(
            (0.0..=360.0).contains(&self.visual_angle),
            "visual_angle must lie in [0, 360]"
        );
        Ok(())
    }
}

impl Default for CreatureParams {
    fn default() -> Self {
        Self::for_footprint(DEFAULT_FOOTPRINT, DEFAULT_MAX_MOVE_SPEED)
    }
}

pub fn rolling_turn_speed(size: f32, max_move_speed: f32) -> f32 {
    360.0 / (2.0 * (size / 2.0) * PI) * max_move_speed
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = CreatureParams::default();
        assert_eq!(params.size, 16.0);
        assert_eq!(params.max_move_speed, 1.0);
        assert!((params.move_acceleration - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(params.turn_acceleration, params.move_acceleration);
        assert!((params.max_turn_speed - 7.1620).abs() < 1e-3);
        assert_eq!(params.half_visual_angle(), 65.0);
        params.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_zero_footprint() {
        let params = CreatureParams {
            size: 0.0,
            ..CreatureParams::default()
        };
        assert!(params.validate().is_err());
        assert!(!rolling_turn_speed(0.0, 1.0).is_finite());
    }

    #[test]
    fn test_validation_rejects_zero_acceleration() {
        let params = CreatureParams {
            move_acceleration: 0.0,
            ..CreatureParams::default()
        };
        assert!(params.validate().is_err());
    }
}
