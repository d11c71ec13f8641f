//! Player-related constants and types

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    error::SceneError,
    geometry::{Aabb, GeometryError},
};

/// Player movement speed (units per second)
pub const PLAYER_SPEED: f32 = 9.0;

/// Sprint speed factor while Shift is held
pub const SPRINT_MULTIPLIER: f32 = 1.8;

/// Player height (eye point above feet)
pub const PLAYER_HEIGHT: f32 = 1.8;

/// Half of the collision box width
pub const PLAYER_HALF_WIDTH: f32 = 0.5;

/// Radians of turn per unit of look delta
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// Jump velocity in m/s (upward).
/// Peaks roughly 3m up with GRAVITY = -72.
pub const JUMP_VELOCITY: f32 = 21.0;

/// Gravity in m/s^2 (negative Y).
/// Much stronger than real-world: short, snappy hops.
pub const GRAVITY: f32 = -72.0;

/// Below this height the player is considered lost and respawned.
pub const WORLD_FLOOR: f32 = -50.0;

/// Spawn position (eye point): above the parking area, falls onto the plateau.
pub const SPAWN_POSITION: [f32; 3] = [0.0, 20.0, 50.0];

/// Tuning for the character controller. Loaded from RON; every field defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub half_width: f32,
    pub standing_height: f32,
    pub move_speed: f32,
    pub sprint_multiplier: f32,
    pub turn_rate: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    pub world_floor: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            half_width: PLAYER_HALF_WIDTH,
            standing_height: PLAYER_HEIGHT,
            move_speed: PLAYER_SPEED,
            sprint_multiplier: SPRINT_MULTIPLIER,
            turn_rate: MOUSE_SENSITIVITY,
            jump_impulse: JUMP_VELOCITY,
            gravity: GRAVITY,
            world_floor: WORLD_FLOOR,
        }
    }
}

impl ControllerConfig {
    /// Reject tuning that would produce a degenerate collision box or a
    /// gravity that pushes the player upward.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let values = [
            self.half_width,
            self.standing_height,
            self.move_speed,
            self.sprint_multiplier,
            self.turn_rate,
            self.jump_impulse,
            self.gravity,
            self.world_floor,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if self.half_width <= 0.0 {
            return Err(GeometryError::Inverted {
                axis: 'x',
                min: -self.half_width,
                max: self.half_width,
            });
        }
        if self.standing_height <= 0.0 {
            return Err(GeometryError::Inverted {
                axis: 'y',
                min: 0.0,
                max: self.standing_height,
            });
        }
        if self.gravity > 0.0 {
            return Err(GeometryError::UpwardGravity {
                gravity: self.gravity,
            });
        }
        Ok(())
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Load tuning from a RON file. A missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No controller config at {:?}; using defaults", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text).map_err(|e| SceneError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Movement flags held this step.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(default)]
pub struct MoveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    /// Jump button held. Only a fresh press while grounded triggers a jump.
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocomotionState {
    Grounded,
    #[default]
    Airborne,
}

/// Kinematic state of the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Eye point. Feet are `standing_height` below.
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub state: LocomotionState,
    /// Jump was held on the previous step.
    pub jump_latched: bool,
}

impl PlayerState {
    pub fn spawned_at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            state: LocomotionState::Airborne,
            jump_latched: false,
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.state == LocomotionState::Grounded
    }

    pub fn feet(&self, config: &ControllerConfig) -> f32 {
        self.position.y - config.standing_height
    }

    pub fn pose(&self) -> PlayerPose {
        PlayerPose {
            position: self.position,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }
}

/// What the renderer needs to place its viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Collision box standing on `ground` at horizontal position `(x, z)`.
pub fn standing_box(x: f32, z: f32, ground: f32, config: &ControllerConfig) -> Aabb {
    let hw = config.half_width;
    Aabb::from_validated(
        Vec3::new(x - hw, ground, z - hw),
        Vec3::new(x + hw, ground + config.standing_height, z + hw),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config = ControllerConfig::from_ron_str("(move_speed: 4.5, gravity: -30.0)").unwrap();
        assert_eq!(config.move_speed, 4.5);
        assert_eq!(config.gravity, -30.0);
        assert_eq!(config.standing_height, PLAYER_HEIGHT);
        assert_eq!(config.jump_impulse, JUMP_VELOCITY);
    }

    #[test]
    fn test_bad_ron_is_error() {
        assert!(ControllerConfig::from_ron_str("(move_speed: fast)").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_tuning() {
        assert!(ControllerConfig::default().validate().is_ok());
        let narrow = ControllerConfig {
            half_width: 0.0,
            ..Default::default()
        };
        assert!(narrow.validate().is_err());
        let floaty = ControllerConfig {
            gravity: 9.8,
            ..Default::default()
        };
        assert!(matches!(
            floaty.validate(),
            Err(GeometryError::UpwardGravity { .. })
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ControllerConfig::load_or_default("/definitely/not/here/controller.ron").unwrap();
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn test_spawn_starts_airborne() {
        let p = PlayerState::spawned_at(Vec3::from(SPAWN_POSITION));
        assert!(!p.is_grounded());
        assert!(!p.jump_latched);
        assert_eq!(p.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_standing_box_extent() {
        let config = ControllerConfig::default();
        let b = standing_box(1.0, 2.0, 4.0, &config);
        assert!(b.min().distance(Vec3::new(0.5, 4.0, 1.5)) < 1e-5);
        assert!(b.max().distance(Vec3::new(1.5, 5.8, 2.5)) < 1e-5);
    }
}
