//! Movement intent and look integration.

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::player::{ControllerConfig, MoveInput, PlayerState};

/// Horizontal displacement for one step of `dt` seconds.
///
/// Input flags are combined in the player's local frame, normalized (so
/// diagonals are not faster) and rotated by `yaw`. Returns zero with no input
/// or when opposing keys cancel.
pub fn horizontal_intent(input: &MoveInput, yaw: f32, config: &ControllerConfig, dt: f32) -> Vec3 {
    // In Bevy: +X is right, +Y is up, -Z is forward
    let forward = Vec3::new(-yaw.sin(), 0.0, -yaw.cos());
    let right = Vec3::new(yaw.cos(), 0.0, -yaw.sin());

    let mut direction = Vec3::ZERO;
    if input.forward {
        direction += forward;
    }
    if input.backward {
        direction -= forward;
    }
    if input.right {
        direction += right;
    }
    if input.left {
        direction -= right;
    }

    if direction.length_squared() <= f32::EPSILON {
        return Vec3::ZERO;
    }

    let speed = if input.sprint {
        config.move_speed * config.sprint_multiplier
    } else {
        config.move_speed
    };
    direction.normalize() * speed * dt
}

/// Accumulate a look delta into yaw/pitch. Pitch is clamped, yaw wraps freely.
pub fn apply_look(player: &mut PlayerState, look_delta: Vec2, config: &ControllerConfig) {
    player.yaw -= look_delta.x * config.turn_rate;
    player.pitch = (player.pitch - look_delta.y * config.turn_rate).clamp(-FRAC_PI_2, FRAC_PI_2);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn input() -> MoveInput {
        MoveInput::default()
    }

    #[test]
    fn test_no_input_no_motion() {
        let config = ControllerConfig::default();
        assert_eq!(horizontal_intent(&input(), 0.3, &config, DT), Vec3::ZERO);
        let cancel = MoveInput {
            forward: true,
            backward: true,
            ..input()
        };
        assert_eq!(horizontal_intent(&cancel, 0.3, &config, DT), Vec3::ZERO);
    }

    #[test]
    fn test_forward_is_negative_z_at_zero_yaw() {
        let config = ControllerConfig::default();
        let fwd = MoveInput {
            forward: true,
            ..input()
        };
        let step = horizontal_intent(&fwd, 0.0, &config, DT);
        // 9 u/s at 60 Hz is the classic 0.15 per frame.
        assert!(step.distance(Vec3::new(0.0, 0.0, -0.15)) < 1e-6);
    }

    #[test]
    fn test_diagonal_normalized_and_sprint_scales() {
        let config = ControllerConfig::default();
        let diag = MoveInput {
            forward: true,
            right: true,
            ..input()
        };
        let walk = horizontal_intent(&diag, 1.0, &config, DT);
        assert!((walk.length() - 0.15).abs() < 1e-6);
        assert_eq!(walk.y, 0.0);

        let sprint = horizontal_intent(&MoveInput { sprint: true, ..diag }, 1.0, &config, DT);
        assert!((sprint.length() - 0.27).abs() < 1e-5);
    }

    #[test]
    fn test_yaw_rotates_strafe() {
        let config = ControllerConfig::default();
        let right = MoveInput {
            right: true,
            ..input()
        };
        // Quarter turn to the left: "right" now points toward -Z.
        let step = horizontal_intent(&right, FRAC_PI_2, &config, 1.0);
        assert!(step.distance(Vec3::new(0.0, 0.0, -9.0)) < 1e-4);
    }

    #[test]
    fn test_pitch_clamped_yaw_free() {
        let config = ControllerConfig::default();
        let mut player = PlayerState::spawned_at(Vec3::ZERO);
        apply_look(&mut player, Vec2::new(-10_000.0, -10_000.0), &config);
        assert!((player.yaw - 20.0).abs() < 1e-4);
        assert_eq!(player.pitch, FRAC_PI_2);
        apply_look(&mut player, Vec2::new(0.0, 50_000.0), &config);
        assert_eq!(player.pitch, -FRAC_PI_2);
    }
}
