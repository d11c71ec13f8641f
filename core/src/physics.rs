//! Character-controller style physics.
//!
//! Goals:
//! - Deterministic ground contact against terrain, ramps and floor plates
//! - Horizontal moves rejected outright when they would enter an obstacle
//! - Runs at a fixed timestep (see `FIXED_TIMESTEP_HZ`)
//!
//! This is intentionally lightweight: no rigid bodies, no slope friction, and
//! obstacles never block vertical motion.

use bevy::prelude::*;

use crate::{
    ground::GroundResolver,
    movement::{apply_look, horizontal_intent},
    obstacles::ObstacleSet,
    player::{standing_box, ControllerConfig, LocomotionState, MoveInput, PlayerState},
};

/// Owns the avatar and advances it one fixed step at a time.
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: ControllerConfig,
    spawn: Vec3,
    player: PlayerState,
}

impl PlayerController {
    pub fn new(spawn: Vec3, config: ControllerConfig) -> Self {
        Self {
            config,
            spawn,
            player: PlayerState::spawned_at(spawn),
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Teleport back to spawn with zero velocity and orientation.
    pub fn reset(&mut self) {
        self.player = PlayerState::spawned_at(self.spawn);
    }

    pub fn look(&mut self, look_delta: Vec2) {
        apply_look(&mut self.player, look_delta, &self.config);
    }

    /// Step the player character one fixed tick.
    ///
    /// Order matters:
    /// 1. gravity
    /// 2. horizontal candidate, tested against obstacles at its ground height
    /// 3. vertical integration and ground snap
    /// 4. jump (on a fresh press only)
    /// 5. out-of-world recovery
    pub fn step(
        &mut self,
        ground: &GroundResolver,
        obstacles: &ObstacleSet,
        input: &MoveInput,
        dt: f32,
    ) {
        let config = self.config;
        let player = &mut self.player;

        // --- Gravity ---
        player.velocity.y += config.gravity * dt;

        // --- Horizontal ---
        let intent = horizontal_intent(input, player.yaw, &config, dt);
        if intent != Vec3::ZERO {
            let candidate = player.position + intent;
            // Gate floors on the pre-move elevation: the candidate's own height is unresolved.
            let candidate_ground =
                ground.effective_ground(candidate.x, candidate.z, player.position.y);
            let candidate_box = standing_box(candidate.x, candidate.z, candidate_ground, &config);
            match obstacles.first_blocking(&candidate_box) {
                None => {
                    player.position.x = candidate.x;
                    player.position.z = candidate.z;
                }
                Some(hit) => {
                    trace!("Move blocked by {:?} at {:?}", hit.kind, hit.bounds.min());
                }
            }
        }

        // --- Vertical ---
        player.position.y += player.velocity.y * dt;

        let ground_y = ground.effective_ground(player.position.x, player.position.z, player.position.y);
        let was_grounded = player.is_grounded();
        if player.feet(&config) <= ground_y {
            player.position.y = ground_y + config.standing_height;
            player.velocity.y = 0.0;
            player.state = LocomotionState::Grounded;
            if !was_grounded {
                debug!("Landed at {:?}", player.position);
            }
        } else {
            player.state = LocomotionState::Airborne;
        }

        // --- Jump ---
        // Edge-triggered: the latch holds last step's button state, so only a
        // press that begins on a grounded step launches.
        let pressed = input.jump && !player.jump_latched;
        if pressed && player.is_grounded() {
            player.velocity.y = config.jump_impulse;
            player.state = LocomotionState::Airborne;
        }
        player.jump_latched = input.jump;

        // --- Fail-safe ---
        if player.position.y < config.world_floor {
            warn!(
                "Player fell out of the world at {:?}; respawning at {:?}",
                player.position, self.spawn
            );
            self.reset();
        }
    }
}
