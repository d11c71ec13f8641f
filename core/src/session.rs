//! Locomotion session: the static world, one controller and a fixed timestep.
//!
//! This is the surface a renderer or input layer talks to. It owns nothing
//! mutable besides the avatar and the accumulator.

use bevy::prelude::*;
use std::sync::Arc;

use crate::{
    error::SceneError,
    floors::{FloorPlate, FloorSet},
    geometry::GeometryError,
    ground::GroundResolver,
    obstacles::{Obstacle, ObstacleSet},
    physics::PlayerController,
    player::{ControllerConfig, MoveInput, PlayerPose, PlayerState},
    ramp::{RampSpec, RampSurface},
    scene::StaticWorld,
    terrain::TerrainHeightField,
    timestep::FixedTimestep,
};

#[derive(Resource, Debug, Clone)]
pub struct Locomotion {
    world: Arc<StaticWorld>,
    controller: PlayerController,
    timestep: FixedTimestep,
}

impl Locomotion {
    /// Build a session over the site terrain from raw scene pieces.
    ///
    /// Fails if the ramp or the tuning is degenerate. Obstacles and floor
    /// plates arrive already validated by their constructors.
    pub fn initialize(
        spawn: Vec3,
        obstacles: Vec<Obstacle>,
        floors: Vec<FloorPlate>,
        ramp: RampSpec,
        config: ControllerConfig,
    ) -> Result<Self, SceneError> {
        if !spawn.is_finite() {
            return Err(GeometryError::NonFinite.into());
        }
        let ramp = RampSurface::new(ramp)?;
        let ground = GroundResolver::new(
            TerrainHeightField::heritage_site(),
            vec![ramp],
            FloorSet::new(floors),
        );
        let world = StaticWorld::new(ground, ObstacleSet::new(obstacles));
        Self::from_world(spawn, Arc::new(world), config)
    }

    /// Build a session over an already assembled world (e.g. a loaded scene file).
    pub fn from_world(
        spawn: Vec3,
        world: Arc<StaticWorld>,
        config: ControllerConfig,
    ) -> Result<Self, SceneError> {
        config.validate()?;
        info!(
            "Locomotion ready: {} obstacles, {} floor plates, spawn {:?}",
            world.obstacles().len(),
            world.ground().floors().len(),
            spawn
        );
        Ok(Self {
            world,
            controller: PlayerController::new(spawn, config),
            timestep: FixedTimestep::default(),
        })
    }

    /// Apply a look delta and run exactly one fixed step.
    pub fn step(&mut self, input: MoveInput, look_delta: Vec2) -> PlayerPose {
        self.controller.look(look_delta);
        self.run_step(&input);
        self.pose()
    }

    /// Feed one rendered frame's worth of time.
    ///
    /// The look delta is applied once; the movement input is held for every
    /// fixed step the accumulator releases (possibly none).
    pub fn advance(&mut self, frame_seconds: f32, input: MoveInput, look_delta: Vec2) -> PlayerPose {
        self.controller.look(look_delta);
        let steps = self.timestep.advance(frame_seconds);
        for _ in 0..steps {
            self.run_step(&input);
        }
        self.pose()
    }

    /// Respawn the avatar and drop banked frame time.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.timestep.clear();
    }

    pub fn pose(&self) -> PlayerPose {
        self.controller.player().pose()
    }

    pub fn player(&self) -> &PlayerState {
        self.controller.player()
    }

    pub fn world(&self) -> &StaticWorld {
        &self.world
    }

    fn run_step(&mut self, input: &MoveInput) {
        let dt = self.timestep.step_seconds();
        self.controller
            .step(self.world.ground(), self.world.obstacles(), input, dt);
    }
}
