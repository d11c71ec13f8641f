//! Scripted walk through the site.
//!
//! A tour is a list of legs, each holding a movement input for a fixed time.
//! Look is given as a rate so the turn is the same at any frame rate.

use bevy::prelude::*;
use heritage_core::{MoveInput, SceneError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourLeg {
    pub label: String,
    pub seconds: f32,
    #[serde(default)]
    pub input: MoveInput,
    /// Look delta per second (same units as mouse movement).
    #[serde(default)]
    pub look_rate: Vec2,
}

impl TourLeg {
    fn new(label: &str, seconds: f32, input: MoveInput, look_rate: Vec2) -> Self {
        Self {
            label: label.to_string(),
            seconds,
            input,
            look_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourScript {
    pub legs: Vec<TourLeg>,
}

impl Default for TourScript {
    fn default() -> Self {
        let idle = MoveInput::default();
        let forward = MoveInput {
            forward: true,
            ..default()
        };
        let sprint = MoveInput {
            sprint: true,
            ..forward
        };
        let jump = MoveInput {
            jump: true,
            ..forward
        };
        // Quarter turn left over one second: PI/2 / 0.002.
        let turn_left = Vec2::new(-785.4, 0.0);
        Self {
            legs: vec![
                TourLeg::new("drop onto the plateau", 1.5, idle, Vec2::ZERO),
                TourLeg::new("walk through the parking area", 3.0, forward, Vec2::ZERO),
                TourLeg::new("sprint toward the church", 2.0, sprint, Vec2::ZERO),
                TourLeg::new("hop", 0.6, jump, Vec2::ZERO),
                TourLeg::new("turn to face the old fort", 1.0, idle, turn_left),
                TourLeg::new("walk west", 4.0, forward, Vec2::ZERO),
                TourLeg::new("look around", 2.0, idle, Vec2::new(400.0, 60.0)),
            ],
        }
    }
}

impl TourScript {
    /// Load a tour from RON. A missing file yields the built-in tour.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No tour script at {:?}; using the built-in tour", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|e| SceneError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn total_seconds(&self) -> f32 {
        self.legs.iter().map(|leg| leg.seconds.max(0.0)).sum()
    }
}

/// Input for one frame of the tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourFrame {
    pub input: MoveInput,
    pub look_delta: Vec2,
    /// Set on the first frame of a leg.
    pub started_leg: Option<usize>,
}

/// Playback position within a [`TourScript`].
#[derive(Resource, Debug, Clone)]
pub struct Tour {
    script: TourScript,
    leg: usize,
    elapsed_in_leg: f32,
    announced: bool,
}

impl Tour {
    pub fn new(script: TourScript) -> Self {
        Self {
            script,
            leg: 0,
            elapsed_in_leg: 0.0,
            announced: false,
        }
    }

    pub fn leg_label(&self, index: usize) -> Option<&str> {
        self.script.legs.get(index).map(|leg| leg.label.as_str())
    }

    /// Consume `dt` seconds of the tour. Returns `None` once every leg has run.
    ///
    /// A frame that straddles two legs plays the earlier one; the overshoot is
    /// not carried into the next leg.
    pub fn next_frame(&mut self, dt: f32) -> Option<TourFrame> {
        let leg = self.script.legs.get(self.leg)?;
        let started_leg = (!self.announced).then_some(self.leg);
        self.announced = true;

        let frame = TourFrame {
            input: leg.input,
            look_delta: leg.look_rate * dt,
            started_leg,
        };

        self.elapsed_in_leg += dt;
        if self.elapsed_in_leg >= leg.seconds {
            self.leg += 1;
            self.elapsed_in_leg = 0.0;
            self.announced = false;
        }
        Some(frame)
    }
}
