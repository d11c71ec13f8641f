//! Fixed-timestep accumulator.
//!
//! Frame deltas go in, a whole number of physics steps comes out, so the
//! simulation behaves the same at 30, 60 or 144 fps.

use std::time::Duration;

use crate::geometry::GeometryError;

/// Physics tick rate
pub const FIXED_TIMESTEP_HZ: f64 = 60.0;

/// Upper bound on catch-up steps per frame.
pub const MAX_STEPS_PER_FRAME: u32 = 8;

/// Duration of one physics tick
pub fn tick_duration() -> Duration {
    Duration::from_secs_f64(1.0 / FIXED_TIMESTEP_HZ)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    step_seconds: f32,
    max_steps_per_frame: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Fails on a zero, negative or non-finite step, or a zero step cap.
    pub fn new(step_seconds: f32, max_steps_per_frame: u32) -> Result<Self, GeometryError> {
        if !step_seconds.is_finite() || step_seconds <= 0.0 || max_steps_per_frame == 0 {
            return Err(GeometryError::BadTimestep {
                step_seconds,
                max_steps_per_frame,
            });
        }
        Ok(Self {
            step_seconds,
            max_steps_per_frame,
            accumulator: 0.0,
        })
    }

    #[inline]
    pub fn step_seconds(&self) -> f32 {
        self.step_seconds
    }

    /// Time banked toward the next step.
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    /// Bank `frame_seconds` and return how many fixed steps to run now.
    ///
    /// Negative or non-finite deltas are ignored. Time beyond
    /// `max_steps_per_frame` steps is dropped rather than carried forward.
    pub fn advance(&mut self, frame_seconds: f32) -> u32 {
        if frame_seconds.is_finite() && frame_seconds > 0.0 {
            self.accumulator += frame_seconds;
        }

        let mut steps = 0;
        while self.accumulator >= self.step_seconds && steps < self.max_steps_per_frame {
            self.accumulator -= self.step_seconds;
            steps += 1;
        }

        if steps == self.max_steps_per_frame && self.accumulator >= self.step_seconds {
            // Spiral-of-death guard: a long stall should not replay in fast-forward.
            self.accumulator %= self.step_seconds;
        }

        steps
    }

    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self {
            step_seconds: (1.0 / FIXED_TIMESTEP_HZ) as f32,
            max_steps_per_frame: MAX_STEPS_PER_FRAME,
            accumulator: 0.0,
        }
    }
}
