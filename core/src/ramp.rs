//! Straight inclined walkways.
//!
//! A ramp runs along Z between a near edge and a far edge and spans a fixed
//! width around `center_x`. It only ever raises the ground: the resolver takes
//! the max of ramp and terrain.

use serde::{Deserialize, Serialize};

use crate::geometry::GeometryError;

/// Raw ramp parameters as supplied by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampSpec {
    pub center_x: f32,
    pub half_width: f32,
    /// Z of the edge at `height_near`.
    pub z_near: f32,
    /// Z of the edge at `height_far`.
    pub z_far: f32,
    pub height_near: f32,
    pub height_far: f32,
}

/// A validated [`RampSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RampSpec", into = "RampSpec")]
pub struct RampSurface {
    spec: RampSpec,
}

impl RampSurface {
    pub fn new(spec: RampSpec) -> Result<Self, GeometryError> {
        let RampSpec {
            center_x,
            half_width,
            z_near,
            z_far,
            height_near,
            height_far,
        } = spec;
        if [center_x, half_width, z_near, z_far, height_near, height_far]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(GeometryError::NonFinite);
        }
        if half_width <= 0.0 {
            return Err(GeometryError::NarrowRamp { half_width });
        }
        if z_near == z_far {
            return Err(GeometryError::FlatRamp { z: z_near });
        }
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &RampSpec {
        &self.spec
    }

    /// Walkway height at `(x, z)`, or `None` off the ramp's footprint.
    pub fn height_on_ramp(&self, x: f32, z: f32) -> Option<f32> {
        let s = &self.spec;
        if (x - s.center_x).abs() >= s.half_width {
            return None;
        }
        let (z_min, z_max) = if s.z_far < s.z_near {
            (s.z_far, s.z_near)
        } else {
            (s.z_near, s.z_far)
        };
        if z < z_min || z > z_max {
            return None;
        }
        let progress = (s.z_near - z) / (s.z_near - s.z_far);
        Some(s.height_near + (s.height_far - s.height_near) * progress)
    }
}

impl TryFrom<RampSpec> for RampSurface {
    type Error = GeometryError;

    fn try_from(spec: RampSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}

impl From<RampSurface> for RampSpec {
    fn from(ramp: RampSurface) -> Self {
        ramp.spec
    }
}
