//! Axis-aligned volumes shared by the obstacle and floor sets.
//!
//! All bounds are validated once at construction. The scene is static, so a box
//! that passes validation never changes afterwards.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rejected static geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate was NaN or infinite.
    NonFinite,
    /// `min` exceeds `max` (or they coincide) on the named axis.
    Inverted { axis: char, min: f32, max: f32 },
    /// A ramp whose near and far edges coincide.
    FlatRamp { z: f32 },
    /// A ramp with zero or negative half width.
    NarrowRamp { half_width: f32 },
    /// Controller tuning with gravity pointing up.
    UpwardGravity { gravity: f32 },
    /// A hill whose slope ring does not extend past its plateau.
    HillRadii { plateau_radius: f32, slope_radius: f32 },
    /// A fixed timestep that could never release a step.
    BadTimestep { step_seconds: f32, max_steps_per_frame: u32 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::NonFinite => write!(f, "geometry contains a non-finite coordinate"),
            GeometryError::Inverted { axis, min, max } => {
                write!(f, "degenerate bounds on {axis}: min {min} >= max {max}")
            }
            GeometryError::FlatRamp { z } => {
                write!(f, "ramp near and far edges coincide at z = {z}")
            }
            GeometryError::NarrowRamp { half_width } => {
                write!(f, "ramp half width must be positive (got {half_width})")
            }
            GeometryError::UpwardGravity { gravity } => {
                write!(f, "gravity must not be positive (got {gravity})")
            }
            GeometryError::HillRadii {
                plateau_radius,
                slope_radius,
            } => write!(
                f,
                "hill slope radius {slope_radius} must exceed plateau radius {plateau_radius}"
            ),
            GeometryError::BadTimestep {
                step_seconds,
                max_steps_per_frame,
            } => write!(
                f,
                "timestep needs a positive step and step cap (got {step_seconds}s, {max_steps_per_frame} steps)"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

fn check_axis(axis: char, min: f32, max: f32) -> Result<(), GeometryError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    if min >= max {
        return Err(GeometryError::Inverted { axis, min, max });
    }
    Ok(())
}

/// Box corners as stored on disk; validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct AabbCorners {
    min: Vec3,
    max: Vec3,
}

/// Rectangle corners as stored on disk; validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct FootprintCorners {
    min: Vec2,
    max: Vec2,
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AabbCorners", into = "AabbCorners")]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Result<Self, GeometryError> {
        check_axis('x', min.x, max.x)?;
        check_axis('y', min.y, max.y)?;
        check_axis('z', min.z, max.z)?;
        Ok(Self { min, max })
    }

    /// Skip validation for corners the caller already knows are ordered.
    #[inline]
    pub(crate) fn from_validated(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all());
        Self { min, max }
    }

    /// Create from center position and half-extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Result<Self, GeometryError> {
        Self::new(center - half_extents, center + half_extents)
    }

    /// World bounds of a box yawed about +Y.
    ///
    /// Vertical extent is unchanged; the horizontal extent grows to contain the
    /// rotated corners.
    pub fn from_rotated_box(center: Vec3, half_extents: Vec3, yaw: f32) -> Result<Self, GeometryError> {
        let cos_r = yaw.cos().abs();
        let sin_r = yaw.sin().abs();
        let extent_x = half_extents.x * cos_r + half_extents.z * sin_r;
        let extent_z = half_extents.x * sin_r + half_extents.z * cos_r;
        Self::from_center_half_extents(center, Vec3::new(extent_x, half_extents.y, extent_z))
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Overlap test on all three axes. Touching faces count as overlapping.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Horizontal projection of this box.
    pub fn footprint(&self) -> Footprint {
        Footprint {
            min: Vec2::new(self.min.x, self.min.z),
            max: Vec2::new(self.max.x, self.max.z),
        }
    }
}

impl TryFrom<AabbCorners> for Aabb {
    type Error = GeometryError;

    fn try_from(c: AabbCorners) -> Result<Self, Self::Error> {
        Aabb::new(c.min, c.max)
    }
}

impl From<Aabb> for AabbCorners {
    fn from(b: Aabb) -> Self {
        AabbCorners {
            min: b.min,
            max: b.max,
        }
    }
}

/// Rectangle on the XZ plane. `Vec2::x` is world X, `Vec2::y` is world Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FootprintCorners", into = "FootprintCorners")]
pub struct Footprint {
    min: Vec2,
    max: Vec2,
}

impl Footprint {
    pub fn new(min: Vec2, max: Vec2) -> Result<Self, GeometryError> {
        check_axis('x', min.x, max.x)?;
        check_axis('z', min.y, max.y)?;
        Ok(Self { min, max })
    }

    /// Rectangle of `size` (width along X, depth along Z) centered on `center`.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Result<Self, GeometryError> {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Edges are inclusive.
    #[inline]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.y && z <= self.max.y
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }
}

impl TryFrom<FootprintCorners> for Footprint {
    type Error = GeometryError;

    fn try_from(c: FootprintCorners) -> Result<Self, Self::Error> {
        Footprint::new(c.min, c.max)
    }
}

impl From<Footprint> for FootprintCorners {
    fn from(f: Footprint) -> Self {
        FootprintCorners {
            min: f.min,
            max: f.max,
        }
    }
}
