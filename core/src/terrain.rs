//! Radial hill terrain.
//!
//! The site sits on a low hill: a wide central plateau (both fortresses and the
//! chapel), flanked by two smaller hills, all falling off to a flat valley floor.
//!
//! Scale: 1 unit = 1 meter
//! - Central plateau is 8m above the valley floor
//! - Secondary hills top out 2m lower than the central plateau

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::GeometryError;

/// Valley floor height outside every hill.
pub const BASELINE_HEIGHT: f32 = -6.0;

/// Hill parameters as stored on disk; validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HillParams {
    center: Vec2,
    plateau_radius: f32,
    slope_radius: f32,
    plateau_height: f32,
    outside_height: f32,
}

/// A flat-topped hill with a linear slope ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HillParams", into = "HillParams")]
pub struct HillShape {
    center: Vec2,
    plateau_radius: f32,
    slope_radius: f32,
    plateau_height: f32,
    outside_height: f32,
}

impl HillShape {
    pub fn new(
        center: Vec2,
        plateau_radius: f32,
        slope_radius: f32,
        plateau_height: f32,
        outside_height: f32,
    ) -> Result<Self, GeometryError> {
        let values = [
            center.x,
            center.y,
            plateau_radius,
            slope_radius,
            plateau_height,
            outside_height,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if plateau_radius < 0.0 || slope_radius <= plateau_radius {
            return Err(GeometryError::HillRadii {
                plateau_radius,
                slope_radius,
            });
        }
        Ok(Self {
            center,
            plateau_radius,
            slope_radius,
            plateau_height,
            outside_height,
        })
    }

    /// Height contributed by this hill, or `None` outside its slope ring.
    pub fn sample(&self, x: f32, z: f32) -> Option<f32> {
        let d = Vec2::new(x, z).distance(self.center);
        if d < self.plateau_radius {
            Some(self.plateau_height)
        } else if d < self.slope_radius {
            let t = (d - self.plateau_radius) / (self.slope_radius - self.plateau_radius);
            Some(self.plateau_height - (self.plateau_height - self.outside_height) * t)
        } else {
            None
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn plateau_radius(&self) -> f32 {
        self.plateau_radius
    }

    pub fn slope_radius(&self) -> f32 {
        self.slope_radius
    }

    pub fn outside_height(&self) -> f32 {
        self.outside_height
    }
}

impl TryFrom<HillParams> for HillShape {
    type Error = GeometryError;

    fn try_from(p: HillParams) -> Result<Self, Self::Error> {
        HillShape::new(
            p.center,
            p.plateau_radius,
            p.slope_radius,
            p.plateau_height,
            p.outside_height,
        )
    }
}

impl From<HillShape> for HillParams {
    fn from(h: HillShape) -> Self {
        HillParams {
            center: h.center,
            plateau_radius: h.plateau_radius,
            slope_radius: h.slope_radius,
            plateau_height: h.plateau_height,
            outside_height: h.outside_height,
        }
    }
}

/// How overlapping hills combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeResolution {
    /// The first hill (in list order) whose zone contains the point wins.
    #[default]
    FirstMatch,
    /// The tallest contribution among all matching hills wins.
    Highest,
}

/// Ground elevation as a pure function of horizontal position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainHeightField {
    /// Priority order: earlier shapes shadow later ones under `FirstMatch`.
    shapes: Vec<HillShape>,
    baseline: f32,
    resolution: ShapeResolution,
}

impl TerrainHeightField {
    pub fn new(shapes: Vec<HillShape>, baseline: f32, resolution: ShapeResolution) -> Self {
        Self {
            shapes,
            baseline,
            resolution,
        }
    }

    /// Flat ground everywhere.
    pub fn flat(height: f32) -> Self {
        Self::new(Vec::new(), height, ShapeResolution::FirstMatch)
    }

    /// Central fortress hill plus the two secondary hills.
    pub fn heritage_site() -> Self {
        // Radii are known-good constants.
        let hill = |center: Vec2, rp: f32, rs: f32, hp: f32| HillShape {
            center,
            plateau_radius: rp,
            slope_radius: rs,
            plateau_height: hp,
            outside_height: BASELINE_HEIGHT,
        };
        Self::new(
            vec![
                hill(Vec2::ZERO, 80.0, 105.0, 4.0),
                hill(Vec2::new(-80.0, 20.0), 50.0, 65.0, 2.0),
                hill(Vec2::new(80.0, -10.0), 50.0, 65.0, 2.0),
            ],
            BASELINE_HEIGHT,
            ShapeResolution::FirstMatch,
        )
    }

    pub fn with_resolution(mut self, resolution: ShapeResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Get terrain height at a world position.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        match self.resolution {
            ShapeResolution::FirstMatch => self
                .shapes
                .iter()
                .find_map(|shape| shape.sample(x, z))
                .unwrap_or(self.baseline),
            ShapeResolution::Highest => self
                .shapes
                .iter()
                .filter_map(|shape| shape.sample(x, z))
                .fold(None, |best: Option<f32>, h| Some(best.map_or(h, |b| b.max(h))))
                .unwrap_or(self.baseline),
        }
    }

    pub fn shapes(&self) -> &[HillShape] {
        &self.shapes
    }
}

impl Default for TerrainHeightField {
    fn default() -> Self {
        Self::heritage_site()
    }
}
