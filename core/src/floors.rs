//! Flat elevated floor plates (building interiors, upper stories).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::{Footprint, GeometryError};

/// How far below a plate the player may be and still step onto it.
///
/// Measured against the player's eye point, so a standing player (1.8 tall)
/// can climb a 0.7 step but never snaps to a story overhead.
pub const STEP_TOLERANCE: f32 = 2.5;

/// Plate fields as stored on disk; validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct FloorPlateParams {
    footprint: Footprint,
    height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FloorPlateParams", into = "FloorPlateParams")]
pub struct FloorPlate {
    footprint: Footprint,
    height: f32,
}

impl FloorPlate {
    pub fn new(footprint: Footprint, height: f32) -> Result<Self, GeometryError> {
        if !height.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        Ok(Self { footprint, height })
    }

    /// Plate of `size` (X width, Z depth) centered at `center` (X, Z).
    pub fn centered(center: Vec2, size: Vec2, height: f32) -> Result<Self, GeometryError> {
        Self::new(Footprint::from_center_size(center, size)?, height)
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl TryFrom<FloorPlateParams> for FloorPlate {
    type Error = GeometryError;

    fn try_from(p: FloorPlateParams) -> Result<Self, Self::Error> {
        FloorPlate::new(p.footprint, p.height)
    }
}

impl From<FloorPlate> for FloorPlateParams {
    fn from(plate: FloorPlate) -> Self {
        FloorPlateParams {
            footprint: plate.footprint,
            height: plate.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSet {
    plates: Vec<FloorPlate>,
    tolerance: f32,
}

impl FloorSet {
    pub fn new(plates: Vec<FloorPlate>) -> Self {
        Self {
            plates,
            tolerance: STEP_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Highest plate under `(x, z)` the player at `current_elevation` may stand on.
    ///
    /// A plate qualifies only when `current_elevation > plate.height - tolerance`,
    /// which keeps a second story from capturing a player walking beneath it.
    pub fn floor_height(&self, x: f32, z: f32, current_elevation: f32) -> Option<f32> {
        self.plates
            .iter()
            .filter(|plate| plate.footprint.contains(x, z))
            .filter(|plate| current_elevation > plate.height - self.tolerance)
            .map(|plate| plate.height)
            .fold(None, |best, h| Some(best.map_or(h, |b: f32| b.max(h))))
    }

    pub fn plates(&self) -> &[FloorPlate] {
        &self.plates
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }
}

impl Default for FloorSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_story() -> FloorSet {
        FloorSet::new(vec![
            FloorPlate::centered(Vec2::new(-42.0, -17.0), Vec2::new(28.0, 22.0), 4.1).unwrap(),
            FloorPlate::centered(Vec2::new(-42.0, -25.0), Vec2::new(28.0, 8.0), 9.5).unwrap(),
        ])
    }

    #[test]
    fn test_gate_threshold() {
        let floors = two_story();
        assert_eq!(floors.floor_height(-42.0, -25.0, 7.01), Some(9.5));
        assert_eq!(floors.floor_height(-42.0, -25.0, 6.9), Some(4.1));
        // Exactly at the threshold the gate is still closed.
        assert_eq!(floors.floor_height(-42.0, -25.0, 7.0), Some(4.1));
    }

    #[test]
    fn test_upper_story_ignored_from_ground_floor() {
        let floors = two_story();
        // Standing on the 4.1 floor puts the eye at 5.9.
        assert_eq!(floors.floor_height(-42.0, -25.0, 4.1 + 1.8), Some(4.1));
    }

    #[test]
    fn test_highest_eligible_wins() {
        let floors = two_story();
        assert_eq!(floors.floor_height(-42.0, -25.0, 11.3), Some(9.5));
    }

    #[test]
    fn test_outside_every_footprint() {
        let floors = two_story();
        assert_eq!(floors.floor_height(0.0, 0.0, 100.0), None);
    }

    #[test]
    fn test_too_low_for_any_plate() {
        let floors = two_story();
        assert_eq!(floors.floor_height(-42.0, -17.0, 1.0), None);
    }

    #[test]
    fn test_custom_tolerance() {
        let floors = two_story().with_tolerance(0.5);
        assert_eq!(floors.floor_height(-42.0, -25.0, 8.0), Some(4.1));
        assert_eq!(floors.floor_height(-42.0, -25.0, 9.1), Some(9.5));
    }
}
