//! Effective ground height: terrain, ramps and floor plates folded together.

use serde::{Deserialize, Serialize};

use crate::{floors::FloorSet, ramp::RampSurface, terrain::TerrainHeightField};

/// Stateless composition of every walkable surface.
///
/// Safe to query speculatively (movement candidates that are later rejected).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundResolver {
    terrain: TerrainHeightField,
    ramps: Vec<RampSurface>,
    floors: FloorSet,
}

impl GroundResolver {
    pub fn new(terrain: TerrainHeightField, ramps: Vec<RampSurface>, floors: FloorSet) -> Self {
        Self {
            terrain,
            ramps,
            floors,
        }
    }

    /// Highest walkable surface under `(x, z)` for a player whose eye is at
    /// `current_elevation`. Never below the bare terrain.
    pub fn effective_ground(&self, x: f32, z: f32, current_elevation: f32) -> f32 {
        let mut h = self.terrain.height(x, z);
        for ramp in &self.ramps {
            if let Some(ramp_h) = ramp.height_on_ramp(x, z) {
                h = h.max(ramp_h);
            }
        }
        if let Some(floor_h) = self.floors.floor_height(x, z, current_elevation) {
            h = h.max(floor_h);
        }
        h
    }

    pub fn terrain(&self) -> &TerrainHeightField {
        &self.terrain
    }

    pub fn ramps(&self) -> &[RampSurface] {
        &self.ramps
    }

    pub fn floors(&self) -> &FloorSet {
        &self.floors
    }
}
