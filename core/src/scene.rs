//! Baked scene file and the immutable world built from it.
//!
//! The offline `scene_baker` tool writes `scene.bin` using these types.
//! The walker loads it once at startup; nothing is appended afterwards.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    error::SceneError,
    floors::{FloorPlate, FloorSet},
    ground::GroundResolver,
    obstacles::{Obstacle, ObstacleSet},
    ramp::RampSurface,
    terrain::TerrainHeightField,
};

/// Current on-disk layout version.
pub const SCENE_VERSION: u32 = 1;

/// Versioned collision data for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub version: u32,
    /// Eye position the player spawns (and respawns) at.
    pub spawn: Vec3,
    pub terrain: TerrainHeightField,
    pub obstacles: Vec<Obstacle>,
    pub floors: Vec<FloorPlate>,
    pub ramps: Vec<RampSurface>,
}

impl SceneFile {
    /// Split into the spawn point and the static world the controller runs against.
    pub fn into_world(self) -> (Vec3, StaticWorld) {
        let ground = GroundResolver::new(self.terrain, self.ramps, FloorSet::new(self.floors));
        let world = StaticWorld::new(ground, ObstacleSet::new(self.obstacles));
        (self.spawn, world)
    }
}

/// Read-only collision world: walkable surfaces plus blocking volumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticWorld {
    ground: GroundResolver,
    obstacles: ObstacleSet,
}

impl StaticWorld {
    pub fn new(ground: GroundResolver, obstacles: ObstacleSet) -> Self {
        Self { ground, obstacles }
    }

    pub fn ground(&self) -> &GroundResolver {
        &self.ground
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }
}

/// Load a scene from bytes (bincode).
///
/// Geometry is re-validated while decoding, so a hand-edited or truncated file
/// surfaces as `Decode` rather than as a broken box at runtime.
pub fn load_scene_from_bytes(bytes: &[u8]) -> Result<SceneFile, SceneError> {
    let scene: SceneFile =
        bincode::deserialize(bytes).map_err(|e| SceneError::Decode(e.to_string()))?;
    if scene.version != SCENE_VERSION {
        return Err(SceneError::UnsupportedVersion {
            found: scene.version,
            expected: SCENE_VERSION,
        });
    }
    Ok(scene)
}

/// Load a scene from a file path (bincode).
pub fn load_scene_from_file(path: impl AsRef<Path>) -> Result<SceneFile, SceneError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_scene_from_bytes(&bytes)
}

/// Write a scene to disk.
///
/// Goes through a temporary file and a rename so a crash mid-write never
/// leaves a truncated `scene.bin` behind.
pub fn save_scene_to_file(scene: &SceneFile, path: impl AsRef<Path>) -> Result<(), SceneError> {
    let path = path.as_ref();
    let bytes = bincode::serialize(scene).map_err(|e| SceneError::Encode(e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| SceneError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let temp_path = path.with_extension("bin.tmp");
    std::fs::write(&temp_path, &bytes).map_err(|source| SceneError::Io {
        path: temp_path.clone(),
        source,
    })?;
    std::fs::rename(&temp_path, path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote scene ({} bytes) to {:?}", bytes.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::obstacles::ObstacleKind;
    use crate::ramp::RampSpec;
    use crate::terrain::{HillShape, ShapeResolution};

    fn small_scene() -> SceneFile {
        SceneFile {
            version: SCENE_VERSION,
            spawn: Vec3::new(0.0, 20.0, 50.0),
            terrain: TerrainHeightField::flat(0.0),
            obstacles: vec![Obstacle::new(
                Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 3.0, 1.0)).unwrap(),
                ObstacleKind::Pillar,
            )],
            floors: vec![FloorPlate::centered(Vec2::ZERO, Vec2::new(4.0, 4.0), 1.0).unwrap()],
            ramps: vec![RampSurface::new(RampSpec {
                center_x: 5.0,
                half_width: 1.0,
                z_near: 0.0,
                z_far: -4.0,
                height_near: 0.0,
                height_far: 2.0,
            })
            .unwrap()],
        }
    }

    #[test]
    fn test_bincode_round_trip() {
        let scene = small_scene();
        let bytes = bincode::serialize(&scene).unwrap();
        let loaded = load_scene_from_bytes(&bytes).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_rejects_wrong_version() {
        let mut scene = small_scene();
        scene.version = 7;
        let bytes = bincode::serialize(&scene).unwrap();
        assert!(matches!(
            load_scene_from_bytes(&bytes),
            Err(SceneError::UnsupportedVersion {
                found: 7,
                expected: SCENE_VERSION
            })
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            load_scene_from_bytes(&[1, 2, 3]),
            Err(SceneError::Decode(_))
        ));
    }

    /// Overwrite the single little-endian occurrence of `from` in `bytes`.
    fn patch_f32(bytes: &mut [u8], from: f32, to: f32) {
        let needle = from.to_le_bytes();
        let hits: Vec<usize> = bytes
            .windows(4)
            .enumerate()
            .filter(|(_, w)| *w == needle)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(hits.len(), 1, "{from} should appear exactly once");
        bytes[hits[0]..hits[0] + 4].copy_from_slice(&to.to_le_bytes());
    }

    fn hill_scene() -> SceneFile {
        let hill = HillShape::new(Vec2::ZERO, 80.0, 105.0, 4.0, -6.0).unwrap();
        SceneFile {
            terrain: TerrainHeightField::new(vec![hill], -6.0, ShapeResolution::FirstMatch),
            floors: vec![FloorPlate::centered(Vec2::ZERO, Vec2::new(4.0, 4.0), 123.25).unwrap()],
            ..small_scene()
        }
    }

    #[test]
    fn test_rejects_hill_with_slope_inside_plateau() {
        let mut bytes = bincode::serialize(&hill_scene()).unwrap();
        assert!(load_scene_from_bytes(&bytes).is_ok());
        patch_f32(&mut bytes, 105.0, 10.0);
        assert!(matches!(
            load_scene_from_bytes(&bytes),
            Err(SceneError::Decode(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_floor_height() {
        let mut bytes = bincode::serialize(&hill_scene()).unwrap();
        patch_f32(&mut bytes, 123.25, f32::NAN);
        assert!(matches!(
            load_scene_from_bytes(&bytes),
            Err(SceneError::Decode(_))
        ));
    }

    #[test]
    fn test_save_then_load_file() {
        let dir = std::env::temp_dir().join(format!("heritage_scene_{}", std::process::id()));
        let path = dir.join("scene.bin");
        let scene = small_scene();
        save_scene_to_file(&scene, &path).unwrap();
        assert!(!path.with_extension("bin.tmp").exists());
        assert_eq!(load_scene_from_file(&path).unwrap(), scene);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_scene_from_file("/definitely/not/here/scene.bin"),
            Err(SceneError::Io { .. })
        ));
    }

    #[test]
    fn test_into_world_keeps_everything() {
        let (spawn, world) = small_scene().into_world();
        assert_eq!(spawn, Vec3::new(0.0, 20.0, 50.0));
        assert_eq!(world.obstacles().len(), 1);
        assert_eq!(world.ground().floors().len(), 1);
        assert_eq!(world.ground().ramps().len(), 1);
        // Ramp midpoint sits above the flat terrain.
        assert!((world.ground().effective_ground(5.0, -2.0, 0.0) - 1.0).abs() < 1e-5);
    }
}
