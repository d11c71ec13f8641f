//! Collision layout of the heritage site.
//!
//! Two forts, a church, a parking area and a ring of trees, reduced to the
//! boxes, plates and ramp the controller needs. Visual detail lives elsewhere.

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

use crate::{
    floors::FloorPlate,
    geometry::{Aabb, GeometryError},
    obstacles::{Obstacle, ObstacleKind},
    player::SPAWN_POSITION,
    ramp::{RampSpec, RampSurface},
    scene::{SceneFile, SCENE_VERSION},
    terrain::TerrainHeightField,
};

/// Seed used when no manifest overrides it.
pub const DEFAULT_TREE_SEED: u64 = 0x7472_6565;

/// Trees scattered around the hill.
pub const DEFAULT_TREE_COUNT: usize = 50;

/// Walkable floor of the forts and the church.
pub const GROUND_FLOOR_HEIGHT: f32 = 4.1;

/// Walkable floor of the old fort's upper story.
pub const UPPER_FLOOR_HEIGHT: f32 = 9.5;

const NEW_FORT: Vec2 = Vec2::new(40.0, -26.0);
const OLD_FORT: Vec2 = Vec2::new(-42.0, -17.0);
const CHURCH: Vec2 = Vec2::new(-10.0, -29.0);

const TREE_RADIUS: f32 = 0.6;
const TREE_HEIGHT: f32 = 4.5;
const TREE_RING: std::ops::Range<f32> = 110.0..170.0;

/// A solid box given by full size and center, the way walls are authored.
fn block(size: Vec3, center: Vec3, kind: ObstacleKind) -> Result<Obstacle, GeometryError> {
    Ok(Obstacle::new(
        Aabb::from_center_half_extents(center, size * 0.5)?,
        kind,
    ))
}

fn wall(size: Vec3, center: Vec3) -> Result<Obstacle, GeometryError> {
    block(size, center, ObstacleKind::Wall)
}

/// A wall along X with a doorway cut out of its middle.
///
/// Produces the two side pieces and the lintel above the opening.
fn wall_with_door(size: Vec3, center: Vec3, door: Vec2) -> Result<[Obstacle; 3], GeometryError> {
    let side_width = (size.x - door.x) / 2.0;
    let offset = door.x / 2.0 + side_width / 2.0;
    let side = Vec3::new(side_width, size.y, size.z);
    let lintel_height = size.y - door.y;
    Ok([
        wall(side, center - Vec3::X * offset)?,
        wall(side, center + Vec3::X * offset)?,
        wall(
            Vec3::new(door.x, lintel_height, size.z),
            center + Vec3::Y * (door.y / 2.0 + lintel_height / 2.0),
        )?,
    ])
}

/// Bounding box of an upright cylinder.
fn cylinder(radius: f32, height: f32, center: Vec3, kind: ObstacleKind) -> Result<Obstacle, GeometryError> {
    block(Vec3::new(radius * 2.0, height, radius * 2.0), center, kind)
}

/// Parked car body, yawed in place.
fn car(x: f32, z: f32, yaw: f32) -> Result<Obstacle, GeometryError> {
    Ok(Obstacle::new(
        Aabb::from_rotated_box(Vec3::new(x, 4.9, z), Vec3::new(1.0, 0.4, 2.0), yaw)?,
        ObstacleKind::Vehicle,
    ))
}

fn new_fort() -> Result<Vec<Obstacle>, GeometryError> {
    let mut walls = Vec::with_capacity(6);
    walls.extend(wall_with_door(
        Vec3::new(32.0, 8.0, 1.2),
        Vec3::new(NEW_FORT.x, 8.0, NEW_FORT.y + 11.0),
        Vec2::new(3.5, 4.5),
    )?);
    walls.push(wall(Vec3::new(1.2, 7.5, 22.0), Vec3::new(56.0, 7.75, -26.0))?);
    walls.push(wall(Vec3::new(32.0, 7.8, 1.2), Vec3::new(40.0, 7.9, -37.0))?);
    walls.push(wall(Vec3::new(1.2, 8.0, 22.0), Vec3::new(24.0, 8.0, -26.0))?);
    Ok(walls)
}

fn old_fort() -> Result<Vec<Obstacle>, GeometryError> {
    let stone = 1.5;
    [
        // Ground story
        (Vec3::new(26.0, 6.0, stone), Vec3::new(-42.0, 7.0, -27.0)),
        (Vec3::new(stone, 5.0, 12.0), Vec3::new(-55.0, 6.5, -21.0)),
        (Vec3::new(stone, 2.0, 6.0), Vec3::new(-55.0, 5.0, -10.0)),
        (Vec3::new(stone, 6.0, 10.0), Vec3::new(-29.0, 7.0, -22.0)),
        (Vec3::new(stone, 3.0, 5.0), Vec3::new(-29.0, 5.5, -10.0)),
        (Vec3::new(10.0, 6.0, stone), Vec3::new(-50.0, 7.0, -7.0)),
        (Vec3::new(6.0, 4.0, stone), Vec3::new(-32.0, 6.0, -7.0)),
        // Upper story
        (Vec3::new(15.0, 5.0, stone), Vec3::new(-47.0, 12.0, -27.0)),
        (Vec3::new(stone, 4.0, 10.0), Vec3::new(-55.0, 11.5, -25.0)),
        (Vec3::new(4.0, 3.0, stone), Vec3::new(-53.0, 11.0, -12.0)),
    ]
    .into_iter()
    .map(|(size, center)| wall(size, center))
    .collect()
}

fn church() -> Result<Vec<Obstacle>, GeometryError> {
    let mut walls = Vec::with_capacity(6);
    walls.extend(wall_with_door(
        Vec3::new(13.0, 7.0, 1.0),
        Vec3::new(CHURCH.x, 7.5, -23.0),
        Vec2::new(2.8, 4.5),
    )?);
    walls.push(wall(Vec3::new(1.0, 7.0, 12.0), Vec3::new(-3.5, 7.5, -29.0))?);
    walls.push(wall(Vec3::new(13.0, 7.0, 1.0), Vec3::new(-10.0, 7.5, -35.0))?);
    walls.push(wall(Vec3::new(1.0, 7.0, 12.0), Vec3::new(-16.5, 7.5, -29.0))?);
    Ok(walls)
}

fn props() -> Result<Vec<Obstacle>, GeometryError> {
    use ObstacleKind::*;
    let mut props = vec![
        cylinder(0.8, 7.0, Vec3::new(40.0, 7.6, -26.0), Pillar)?,
        block(Vec3::new(3.0, 2.5, 1.0), Vec3::new(25.0, 5.4, -26.0), Furniture)?,
        block(Vec3::new(1.5, 1.0, 1.0), Vec3::new(52.0, 4.6, -34.0), Furniture)?,
        cylinder(0.4, 1.2, Vec3::new(28.0, 4.7, -34.0), Furniture)?,
        cylinder(0.4, 1.2, Vec3::new(27.0, 4.7, -34.5), Furniture)?,
    ];
    for (x, z) in [(22.0, -10.0), (-29.0, -3.0), (-15.0, -18.0)] {
        props.push(cylinder(0.1, 2.0, Vec3::new(x, 5.0, z), SignPost)?);
    }
    for (x, z, yaw) in [
        (-8.0, 12.0, PI / 6.0),
        (5.0, 15.0, -PI / 8.0),
        (-3.0, 18.0, PI / 12.0),
        (10.0, 10.0, -PI / 5.0),
    ] {
        props.push(car(x, z, yaw)?);
    }
    Ok(props)
}

/// Tree trunks on a ring past the hill's slope, rooted on the terrain.
fn trees(terrain: &TerrainHeightField, seed: u64, count: usize) -> Result<Vec<Obstacle>, GeometryError> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(TREE_RING);
            let (x, z) = (angle.cos() * distance, angle.sin() * distance);
            let center = Vec3::new(x, terrain.height(x, z) + TREE_HEIGHT / 2.0, z);
            cylinder(TREE_RADIUS, TREE_HEIGHT, center, ObstacleKind::TreeTrunk)
        })
        .collect()
}

fn floors() -> Result<Vec<FloorPlate>, GeometryError> {
    Ok(vec![
        FloorPlate::centered(NEW_FORT, Vec2::new(30.0, 20.0), GROUND_FLOOR_HEIGHT)?,
        FloorPlate::centered(OLD_FORT, Vec2::new(28.0, 22.0), GROUND_FLOOR_HEIGHT)?,
        FloorPlate::centered(Vec2::new(-42.0, -25.0), Vec2::new(28.0, 8.0), UPPER_FLOOR_HEIGHT)?,
        FloorPlate::centered(Vec2::new(-52.0, -17.0), Vec2::new(8.0, 12.0), UPPER_FLOOR_HEIGHT)?,
        FloorPlate::centered(CHURCH, Vec2::new(11.5, 10.0), GROUND_FLOOR_HEIGHT)?,
    ])
}

/// Stair ramp from the old fort's courtyard up to its upper story.
pub fn old_fort_ramp() -> Result<RampSurface, GeometryError> {
    RampSurface::new(RampSpec {
        center_x: -37.0,
        half_width: 2.25,
        z_near: -9.0,
        z_far: -21.0,
        height_near: GROUND_FLOOR_HEIGHT,
        height_far: UPPER_FLOOR_HEIGHT,
    })
}

/// Full collision layout of the site.
///
/// Everything but the tree ring is fixed; the ring is reproducible from `tree_seed`.
pub fn heritage_site(tree_seed: u64, tree_count: usize) -> Result<SceneFile, GeometryError> {
    let terrain = TerrainHeightField::heritage_site();

    let mut obstacles = new_fort()?;
    obstacles.extend(old_fort()?);
    obstacles.extend(church()?);
    obstacles.extend(props()?);
    obstacles.extend(trees(&terrain, tree_seed, tree_count)?);

    Ok(SceneFile {
        version: SCENE_VERSION,
        spawn: Vec3::from(SPAWN_POSITION),
        terrain,
        obstacles,
        floors: floors()?,
        ramps: vec![old_fort_ramp()?],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PlayerController;
    use crate::player::{ControllerConfig, LocomotionState, MoveInput};
    use crate::scene::StaticWorld;

    const DT: f32 = 1.0 / 60.0;
    const FIXED_OBSTACLES: usize = 34;

    fn world() -> (Vec3, StaticWorld) {
        heritage_site(DEFAULT_TREE_SEED, DEFAULT_TREE_COUNT)
            .unwrap()
            .into_world()
    }

    fn standing(world: &StaticWorld, x: f32, z: f32, ground: f32) -> PlayerController {
        let mut c = PlayerController::new(Vec3::new(x, ground + 1.8, z), ControllerConfig::default());
        // One idle step settles it onto the surface.
        c.step(world.ground(), world.obstacles(), &MoveInput::default(), DT);
        assert_eq!(c.player().state, LocomotionState::Grounded);
        c
    }

    fn walk(c: &mut PlayerController, world: &StaticWorld, steps: usize) {
        let forward = MoveInput {
            forward: true,
            ..Default::default()
        };
        for _ in 0..steps {
            c.step(world.ground(), world.obstacles(), &forward, DT);
        }
    }

    #[test]
    fn test_layout_counts() {
        let scene = heritage_site(DEFAULT_TREE_SEED, DEFAULT_TREE_COUNT).unwrap();
        assert_eq!(scene.obstacles.len(), FIXED_OBSTACLES + DEFAULT_TREE_COUNT);
        assert_eq!(scene.floors.len(), 5);
        assert_eq!(scene.ramps.len(), 1);
        assert_eq!(scene.spawn, Vec3::new(0.0, 20.0, 50.0));
    }

    #[test]
    fn test_tree_ring_is_seeded() {
        let a = heritage_site(42, 10).unwrap();
        let b = heritage_site(42, 10).unwrap();
        let c = heritage_site(43, 10).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.obstacles, c.obstacles);

        for tree in a.obstacles.iter().filter(|o| o.kind == ObstacleKind::TreeTrunk) {
            let center = (tree.bounds.min() + tree.bounds.max()) * 0.5;
            let r = Vec2::new(center.x, center.z).length();
            assert!((110.0..170.0).contains(&r), "tree at radius {r}");
            // Rooted on the terrain.
            let ground = a.terrain.height(center.x, center.z);
            assert!((tree.bounds.min().y - ground).abs() < 1e-4);
        }
    }

    #[test]
    fn test_doorway_leaves_opening() {
        let walls = new_fort().unwrap();
        // The doorway in the front wall is open at walking height.
        let doorway = Aabb::new(Vec3::new(39.0, 4.1, -15.8), Vec3::new(41.0, 5.9, -14.2)).unwrap();
        assert!(!walls.iter().any(|w| w.bounds.intersects(&doorway)));
        // But not above the lintel's underside.
        let above = Aabb::new(Vec3::new(39.0, 10.5, -15.8), Vec3::new(41.0, 11.0, -14.2)).unwrap();
        assert!(walls.iter().any(|w| w.bounds.intersects(&above)));
    }

    #[test]
    fn test_spawn_falls_onto_plateau() {
        let (spawn, world) = world();
        let mut c = PlayerController::new(spawn, ControllerConfig::default());
        for _ in 0..180 {
            c.step(world.ground(), world.obstacles(), &MoveInput::default(), DT);
        }
        assert!(c.player().is_grounded());
        assert!((c.player().position.y - 5.8).abs() < 1e-4);
        assert_eq!(c.player().position.x, 0.0);
        assert_eq!(c.player().position.z, 50.0);
    }

    #[test]
    fn test_ramp_leads_to_upper_story() {
        let (_, world) = world();
        let mut c = standing(&world, -37.0, -8.0, GROUND_FLOOR_HEIGHT);
        assert!((c.player().position.y - 5.9).abs() < 1e-4);
        walk(&mut c, &world, 110);
        assert!(c.player().position.z < -21.5, "z {}", c.player().position.z);
        assert!(c.player().is_grounded());
        assert!((c.player().position.y - (UPPER_FLOOR_HEIGHT + 1.8)).abs() < 1e-3);
    }

    #[test]
    fn test_courtyard_stays_below_upper_story() {
        let (_, world) = world();
        let mut c = standing(&world, -45.0, -12.0, GROUND_FLOOR_HEIGHT);
        walk(&mut c, &world, 80);
        assert!(c.player().position.z < -22.0);
        assert!((c.player().position.y - 5.9).abs() < 1e-4);
    }

    #[test]
    fn test_fort_wall_stops_player() {
        let (_, world) = world();
        // Inside the new fort, facing its back wall at z = -37.
        let mut c = standing(&world, 45.0, -30.0, GROUND_FLOOR_HEIGHT);
        walk(&mut c, &world, 120);
        let z = c.player().position.z;
        assert!(z > -35.9, "walked into the wall: z {z}");
        assert!(z < -35.5);
    }
}
