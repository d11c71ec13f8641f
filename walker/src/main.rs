//! Walker - headless Bevy app that tours the heritage site
//!
//! Loads the baked scene and controller tuning, then drives the avatar along a
//! scripted tour at the fixed tick rate and logs where it ends up.

mod tour;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use heritage_core::{
    scene::{load_scene_from_file, StaticWorld},
    site::{heritage_site, DEFAULT_TREE_COUNT, DEFAULT_TREE_SEED},
    timestep::tick_duration,
    ControllerConfig, Locomotion, PlayerPose, SceneError,
};
use std::path::Path;
use std::sync::Arc;

use tour::{Tour, TourScript};

const CONTROLLER_PATH: &str = "assets/controller.ron";
const SCENE_PATH: &str = "assets/scene.bin";
const TOUR_PATH: &str = "assets/tour.ron";

/// Seconds between periodic pose logs.
const POSE_LOG_INTERVAL: f32 = 1.0;

#[derive(Resource, Default)]
struct PoseLog {
    since_last: f32,
}

/// Scene from disk, or the built-in layout when nothing has been baked yet.
fn load_scene() -> Result<(Vec3, StaticWorld), SceneError> {
    if !Path::new(SCENE_PATH).exists() {
        warn!(
            "No baked scene at {}; building the site layout in place (run scene_baker to bake it)",
            SCENE_PATH
        );
        return Ok(heritage_site(DEFAULT_TREE_SEED, DEFAULT_TREE_COUNT)?.into_world());
    }
    let scene = load_scene_from_file(SCENE_PATH)?;
    info!(
        "Loaded scene: {} obstacles, {} floor plates, {} ramps (version {})",
        scene.obstacles.len(),
        scene.floors.len(),
        scene.ramps.len(),
        scene.version
    );
    Ok(scene.into_world())
}

fn setup_locomotion(mut commands: Commands) {
    let config = ControllerConfig::load_or_default(CONTROLLER_PATH)
        .unwrap_or_else(|e| panic!("Failed to load controller config: {e}"));
    let (spawn, world) = load_scene().unwrap_or_else(|e| panic!("Failed to load scene: {e}"));
    let locomotion = Locomotion::from_world(spawn, Arc::new(world), config)
        .unwrap_or_else(|e| panic!("Failed to start locomotion: {e}"));

    let script = TourScript::load_or_default(TOUR_PATH)
        .unwrap_or_else(|e| panic!("Failed to load tour: {e}"));
    info!(
        "Tour: {} legs, {:.1}s",
        script.legs.len(),
        script.total_seconds()
    );

    commands.insert_resource(locomotion);
    commands.insert_resource(Tour::new(script));
}

fn log_pose(label: &str, pose: &PlayerPose) {
    info!(
        "[{}] eye ({:.2}, {:.2}, {:.2}) yaw {:.2} pitch {:.2}",
        label, pose.position.x, pose.position.y, pose.position.z, pose.yaw, pose.pitch
    );
}

/// Feed each frame's delta to the locomotion session along the tour.
fn drive_tour(
    time: Res<Time>,
    mut tour: ResMut<Tour>,
    mut locomotion: ResMut<Locomotion>,
    mut pose_log: ResMut<PoseLog>,
    mut app_exit: MessageWriter<AppExit>,
) {
    let dt = time.delta_secs();
    let Some(frame) = tour.next_frame(dt) else {
        log_pose("tour complete", &locomotion.pose());
        app_exit.write(AppExit::Success);
        return;
    };

    if let Some(leg) = frame.started_leg {
        info!("Leg {}: {}", leg + 1, tour.leg_label(leg).unwrap_or("?"));
    }

    let pose = locomotion.advance(dt, frame.input, frame.look_delta);

    pose_log.since_last += dt;
    if pose_log.since_last >= POSE_LOG_INTERVAL {
        pose_log.since_last = 0.0;
        let state = if locomotion.player().is_grounded() {
            "grounded"
        } else {
            "airborne"
        };
        log_pose(state, &pose);
    }
}

fn main() {
    let mut app = App::new();

    // Headless plugins (no rendering). Run the loop at the physics tick so a
    // frame usually releases exactly one fixed step.
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick_duration())));
    app.add_plugins(bevy::log::LogPlugin::default());

    app.init_resource::<PoseLog>();

    app.add_systems(Startup, setup_locomotion);
    app.add_systems(Update, drive_tour);

    info!("Starting walker");
    app.run();
}
