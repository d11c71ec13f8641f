//! Offline scene baking tool.
//!
//! Reads `assets/scene_manifest.ron`, builds the heritage-site collision layout
//! (walls, props, tree ring, floor plates, ramp) and writes `assets/scene.bin`
//! for the walker to load at startup.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use bevy::app::AppExit;
use bevy::prelude::*;
use heritage_core::{
    obstacles::ObstacleKind,
    scene::{load_scene_from_file, save_scene_to_file, SceneFile},
    site::{heritage_site, DEFAULT_TREE_COUNT, DEFAULT_TREE_SEED},
};
use serde::Deserialize;

// -----------------------------------------------------------------------------
// Manifest types
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct SceneManifest {
    version: u32,
    #[serde(default = "default_tree_seed")]
    tree_seed: u64,
    #[serde(default = "default_tree_count")]
    tree_count: usize,
}

fn default_tree_seed() -> u64 {
    DEFAULT_TREE_SEED
}

fn default_tree_count() -> usize {
    DEFAULT_TREE_COUNT
}

fn parse_manifest(text: &str) -> Result<SceneManifest, String> {
    let manifest: SceneManifest =
        ron::from_str(text).map_err(|e| format!("failed to parse manifest: {e}"))?;
    if manifest.version != 1 {
        return Err(format!(
            "Unsupported manifest version {} (expected 1)",
            manifest.version
        ));
    }
    Ok(manifest)
}

// -----------------------------------------------------------------------------
// Bake
// -----------------------------------------------------------------------------

#[derive(Resource)]
struct BakeConfig {
    manifest_path: PathBuf,
    output_path: PathBuf,
}

fn main() {
    let workspace_root = std::env::current_dir().unwrap_or_else(|e| panic!("cwd: {e}"));
    let assets_dir = workspace_root.join("assets");

    let mut app = App::new();

    // Nothing to render or load asynchronously: minimal app, one bake pass.
    app.add_plugins(MinimalPlugins);
    app.add_plugins(bevy::log::LogPlugin::default());

    app.insert_resource(BakeConfig {
        manifest_path: assets_dir.join("scene_manifest.ron"),
        output_path: assets_dir.join("scene.bin"),
    });

    app.add_systems(Startup, bake);

    app.run();
}

fn kind_counts(scene: &SceneFile) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for obstacle in &scene.obstacles {
        let name = match obstacle.kind {
            ObstacleKind::Wall => "wall",
            ObstacleKind::Pillar => "pillar",
            ObstacleKind::Furniture => "furniture",
            ObstacleKind::Vehicle => "vehicle",
            ObstacleKind::SignPost => "sign post",
            ObstacleKind::TreeTrunk => "tree trunk",
        };
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    counts
}

fn bake(config: Res<BakeConfig>, mut app_exit: MessageWriter<AppExit>) {
    let text = fs::read_to_string(&config.manifest_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read manifest at {:?}: {e}",
            config.manifest_path
        )
    });
    let manifest = parse_manifest(&text)
        .unwrap_or_else(|e| panic!("{:?}: {e}", config.manifest_path));

    info!(
        "Baking heritage site (tree seed {:#x}, {} trees)",
        manifest.tree_seed, manifest.tree_count
    );

    let scene = heritage_site(manifest.tree_seed, manifest.tree_count)
        .unwrap_or_else(|e| panic!("Site layout failed validation: {e}"));

    for (kind, count) in kind_counts(&scene) {
        debug!("  {count:>3} x {kind}");
    }

    save_scene_to_file(&scene, &config.output_path).unwrap_or_else(|e| {
        panic!(
            "Failed to write output {:?}: {e}",
            config.output_path
        )
    });

    // Read it back so a bad bake fails here and not in the walker.
    let reloaded = load_scene_from_file(&config.output_path)
        .unwrap_or_else(|e| panic!("Baked scene does not load back: {e}"));
    if reloaded != scene {
        warn!("Baked scene differs from the in-memory layout after reload");
    }

    info!(
        "Wrote baked scene to {:?} ({} obstacles, {} floor plates, {} ramps)",
        config.output_path,
        scene.obstacles.len(),
        scene.floors.len(),
        scene.ramps.len()
    );

    app_exit.write(AppExit::Success);
}
