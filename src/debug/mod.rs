//! Contains a debug resource and systems controlling it to inspect the refinement
//! of the terrain at runtime.
use crate::{terrain::TerrainStats, terrain_view::TerrainViewConfig};
use bevy::{
    pbr::wireframe::{WireframeConfig, WireframePlugin},
    prelude::*,
};

/// The step by which the tolerance is changed with the keyboard.
const TOLERANCE_STEP: f32 = 0.25;

/// Adds a terrain debug config, a wireframe view and debug control systems.
pub struct TerrainDebugPlugin;

impl Plugin for TerrainDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(WireframePlugin)
            .init_resource::<DebugTerrain>()
            .add_systems(Update, (toggle_debug, change_config, log_stats));
    }
}

#[derive(Clone, Resource)]
pub struct DebugTerrain {
    /// Keeps the current triangle strip instead of refining it every frame.
    pub freeze: bool,
    pub show_stats: bool,
    stats_timer: Timer,
}

impl Default for DebugTerrain {
    fn default() -> Self {
        Self {
            freeze: false,
            show_stats: false,
            stats_timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

pub fn toggle_debug(
    input: Res<ButtonInput<KeyCode>>,
    mut debug_terrain: ResMut<DebugTerrain>,
    wireframe: Option<ResMut<WireframeConfig>>,
) {
    if input.just_pressed(KeyCode::KeyF) {
        debug_terrain.freeze = !debug_terrain.freeze;
        info!(
            "{} the terrain refinement.",
            if debug_terrain.freeze { "Froze" } else { "Unfroze" }
        )
    }
    if input.just_pressed(KeyCode::KeyT) {
        debug_terrain.show_stats = !debug_terrain.show_stats;
        info!(
            "Toggled the refinement statistics {}.",
            if debug_terrain.show_stats { "on" } else { "off" }
        )
    }
    if let Some(mut wireframe) = wireframe {
        if input.just_pressed(KeyCode::KeyW) {
            wireframe.global = !wireframe.global;
            info!(
                "Toggled the wireframe view {}.",
                if wireframe.global { "on" } else { "off" }
            )
        }
    }
}

pub fn change_config(
    input: Res<ButtonInput<KeyCode>>,
    mut view_configs: Query<&mut TerrainViewConfig>,
) {
    for mut view_config in &mut view_configs {
        if input.just_pressed(KeyCode::KeyN) {
            view_config.tolerance = (view_config.tolerance - TOLERANCE_STEP).max(0.0);
            info!("Decreased the tolerance to {}.", view_config.tolerance);
        }
        if input.just_pressed(KeyCode::KeyE) {
            view_config.tolerance += TOLERANCE_STEP;
            info!("Increased the tolerance to {}.", view_config.tolerance);
        }
    }
}

pub fn log_stats(
    time: Res<Time>,
    mut debug: ResMut<DebugTerrain>,
    terrains: Query<(Entity, &TerrainStats)>,
) {
    if !debug.show_stats || !debug.stats_timer.tick(time.delta()).just_finished() {
        return;
    }

    for (entity, stats) in &terrains {
        info!(
            "terrain {entity}: {} of {} visited vertices active, {} indices, {} triangles",
            stats.refinement.active,
            stats.refinement.visited,
            stats.index_count,
            stats.triangle_count
        );
    }
}
