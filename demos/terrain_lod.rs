use bevy::prelude::*;
use bevy_terrain_lod::prelude::*;
use std::f32::consts::FRAC_PI_4;

const CONFIG_PATH: &str = "assets/terrain.ron";
const ORBIT_RADIUS: f32 = 60.0;
const ORBIT_HEIGHT: f32 = 25.0;
const ORBIT_SPEED: f32 = 0.1;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            TerrainPlugin,
            TerrainDebugPlugin, // enable debug settings and controls
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, orbit_camera)
        .run();
}

fn setup(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    // Configure the heightmap of the terrain, a config file takes precedence over the defaults.
    let config = TerrainConfig::load_file(CONFIG_PATH).unwrap_or_else(|_| TerrainConfig {
        heightmap: HeightmapSource::Perlin(PerlinGenerator {
            amplitude: 6.0,
            ..default()
        }),
        ..default()
    });

    let terrain = match config.build() {
        Ok(terrain) => terrain,
        Err(error) => {
            error!("failed to build the terrain: {error:#}");
            return;
        }
    };

    commands.spawn((
        terrain,
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.5, 0.25),
            perceptual_roughness: 0.9,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
    ));

    // Configure the quality settings of the terrain view. Adapt the settings to your liking.
    let view_config = TerrainViewConfig::from_viewport(FRAC_PI_4, 720.0, 2.0);

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(ORBIT_RADIUS, ORBIT_HEIGHT, 0.0).looking_at(Vec3::ZERO, Vec3::Y),
        TerrainView,
        view_config,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(1.0, 1.0, 0.5).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn orbit_camera(time: Res<Time>, mut cameras: Query<&mut Transform, With<TerrainView>>) {
    let angle = time.elapsed_secs() * ORBIT_SPEED;

    for mut transform in &mut cameras {
        *transform = Transform::from_xyz(
            ORBIT_RADIUS * angle.cos(),
            ORBIT_HEIGHT,
            ORBIT_RADIUS * angle.sin(),
        )
        .looking_at(Vec3::ZERO, Vec3::Y);
    }
}
