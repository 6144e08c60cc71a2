use crate::{
    debug::DebugTerrain,
    terrain::{Terrain, TerrainStats},
    terrain_data::{RefinementParams, TriangleStrip},
    terrain_view::{TerrainView, TerrainViewConfig},
};
use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
    },
};

/// The plugin for the terrain renderer.
///
/// Every entity with a [`Terrain`] component receives a triangle strip mesh,
/// whose indices are refined each frame for the first [`TerrainView`].
/// The material is left to the user, it should not cull back faces, since the
/// winding of the strip alternates.
pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, initialize_terrain_mesh).add_systems(
            PostUpdate,
            refine_terrain.after(TransformSystem::TransformPropagate),
        );
    }
}

/// Converts the world space position of a view into the scene space of a terrain,
/// undoing the terrain's transform and swapping the up axis from y to z.
pub fn view_to_scene_space(terrain: &GlobalTransform, view: &GlobalTransform) -> Vec3 {
    let local = terrain
        .affine()
        .inverse()
        .transform_point3(view.translation());

    Vec3::new(local.x, local.z, local.y)
}

fn initialize_terrain_mesh(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    terrains: Query<(Entity, &Terrain), Without<Mesh3d>>,
) {
    for (entity, terrain) in &terrains {
        let hierarchy = terrain.hierarchy();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleStrip,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, hierarchy.render_positions());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, hierarchy.render_normals());
        mesh.insert_indices(Indices::U32(TriangleStrip::new().into_indices()));

        commands
            .entity(entity)
            .insert((Mesh3d(meshes.add(mesh)), TerrainStats::default()));

        info!(
            "initializing terrain mesh with {} vertices",
            hierarchy.vertices().len()
        );
    }
}

fn refine_terrain(
    debug: Option<Res<DebugTerrain>>,
    mut meshes: ResMut<Assets<Mesh>>,
    views: Query<(&GlobalTransform, &TerrainViewConfig), With<TerrainView>>,
    mut terrains: Query<(&Terrain, &GlobalTransform, &Mesh3d, &mut TerrainStats)>,
) {
    if debug.is_some_and(|debug| debug.freeze) {
        return;
    }

    let Some((view_transform, view_config)) = views.iter().next() else {
        if !terrains.is_empty() {
            warn_once!("no terrain view found, the terrain will not be refined");
        }
        return;
    };

    for (terrain, terrain_transform, mesh, mut stats) in &mut terrains {
        let params = RefinementParams::new(
            view_to_scene_space(terrain_transform, view_transform),
            view_config.tolerance,
            view_config.lambda,
        );

        let strip = terrain.hierarchy().refine(&params);

        *stats = TerrainStats {
            refinement: strip.stats(),
            index_count: strip.len(),
            triangle_count: strip.triangles().count(),
        };

        if let Some(mesh) = meshes.get_mut(&mesh.0) {
            mesh.insert_indices(Indices::U32(strip.into_indices()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain_data::VertexHierarchy;

    #[test]
    fn view_position_in_scene_space() {
        let terrain = GlobalTransform::from(
            Transform::from_xyz(10.0, 0.0, 0.0).with_scale(Vec3::splat(2.0)),
        );
        let view = GlobalTransform::from_xyz(10.0, 20.0, 4.0);

        let position = view_to_scene_space(&terrain, &view);
        assert!(position.abs_diff_eq(Vec3::new(0.0, 2.0, 10.0), 1e-5));
    }

    #[test]
    fn refines_the_terrain_mesh() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), TerrainPlugin))
            .init_asset::<Mesh>();

        let hierarchy = VertexHierarchy::new(5, vec![0.0; 25], 100.0).unwrap();
        let terrain = app
            .world_mut()
            .spawn((Terrain::from(hierarchy), GlobalTransform::IDENTITY))
            .id();

        // looking straight down from far above, only the corners remain
        app.world_mut().spawn((
            TerrainView,
            TerrainViewConfig::default(),
            GlobalTransform::from_xyz(0.0, 1.0e6, 0.0),
        ));

        app.update();

        let stats = *app.world().get::<TerrainStats>(terrain).unwrap();
        assert_eq!(stats.index_count, 9);
        assert_eq!(stats.refinement.active, 0);

        let handle = app.world().get::<Mesh3d>(terrain).unwrap().0.clone();
        let meshes = app.world().resource::<Assets<Mesh>>();
        let mesh = meshes.get(&handle).unwrap();

        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::TriangleStrip);
        assert_eq!(mesh.count_vertices(), 29);
        assert!(matches!(
            mesh.indices(),
            Some(Indices::U32(indices)) if indices == &[0, 0, 0, 1, 0, 2, 0, 3, 0]
        ));
    }
}
