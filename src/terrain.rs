use crate::{
    heightmap::HeightmapSource,
    terrain_data::{RefinementStats, VertexHierarchy},
};
use anyhow::Result;
use bevy::prelude::*;
use derive_more::From;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};

/// Describes the heightmap of a terrain and how large it is in world space.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// The number of samples per side, which has to be of the form `2^n + 1`.
    pub dimension: u32,
    /// The side length of the terrain in world units.
    pub size: f32,
    pub heightmap: HeightmapSource,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            dimension: 129,
            size: 100.0 * 1.01,
            heightmap: default(),
        }
    }
}

impl TerrainConfig {
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let encoded = fs::read_to_string(path)?;
        Ok(ron::from_str(&encoded)?)
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = ron::ser::to_string_pretty(self, PrettyConfig::default())?;
        fs::write(path, encoded)?;
        Ok(())
    }

    /// Loads the heightmap and builds the vertex hierarchy of the terrain.
    pub fn build(&self) -> Result<Terrain> {
        let heightmap = self.heightmap.load(self.dimension, self.size)?;
        let hierarchy = VertexHierarchy::from_heightmap(&heightmap);

        info!(
            "built terrain with {} vertices from a {}x{} heightmap",
            hierarchy.vertex_count(),
            self.dimension,
            self.dimension
        );

        Ok(Terrain::from(hierarchy))
    }
}

/// The component of a terrain entity, sharing the immutable vertex hierarchy.
///
/// The hierarchy is stored in scene space (z up, centred on the grid), the
/// terrain mesh in y-up render space relative to the entity's transform.
#[derive(Component, Clone, Debug, From)]
#[require(Transform, Visibility)]
pub struct Terrain {
    hierarchy: Arc<VertexHierarchy>,
}

impl From<VertexHierarchy> for Terrain {
    fn from(hierarchy: VertexHierarchy) -> Self {
        Arc::new(hierarchy).into()
    }
}

impl Terrain {
    #[inline]
    pub fn hierarchy(&self) -> &Arc<VertexHierarchy> {
        &self.hierarchy
    }
}

/// The statistics of the most recent refinement of a terrain.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct TerrainStats {
    pub refinement: RefinementStats,
    /// The number of indices of the current triangle strip.
    pub index_count: usize,
    /// The number of triangles with three distinct vertices.
    pub triangle_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::PerlinGenerator;
    use std::env;

    #[test]
    fn config_round_trip() {
        let config = TerrainConfig {
            dimension: 33,
            size: 250.0,
            heightmap: HeightmapSource::Perlin(PerlinGenerator {
                seed: 3,
                ..default()
            }),
        };

        let path = env::temp_dir().join(format!("{}_terrain.ron", env!("CARGO_PKG_NAME")));
        config.save_file(&path).unwrap();

        assert_eq!(TerrainConfig::load_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: TerrainConfig = ron::from_str("(dimension: 17, heightmap: Flat)").unwrap();

        assert_eq!(config.dimension, 17);
        assert_eq!(config.size, TerrainConfig::default().size);
        assert_eq!(config.heightmap, HeightmapSource::Flat);
    }

    #[test]
    fn builds_the_hierarchy() {
        let config = TerrainConfig {
            dimension: 9,
            size: 10.0,
            heightmap: HeightmapSource::Flat,
        };

        let terrain = config.build().unwrap();
        assert_eq!(terrain.hierarchy().vertex_count(), 81);

        let invalid = TerrainConfig {
            dimension: 8,
            ..config
        };
        assert!(invalid.build().is_err());
    }
}
