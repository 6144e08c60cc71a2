//! This crate provides view-dependent, continuous level of detail for heightmap terrains.
//!
//! # Background
//! Even a small terrain with a height map of 1000x1000 pixels would require 1 million vertices
//! to be rendered each frame per view, with a naive approach without any lod strategy.
//! Most of these vertices add nothing to the image, because they are either far away from
//! the camera or lie in flat regions.
//!
//! This crate implements the refinement of Lindstrom and Pascucci. The samples of the
//! heightmap are organized in a vertex hierarchy (see the [`terrain_data`] module), that
//! is built once and stores for every vertex a bounding sphere and the largest
//! vertical error of its descendants. Every frame the hierarchy is traversed from the
//! top and only those vertices, whose error projected onto the screen exceeds a
//! tolerance, are kept. The result is a single triangle strip that can be rendered
//! directly.
//!
//! The [`TerrainPlugin`] integrates this with bevy, by attaching a mesh to each
//! [`Terrain`](terrain::Terrain) and refining it for the [`TerrainView`](terrain_view::TerrainView).

pub mod debug;
pub mod formats;
pub mod heightmap;
pub mod math;
pub mod plugin;
pub mod result;
pub mod terrain;
pub mod terrain_data;
pub mod terrain_view;

pub use crate::plugin::TerrainPlugin;

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        debug::{DebugTerrain, TerrainDebugPlugin},
        heightmap::{Heightmap, HeightmapSource, PerlinGenerator},
        plugin::TerrainPlugin,
        result::{TerrainError, TerrainResult},
        terrain::{Terrain, TerrainConfig, TerrainStats},
        terrain_data::{RefinementParams, RefinementStats, TriangleStrip, VertexHierarchy},
        terrain_view::{TerrainView, TerrainViewConfig},
    };
}
