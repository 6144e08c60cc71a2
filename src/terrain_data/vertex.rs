use crate::math::GridLayout;
use bevy::math::{IVec2, Vec3};

/// A heightmap sample that takes part in the vertex hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    /// The coordinate of the sample on the heightmap grid.
    pub grid: IVec2,
    /// The raw heightmap value.
    pub elevation: f32,
    /// The position in scene space, with the elevation in the z component.
    pub scene_position: Vec3,
    /// The normal in y-up render space.
    pub normal: Vec3,
    /// The DAG children, either none, two or four arena indices.
    pub children: Vec<usize>,
    /// Bounds the distance to every descendant, measured in scene units.
    pub radius: f32,
    /// The vertical error introduced by leaving out this vertex.
    pub delta: f32,
    /// The maximum `delta` of this vertex and all its descendants.
    pub augmented_delta: f32,
    placeholder: bool,
}

impl Vertex {
    pub(crate) fn new(grid: GridLayout, coordinate: IVec2, elevation: f32, normal: Vec3) -> Self {
        Self {
            grid: coordinate,
            elevation,
            scene_position: grid.scene_position(coordinate, elevation),
            normal,
            children: Vec::new(),
            radius: 0.0,
            delta: 0.0,
            augmented_delta: 0.0,
            placeholder: false,
        }
    }

    /// Fills an arena slot that no sample was assigned to.
    pub(crate) fn placeholder(grid: GridLayout) -> Self {
        Self {
            placeholder: true,
            ..Self::new(grid, IVec2::ZERO, 0.0, Vec3::Y)
        }
    }

    /// Whether this vertex only fills a hole in the arena.
    ///
    /// Placeholders are unreachable from the DAG and never part of a triangle strip.
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// The euclidean distance between the scene positions of two vertices.
    #[inline]
    pub fn distance(&self, other: &Vertex) -> f32 {
        self.scene_position.distance(other.scene_position)
    }

    /// The position in y-up render space.
    #[inline]
    pub fn render_position(&self) -> Vec3 {
        let Vec3 { x, y, z } = self.scene_position;
        Vec3::new(x, z, y)
    }
}
