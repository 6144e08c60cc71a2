//! Assigns the nested bounding sphere radii and the (augmented) vertical errors
//! that drive the refinement.

use crate::{
    heightmap::Heightmap,
    math::dag::{self, CENTRE, CORNERS, EDGE_MIDPOINTS},
    terrain_data::hierarchy::VertexHierarchy,
};
use bevy::math::IVec2;

/// The refinement level of the edge midpoints.
const MIDPOINT_LEVEL: u32 = 2;

impl VertexHierarchy {
    /// Grows each radius until the sphere contains the spheres of all children.
    ///
    /// Leaves keep a radius of zero.
    pub(super) fn assign_radius(&mut self) {
        for level in 0..self.levels().len() {
            for index in self.levels()[level].clone() {
                let vertex = self.vertex(index);
                let radius = vertex
                    .children
                    .iter()
                    .map(|&child| {
                        let child = self.vertex(child);
                        vertex.distance(child) + child.radius
                    })
                    .fold(0.0, f32::max);

                self.vertex_mut(index).radius = radius;
            }
        }
    }

    /// Measures the vertical error of every vertex against the edge it splits.
    pub(super) fn assign_delta(&mut self, heightmap: &Heightmap) {
        for (corner, midpoint) in CORNERS.into_iter().zip(EDGE_MIDPOINTS) {
            self.assign_edge_delta(heightmap, corner, CENTRE, midpoint, MIDPOINT_LEVEL);
        }
    }

    /// `vertex` lies halfway between `ancestor` and the sample mirrored across it.
    fn assign_edge_delta(
        &mut self,
        heightmap: &Heightmap,
        ancestor: usize,
        parent: usize,
        vertex: usize,
        level: u32,
    ) {
        if level > self.max_refinement_level() {
            return;
        }

        let grid = self.grid();
        let start = self.vertex(ancestor);
        let centre = self.vertex(vertex);

        let mirrored: IVec2 = 2 * centre.grid - start.grid;
        let end = grid.scene_position(mirrored, heightmap.height(mirrored));

        let delta = (2.0 * centre.scene_position.z - end.z - start.scene_position.z).abs();
        self.vertex_mut(vertex).delta = delta;

        for child in dag::children(parent, vertex) {
            self.assign_edge_delta(heightmap, parent, vertex, child, level + 1);
        }
    }

    /// Propagates the largest error of each subtree up to its root.
    pub(super) fn assign_augmented_delta(&mut self) {
        for level in 0..self.levels().len() {
            for index in self.levels()[level].clone() {
                let vertex = self.vertex(index);
                let augmented_delta = vertex
                    .children
                    .iter()
                    .map(|&child| self.vertex(child).augmented_delta)
                    .fold(vertex.delta, f32::max);

                self.vertex_mut(index).augmented_delta = augmented_delta;
            }
        }
    }
}
