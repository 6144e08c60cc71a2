use crate::{
    math::dag::{self, CENTRE, CORNERS, EDGE_MIDPOINTS, ROOT_LEVEL},
    terrain_data::{
        hierarchy::VertexHierarchy,
        triangle_strip::{RefinementStats, TriangleStrip},
    },
};
use bevy::math::Vec3;

/// The per frame inputs of a refinement pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefinementParams {
    /// The camera position in the scene space of the hierarchy.
    pub camera_position: Vec3,
    /// The screen space error threshold, typically measured in pixels.
    ///
    /// A tolerance of zero or below refines the terrain completely.
    pub tolerance: f32,
    /// Converts a world space error at unit distance into screen space units.
    pub lambda: f32,
}

impl RefinementParams {
    pub fn new(camera_position: Vec3, tolerance: f32, lambda: f32) -> Self {
        Self {
            camera_position,
            tolerance,
            lambda,
        }
    }

    /// Derives lambda from the vertical field of view (in radians) and the
    /// number of pixels it spans.
    pub fn from_viewport(camera_position: Vec3, fov: f32, pixels: f32, tolerance: f32) -> Self {
        Self::new(camera_position, tolerance, pixels / fov)
    }

    /// The factor `lambda / tolerance` applied to the augmented delta,
    /// or `None` if every vertex should be refined.
    /// A ratio that overflows saturates as well.
    fn error_scale(&self) -> Option<f32> {
        let scale = self.lambda.max(0.0) / self.tolerance;
        (self.tolerance > 0.0 && scale.is_finite()).then_some(scale)
    }
}

impl VertexHierarchy {
    /// Whether the vertex at `index` has to be part of the mesh for the given view.
    ///
    /// This is the case if the camera lies inside the bounding sphere of the vertex,
    /// grown by its projected error.
    pub fn is_active(&self, index: usize, params: &RefinementParams) -> bool {
        let Some(scale) = params.error_scale() else {
            return true;
        };

        let vertex = self.vertex(index);
        let bound = scale * vertex.augmented_delta + vertex.radius;

        bound * bound > vertex.scene_position.distance_squared(params.camera_position)
    }

    /// Selects the active vertices and connects them into a single triangle strip.
    pub fn refine(&self, params: &RefinementParams) -> TriangleStrip {
        let mut refinement = Refinement {
            hierarchy: self,
            params,
            strip: TriangleStrip::new(),
        };

        let [south_west, south_east, north_east, north_west] = CORNERS;
        let [left, bottom, right, top] = EDGE_MIDPOINTS;

        // walk counterclockwise around the centre, starting at the bottom edge
        refinement.refine_edge(CENTRE, bottom, ROOT_LEVEL);
        for (corner, midpoint) in [(south_east, right), (north_east, top), (north_west, left)] {
            refinement.strip.append(corner, 0);
            refinement.refine_edge(CENTRE, midpoint, ROOT_LEVEL);
        }
        refinement.strip.push(south_west);

        refinement.strip
    }

    /// Refines the terrain and returns just the statistics of the pass.
    pub fn refinement_stats(&self, params: &RefinementParams) -> RefinementStats {
        self.refine(params).stats()
    }
}

struct Refinement<'a> {
    hierarchy: &'a VertexHierarchy,
    params: &'a RefinementParams,
    strip: TriangleStrip,
}

impl Refinement<'_> {
    fn refine_edge(&mut self, vertex: usize, next: usize, level: u32) {
        if level > self.hierarchy.max_refinement_level() {
            return;
        }

        self.strip.stats_mut().visited += 1;

        if !self.hierarchy.is_active(vertex, self.params) {
            return;
        }

        self.strip.stats_mut().active += 1;

        let [first, second] = dag::children(vertex, next);
        self.refine_edge(next, first, level + 1);
        self.strip.append(vertex, level % 2);
        self.refine_edge(next, second, level + 1);
    }
}
