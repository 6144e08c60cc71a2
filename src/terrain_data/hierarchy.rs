use crate::{
    heightmap::Heightmap,
    math::{
        dag::{self, CENTRE, EDGE_MIDPOINTS},
        GridLayout,
    },
    result::TerrainResult,
    terrain_data::vertex::Vertex,
};
use bevy::{
    log::debug,
    math::{IVec2, Vec3},
};
use bytemuck::cast_slice;
use itertools::Itertools;

/// The refinement level at which the white quadtree starts below the centre.
const WHITE_ROOT_LEVEL: u32 = 3;
/// The refinement level at which the black quadtrees start below the edge midpoints.
const BLACK_ROOT_LEVEL: u32 = 4;

/// The vertex DAG of a heightmap, stored as an index-stable arena.
///
/// The first nine slots hold the seeds (see [`dag`]), every other vertex lives at a
/// slot derived from its quadtree parent. The arena and all error metrics are
/// computed once on construction and never change afterwards.
#[derive(Clone, Debug)]
pub struct VertexHierarchy {
    grid: GridLayout,
    vertices: Vec<Vertex>,
    /// Arena indices grouped by their height in the DAG, leaves first.
    levels: Vec<Vec<usize>>,
    vertex_count: usize,
}

impl VertexHierarchy {
    /// Builds the hierarchy from a row-major sequence of `dimension²` samples.
    pub fn new(dimension: u32, samples: Vec<f32>, size: f32) -> TerrainResult<Self> {
        let heightmap = Heightmap::new(dimension, samples, size)?;
        Ok(Self::from_heightmap(&heightmap))
    }

    pub fn from_heightmap(heightmap: &Heightmap) -> Self {
        let grid = heightmap.grid();
        let mut builder = ArenaBuilder {
            heightmap,
            max_level: grid.max_refinement_level(),
            slots: Vec::new(),
        };

        for index in grid.seed_indices() {
            let seed = builder.vertex(grid.coordinate(index));
            builder.slots.push(Some(seed));
        }

        let quarter = (grid.dimension() as i32 - 1) / 4;
        builder.expand_white_quadtree(CENTRE, WHITE_ROOT_LEVEL, quarter);
        for midpoint in EDGE_MIDPOINTS {
            builder.expand_black_quadtree(midpoint, BLACK_ROOT_LEVEL, quarter);
        }

        let vertex_count = builder.slots.iter().flatten().count();
        let vertices = builder
            .slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Vertex::placeholder(grid)))
            .collect();

        let mut hierarchy = Self {
            grid,
            vertices,
            levels: Vec::new(),
            vertex_count,
        };

        hierarchy.assign_dag_children();
        hierarchy.assign_radius();
        hierarchy.assign_delta(heightmap);
        hierarchy.assign_augmented_delta();

        debug!(
            "built vertex hierarchy with {} vertices ({} arena slots) and {} levels",
            hierarchy.vertex_count,
            hierarchy.vertices.len(),
            hierarchy.levels.len()
        );

        hierarchy
    }

    #[inline]
    pub fn grid(&self) -> GridLayout {
        self.grid
    }

    #[inline]
    pub fn dimension(&self) -> u32 {
        self.grid.dimension()
    }

    #[inline]
    pub fn max_refinement_level(&self) -> u32 {
        self.grid.max_refinement_level()
    }

    /// All arena slots, including placeholders.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    #[inline]
    pub(super) fn vertex_mut(&mut self, index: usize) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// The number of arena slots holding a heightmap sample.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Arena indices grouped by their height in the DAG.
    ///
    /// `levels()[0]` holds the leaves, the last level contains only the centre.
    #[inline]
    pub fn levels(&self) -> &[Vec<usize>] {
        &self.levels
    }

    /// The scene positions of all arena slots, indexable by triangle strip indices.
    pub fn scene_positions(&self) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|vertex| vertex.scene_position)
            .collect()
    }

    /// The y-up positions of all arena slots, ready to be uploaded as a vertex attribute.
    pub fn render_positions(&self) -> Vec<[f32; 3]> {
        self.vertices
            .iter()
            .map(|vertex| vertex.render_position().to_array())
            .collect()
    }

    pub fn render_normals(&self) -> Vec<[f32; 3]> {
        self.vertices
            .iter()
            .map(|vertex| vertex.normal.to_array())
            .collect()
    }

    /// The render positions as one flat `x, y, z, x, y, z, ...` sequence.
    pub fn flat_render_positions(&self) -> Vec<f32> {
        cast_slice::<[f32; 3], f32>(&self.render_positions()).to_vec()
    }

    fn assign_dag_children(&mut self) {
        let max_level = self.max_refinement_level() as usize;
        self.levels = vec![Vec::new(); max_level];

        for midpoint in EDGE_MIDPOINTS {
            self.assign_edge_children(CENTRE, midpoint, max_level - 2);
        }

        self.vertices[CENTRE].children = EDGE_MIDPOINTS.to_vec();
        self.levels[max_level - 2] = EDGE_MIDPOINTS.to_vec();
        self.levels[max_level - 1] = vec![CENTRE];

        // vertices with two DAG parents are reached along two edges
        for level in &mut self.levels {
            *level = level.iter().copied().sorted_unstable().dedup().collect();
        }
    }

    fn assign_edge_children(&mut self, parent: usize, vertex: usize, level: usize) {
        if level == 0 {
            return;
        }

        let children = dag::children(parent, vertex);
        self.vertices[vertex].children.extend(children);

        for child in children {
            self.assign_edge_children(vertex, child, level - 1);
        }

        self.levels[level - 1].extend(children);
    }
}

/// Collects the quadtree vertices before the arena holes are known.
struct ArenaBuilder<'a> {
    heightmap: &'a Heightmap,
    max_level: u32,
    slots: Vec<Option<Vertex>>,
}

impl ArenaBuilder<'_> {
    fn vertex(&self, coordinate: IVec2) -> Vertex {
        Vertex::new(
            self.heightmap.grid(),
            coordinate,
            self.heightmap.height(coordinate),
            self.heightmap.normal(coordinate),
        )
    }

    fn insert(&mut self, slot: usize, coordinate: IVec2) {
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }

        let vertex = self.vertex(coordinate);
        self.slots[slot] = Some(vertex);
    }

    fn coordinate(&self, slot: usize) -> IVec2 {
        self.slots[slot]
            .as_ref()
            .map(|vertex| vertex.grid)
            .unwrap_or_default()
    }

    /// Adds the diagonal children of a white quadtree node.
    fn expand_white_quadtree(&mut self, parent: usize, level: u32, distance: i32) {
        if level >= self.max_level {
            return;
        }

        let centre = self.coordinate(parent);
        let offsets = [
            IVec2::new(-distance, distance),
            IVec2::new(distance, distance),
            IVec2::new(distance, -distance),
            IVec2::new(-distance, -distance),
        ];

        let slots = dag::quadtree_children(parent);

        for (slot, offset) in slots.clone().zip(offsets) {
            self.insert(slot, centre + offset);
        }

        for slot in slots {
            self.expand_white_quadtree(slot, level + 2, distance / 2);
        }
    }

    /// Adds the axis aligned children of a black quadtree node, skipping those outside the grid.
    fn expand_black_quadtree(&mut self, parent: usize, level: u32, distance: i32) {
        if level > self.max_level {
            return;
        }

        let centre = self.coordinate(parent);
        let last = self.heightmap.dimension() as i32 - 1;
        let slots = dag::quadtree_children(parent);

        if self.slots.len() < slots.end {
            self.slots.resize(slots.end, None);
        }

        let children = [
            (centre.y > 0, IVec2::new(0, -distance)),
            (centre.x < last, IVec2::new(distance, 0)),
            (centre.y < last, IVec2::new(0, distance)),
            (centre.x > 0, IVec2::new(-distance, 0)),
        ];

        for (slot, (inside, offset)) in slots.zip(children) {
            if inside {
                self.insert(slot, centre + offset);
                self.expand_black_quadtree(slot, level + 2, distance / 2);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(dimension: u32) -> VertexHierarchy {
        VertexHierarchy::new(dimension, vec![0.0; (dimension as usize).pow(2)], 100.0)
            .unwrap()
    }

    #[test]
    fn smallest_grid_only_has_seeds() {
        let hierarchy = flat(3);

        assert_eq!(hierarchy.vertices().len(), 9);
        assert_eq!(hierarchy.vertex_count(), 9);
        assert_eq!(hierarchy.levels(), &[vec![5, 6, 7, 8], vec![4]]);
        assert_eq!(hierarchy.vertex(CENTRE).children, vec![5, 6, 7, 8]);
        assert!(hierarchy.vertex(5).children.is_empty());
    }

    #[test]
    fn arena_layout_of_a_five_by_five_grid() {
        let hierarchy = flat(5);
        let holes = [16, 19, 22, 25];

        assert_eq!(hierarchy.vertices().len(), 29);
        assert_eq!(hierarchy.vertex_count(), 25);

        let expected = [
            (9, IVec2::new(1, 3)),
            (10, IVec2::new(3, 3)),
            (11, IVec2::new(3, 1)),
            (12, IVec2::new(1, 1)),
            (13, IVec2::new(0, 1)),
            (14, IVec2::new(1, 2)),
            (15, IVec2::new(0, 3)),
            (17, IVec2::new(2, 3)),
            (18, IVec2::new(3, 4)),
            (20, IVec2::new(1, 4)),
            (21, IVec2::new(4, 1)),
            (23, IVec2::new(4, 3)),
            (24, IVec2::new(3, 2)),
            (26, IVec2::new(3, 0)),
            (27, IVec2::new(2, 1)),
            (28, IVec2::new(1, 0)),
        ];

        for (index, coordinate) in expected {
            assert!(!hierarchy.vertex(index).is_placeholder());
            assert_eq!(hierarchy.vertex(index).grid, coordinate, "vertex {index}");
        }
        for index in holes {
            assert!(hierarchy.vertex(index).is_placeholder());
        }
    }

    #[test]
    fn every_sample_appears_exactly_once() {
        for dimension in [3, 5, 9, 17, 33] {
            let hierarchy = flat(dimension);
            let grid = hierarchy.grid();

            let indices = hierarchy
                .vertices()
                .iter()
                .filter(|vertex| !vertex.is_placeholder())
                .map(|vertex| grid.index(vertex.grid))
                .sorted()
                .collect::<Vec<_>>();

            assert_eq!(indices, (0..grid.sample_count()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn arena_sizes() {
        let sizes = [3, 5, 9, 17, 33].map(|dimension| flat(dimension).vertices().len());
        assert_eq!(sizes, [9, 29, 109, 429, 1709]);
    }

    #[test]
    fn children_and_levels() {
        let hierarchy = flat(17);

        for vertex in hierarchy.vertices() {
            assert!(matches!(vertex.children.len(), 0 | 2 | 4));
            assert!(vertex.children.iter().all_unique());
            for &child in &vertex.children {
                assert!(!hierarchy.vertex(child).is_placeholder());
            }
        }

        assert_eq!(hierarchy.levels().len(), 8);
        assert_eq!(hierarchy.levels().last(), Some(&vec![CENTRE]));

        // every level only refers to children on the level below
        for (height, level) in hierarchy.levels().iter().enumerate() {
            for &index in level {
                let children = &hierarchy.vertex(index).children;
                if height == 0 {
                    assert!(children.is_empty());
                } else {
                    assert!(children
                        .iter()
                        .all(|child| hierarchy.levels()[height - 1].contains(child)));
                }
            }
        }
    }

    #[test]
    fn render_space_swaps_height_into_y() {
        let mut samples = vec![0.0; 25];
        samples[0] = 2.0;
        let hierarchy = VertexHierarchy::new(5, samples, 100.0).unwrap();

        assert_eq!(hierarchy.scene_positions()[3], Vec3::new(-40.0, -40.0, 40.0));
        assert_eq!(hierarchy.render_positions()[3], [-40.0, 40.0, -40.0]);
        assert_eq!(&hierarchy.flat_render_positions()[9..12], &[-40.0, 40.0, -40.0]);
        assert_eq!(hierarchy.render_normals()[CENTRE], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(VertexHierarchy::new(4, vec![0.0; 16], 1.0).is_err());
        assert!(VertexHierarchy::new(5, vec![0.0; 16], 1.0).is_err());
        assert!(VertexHierarchy::new(5, vec![0.0; 25], 0.0).is_err());
    }
}
