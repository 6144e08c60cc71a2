use crate::result::{TerrainError, TerrainResult};
use bevy::math::{IVec2, Vec3};

/// Describes how the heightmap grid maps onto heightmap indices and into scene space.
///
/// The grid is square with a side length (`dimension`) of `2^n + 1` samples.
/// Scene positions are centred on the middle sample and scaled by `size / dimension`,
/// with the elevation stored in the z component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLayout {
    dimension: u32,
    scale: f32,
}

impl GridLayout {
    /// Creates the layout of a grid with `dimension` samples per side covering `size` world units.
    pub fn new(dimension: u32, size: f32) -> TerrainResult<Self> {
        if dimension < 3 || !(dimension - 1).is_power_of_two() {
            return Err(TerrainError::InvalidDimension(dimension));
        }
        if !size.is_finite() || size <= 0.0 {
            return Err(TerrainError::InvalidSize(size));
        }

        Ok(Self {
            dimension,
            scale: size / dimension as f32,
        })
    }

    #[inline]
    pub fn dimension(self) -> u32 {
        self.dimension
    }

    #[inline]
    pub fn scale(self) -> f32 {
        self.scale
    }

    /// The number of samples of the grid.
    #[inline]
    pub fn sample_count(self) -> usize {
        let dimension = self.dimension as usize;
        dimension * dimension
    }

    /// The height of the vertex DAG, `2 * log2(dimension - 1)`.
    #[inline]
    pub fn max_refinement_level(self) -> u32 {
        2 * (self.dimension - 1).trailing_zeros()
    }

    #[inline]
    pub fn contains(self, coordinate: IVec2) -> bool {
        let max = self.dimension as i32;
        (0..max).contains(&coordinate.x) && (0..max).contains(&coordinate.y)
    }

    /// Converts a grid coordinate into its row-major heightmap index.
    #[inline]
    pub fn index(self, coordinate: IVec2) -> usize {
        debug_assert!(self.contains(coordinate), "{coordinate} is outside the grid");
        coordinate.y as usize * self.dimension as usize + coordinate.x as usize
    }

    /// Converts a row-major heightmap index into its grid coordinate.
    #[inline]
    pub fn coordinate(self, index: usize) -> IVec2 {
        let dimension = self.dimension as usize;
        IVec2::new((index % dimension) as i32, (index / dimension) as i32)
    }

    /// Centres the coordinate on the grid origin and applies the grid scale.
    pub fn scene_position(self, coordinate: IVec2, elevation: f32) -> Vec3 {
        let half = (self.dimension / 2) as i32;
        Vec3::new(
            (coordinate.x - half) as f32 * self.scale,
            (coordinate.y - half) as f32 * self.scale,
            elevation * self.scale,
        )
    }

    /// The heightmap indices of the nine seed vertices, in arena order:
    /// south-west, south-east, north-east and north-west corner, the centre,
    /// followed by the left, bottom, right and top edge midpoint.
    pub fn seed_indices(self) -> [usize; 9] {
        let d = self.dimension as usize;

        [
            d * d - d,
            d * d - 1,
            d - 1,
            0,
            (d * d - 1) / 2,
            (d * d - d) / 2,
            d * d - (d + 1) / 2,
            (d * d + d - 2) / 2,
            (d - 1) / 2,
        ]
    }
}
