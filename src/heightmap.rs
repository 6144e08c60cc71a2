//! Heightmaps feeding the vertex hierarchy, and the sources they can be produced from.

use crate::{
    formats,
    math::GridLayout,
    result::{TerrainError, TerrainResult},
};
use anyhow::{ensure, Result};
use bevy::math::{IVec2, Vec3};
use itertools::iproduct;
use ndarray::Array2;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// A square grid of elevation samples with a side length of `2^n + 1` covering `size` world units.
#[derive(Clone, Debug)]
pub struct Heightmap {
    grid: GridLayout,
    size: f32,
    /// Samples indexed by `[[y, x]]`, so that the logical order is row-major.
    samples: Array2<f32>,
}

impl Heightmap {
    /// Wraps a row-major sequence of `dimension²` samples.
    pub fn new(dimension: u32, samples: Vec<f32>, size: f32) -> TerrainResult<Self> {
        let grid = GridLayout::new(dimension, size)?;
        let length_error = TerrainError::HeightmapLength {
            expected: grid.sample_count(),
            actual: samples.len(),
        };

        if samples.len() != grid.sample_count() {
            return Err(length_error);
        }

        let side = dimension as usize;
        let samples = Array2::from_shape_vec((side, side), samples).map_err(|_| length_error)?;

        Ok(Self {
            grid,
            size,
            samples,
        })
    }

    /// Builds a heightmap by evaluating `height` at every `(x, y)` grid coordinate.
    pub fn from_fn(
        dimension: u32,
        size: f32,
        mut height: impl FnMut(u32, u32) -> f32,
    ) -> TerrainResult<Self> {
        let samples = iproduct!(0..dimension, 0..dimension)
            .map(|(y, x)| height(x, y))
            .collect();

        Self::new(dimension, samples, size)
    }

    pub fn flat(dimension: u32, size: f32) -> TerrainResult<Self> {
        Self::from_fn(dimension, size, |_, _| 0.0)
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
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn height(&self, coordinate: IVec2) -> f32 {
        self.samples[[coordinate.y as usize, coordinate.x as usize]]
    }

    /// The samples in row-major order.
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    /// The surface normal at a grid coordinate in y-up render space,
    /// estimated with central differences (one-sided on the border).
    pub fn normal(&self, coordinate: IVec2) -> Vec3 {
        let max = self.dimension() as i32 - 1;
        let sample = |x: i32, y: i32| self.height(IVec2::new(x.clamp(0, max), y.clamp(0, max)));
        let span = |c: i32| ((c + 1).min(max) - (c - 1).max(0)) as f32;

        let IVec2 { x, y } = coordinate;
        let dx = (sample(x + 1, y) - sample(x - 1, y)) / span(x);
        let dy = (sample(x, y + 1) - sample(x, y - 1)) / span(y);

        Vec3::new(-dx, 1.0, -dy).normalize()
    }
}

/// Fractal Perlin noise heightmap generator.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct PerlinGenerator {
    pub seed: u32,
    pub octaves: usize,
    pub frequency: f64,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Multiplier applied to the noise values, which lie roughly in `[-1, 1]`.
    pub amplitude: f32,
}

impl Default for PerlinGenerator {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 3,
            frequency: 1.0,
            persistence: 0.8,
            lacunarity: 0.5,
            amplitude: 10.0,
        }
    }
}

impl PerlinGenerator {
    /// Grid coordinates are divided by this value before sampling the noise.
    const SAMPLE_SPACING: f64 = 10.0;

    pub fn generate(&self, dimension: u32, size: f32) -> TerrainResult<Heightmap> {
        let fbm = Fbm::<Perlin>::new(self.seed)
            .set_octaves(self.octaves)
            .set_frequency(self.frequency)
            .set_persistence(self.persistence)
            .set_lacunarity(self.lacunarity);

        Heightmap::from_fn(dimension, size, |x, y| {
            let point = [
                x as f64 / Self::SAMPLE_SPACING,
                y as f64 / Self::SAMPLE_SPACING,
            ];
            self.amplitude * fbm.get(point) as f32
        })
    }
}

/// Where the samples of a terrain come from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum HeightmapSource {
    Flat,
    Perlin(PerlinGenerator),
    /// A TIFF or grayscale image file. Integer samples are normalised to `[0, 1]`,
    /// then all samples are multiplied by `height_scale`.
    File { path: String, height_scale: f32 },
}

impl Default for HeightmapSource {
    fn default() -> Self {
        Self::Perlin(PerlinGenerator::default())
    }
}

impl HeightmapSource {
    pub fn load(&self, dimension: u32, size: f32) -> Result<Heightmap> {
        let heightmap = match self {
            HeightmapSource::Flat => Heightmap::flat(dimension, size)?,
            HeightmapSource::Perlin(generator) => generator.generate(dimension, size)?,
            HeightmapSource::File { path, height_scale } => {
                formats::load_heightmap(path, *height_scale, size)?
            }
        };

        ensure!(
            heightmap.dimension() == dimension,
            "heightmap has a dimension of {}, but the terrain expects {dimension}",
            heightmap.dimension()
        );

        Ok(heightmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_sample_counts() {
        let error = Heightmap::new(5, vec![0.0; 24], 1.0).unwrap_err();

        assert_eq!(
            error,
            TerrainError::HeightmapLength {
                expected: 25,
                actual: 24
            }
        );
    }

    #[test]
    fn samples_are_row_major() {
        let heightmap = Heightmap::from_fn(3, 1.0, |x, y| (10 * y + x) as f32).unwrap();

        assert_eq!(heightmap.height(IVec2::new(2, 1)), 12.0);
        assert_eq!(
            heightmap.samples().collect::<Vec<_>>(),
            vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0, 20.0, 21.0, 22.0]
        );
    }

    #[test]
    fn normals() {
        let flat = Heightmap::flat(5, 1.0).unwrap();
        assert_eq!(flat.normal(IVec2::new(0, 0)), Vec3::Y);
        assert_eq!(flat.normal(IVec2::new(2, 3)), Vec3::Y);

        // rises by one unit per sample along x
        let slope = Heightmap::from_fn(5, 1.0, |x, _| x as f32).unwrap();
        let expected = Vec3::new(-1.0, 1.0, 0.0).normalize();
        for x in 0..5 {
            assert!(slope.normal(IVec2::new(x, 2)).abs_diff_eq(expected, 1e-6));
        }
    }

    #[test]
    fn perlin_generation_is_deterministic() {
        let generator = PerlinGenerator {
            seed: 7,
            ..PerlinGenerator::default()
        };

        let a = generator.generate(17, 100.0).unwrap();
        let b = generator.generate(17, 100.0).unwrap();
        let other = PerlinGenerator {
            seed: 8,
            ..generator
        }
        .generate(17, 100.0)
        .unwrap();

        assert!(a.samples().eq(b.samples()));
        assert!(!a.samples().eq(other.samples()));
        assert!(a.samples().all(f32::is_finite));
    }

    #[test]
    fn sources_validate_the_dimension() {
        assert!(HeightmapSource::Flat.load(9, 10.0).is_ok());
        assert!(HeightmapSource::Flat.load(10, 10.0).is_err());
    }
}
