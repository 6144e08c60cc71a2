//! Loaders that turn heightmap files into a [`Heightmap`].
//!
//! TIFF files are decoded with the `tiff` crate, so that 16 bit and floating point
//! elevation data survives. Every other extension goes through the `image` crate
//! and is converted to 16 bit luminance.

mod grayscale;
mod tiff;

use self::{grayscale::decode_grayscale, tiff::decode_tiff};
use crate::heightmap::Heightmap;
use anyhow::{ensure, Context, Result};
use std::{fs, path::Path};

/// Loads a square heightmap file and scales its samples by `height_scale`.
///
/// The side length of the image has to be `2^n + 1` pixels.
pub fn load_heightmap<P: AsRef<Path>>(path: P, height_scale: f32, size: f32) -> Result<Heightmap> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read the heightmap {}", path.display()))?;

    let is_tiff = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("tif") || extension.eq_ignore_ascii_case("tiff")
        });

    let (width, height, samples) = if is_tiff {
        decode_tiff(&bytes)
    } else {
        decode_grayscale(&bytes)
    }
    .with_context(|| format!("failed to decode the heightmap {}", path.display()))?;

    ensure!(
        width == height,
        "the heightmap {} is not square ({width}x{height})",
        path.display()
    );

    let samples = samples
        .into_iter()
        .map(|sample| sample * height_scale)
        .collect();

    Ok(Heightmap::new(width, samples, size)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::TerrainError;
    use bevy::math::IVec2;
    use image::{GrayImage, Luma};
    use std::env;

    fn write_png(name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!("{}_{name}.png", env!("CARGO_PKG_NAME")));
        GrayImage::from_fn(width, height, |x, _| Luma([if x == 0 { 255 } else { 0 }]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn loads_and_scales_png_heightmaps() {
        let path = write_png("scaled", 5, 5);
        let heightmap = load_heightmap(&path, 20.0, 100.0).unwrap();

        assert_eq!(heightmap.dimension(), 5);
        assert_eq!(heightmap.size(), 100.0);
        assert_eq!(heightmap.height(IVec2::new(0, 3)), 20.0);
        assert_eq!(heightmap.height(IVec2::new(1, 3)), 0.0);
    }

    #[test]
    fn rejects_non_square_heightmaps() {
        let path = write_png("non_square", 5, 3);
        assert!(load_heightmap(&path, 1.0, 1.0).is_err());
    }

    #[test]
    fn rejects_invalid_dimensions() {
        let path = write_png("invalid_dimension", 4, 4);
        let error = load_heightmap(&path, 1.0, 1.0).unwrap_err();

        assert_eq!(
            error.downcast_ref::<TerrainError>(),
            Some(&TerrainError::InvalidDimension(4))
        );
    }

    #[test]
    fn reports_missing_files() {
        assert!(load_heightmap("does/not/exist.png", 1.0, 1.0).is_err());
    }
}
