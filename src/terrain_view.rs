use anyhow::Result;
use bevy::prelude::*;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Marks the camera the terrains are refined for.
#[derive(Clone, Copy, Component, Debug, Default)]
#[require(TerrainViewConfig)]
pub struct TerrainView;

/// Controls how fine the terrain is refined for a [`TerrainView`].
#[derive(Serialize, Deserialize, Clone, Copy, Component, Debug, PartialEq)]
#[serde(default)]
pub struct TerrainViewConfig {
    /// The largest screen space error that is accepted, usually in pixels.
    /// Zero or below refines the terrain completely.
    pub tolerance: f32,
    /// The ratio between the pixels spanned by the field of view and its angle.
    pub lambda: f32,
}

impl Default for TerrainViewConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            lambda: 100.0,
        }
    }
}

impl TerrainViewConfig {
    /// Derives lambda from the vertical field of view (in radians) and the viewport height.
    pub fn from_viewport(fov: f32, pixels: f32, tolerance: f32) -> Self {
        Self {
            tolerance,
            lambda: pixels / fov,
        }
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let encoded = fs::read_to_string(path)?;
        Ok(ron::from_str(&encoded)?)
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = ron::ser::to_string_pretty(self, PrettyConfig::default())?;
        fs::write(path, encoded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn lambda_from_viewport() {
        let config = TerrainViewConfig::from_viewport(FRAC_PI_4, 720.0, 2.0);

        assert!((config.lambda - 916.7325).abs() < 1e-2);
        assert_eq!(config.tolerance, 2.0);
    }

    #[test]
    fn parses_partial_configs() {
        let config: TerrainViewConfig = ron::from_str("(tolerance: 4.0)").unwrap();

        assert_eq!(
            config,
            TerrainViewConfig {
                tolerance: 4.0,
                lambda: 100.0
            }
        );
    }
}
