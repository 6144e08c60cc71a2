use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("the terrain dimension {0} is not of the form 2^n + 1")]
    InvalidDimension(u32),
    #[error("expected {expected} heightmap samples, got {actual}")]
    HeightmapLength { expected: usize, actual: usize },
    #[error("the terrain size {0} is not a positive finite number")]
    InvalidSize(f32),
}

pub type TerrainResult<T> = Result<T, TerrainError>;
