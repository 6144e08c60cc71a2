//! Grid and index arithmetic shared by the hierarchy construction and the refinement.

mod coordinate;
pub mod dag;

pub use crate::math::coordinate::GridLayout;
