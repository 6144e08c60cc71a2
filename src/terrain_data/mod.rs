//! This module contains the engine independent core of the level of detail algorithm:
//! the [`VertexHierarchy`] and the refinement that selects a triangle strip from it.
//!
//! # Explanation
//! The heightmap samples are arranged in a directed acyclic graph that interleaves
//! two quadtrees. The white quadtree subdivides the grid along the diagonals,
//! the black quadtrees along the axes. Each vertex stores the radius of a sphere
//! bounding all its descendants, and the largest vertical error any of them introduces.
//!
//! Every frame, the [`refinement`](VertexHierarchy::refine) walks the DAG top-down,
//! starting from the four edges between the centre and the edge midpoints.
//! A vertex is refined (and its children visited) if its error, projected onto the
//! screen, would exceed the tolerance. The visited vertices are emitted as a single
//! [`TriangleStrip`] that covers the whole grid without cracks.
//!
//! Both passes are pure functions of the hierarchy and the [`RefinementParams`],
//! so multiple views can refine the same hierarchy concurrently.

mod error_metric;
mod hierarchy;
mod refinement;
mod triangle_strip;
mod vertex;


pub use self::{
    hierarchy::VertexHierarchy,
    refinement::RefinementParams,
    triangle_strip::{RefinementStats, TriangleStrip},
    vertex::Vertex,
};
