//! Pointer-free navigation of the vertex DAG.
//!
//! Every vertex apart from the nine seeds is stored at an arena index that is a pure
//! function of the index of its quadtree parent. This lets the hierarchy, the error
//! metric passes and the refinement traversal find children without storing any links.

use std::ops::Range;

/// The number of seed vertices that occupy the first arena slots.
pub const SEED_COUNT: usize = 9;

/// The arena indices of the four grid corners (south-west, south-east, north-east, north-west).
pub const CORNERS: [usize; 4] = [0, 1, 2, 3];

/// The arena index of the centre vertex, the root of the white quadtree and of the DAG.
pub const CENTRE: usize = 4;

/// The arena indices of the four edge midpoints (left, bottom, right, top),
/// each the root of one black quadtree.
pub const EDGE_MIDPOINTS: [usize; 4] = [5, 6, 7, 8];

/// The refinement level assigned to the centre vertex at the start of a traversal.
pub const ROOT_LEVEL: u32 = 1;

/// Arena slots of the four quadtree children of `parent`.
///
/// Slots are reserved whether or not the child exists, so grids with boundary
/// quadtree nodes leave holes in the arena.
#[inline]
pub fn quadtree_children(parent: usize) -> Range<usize> {
    debug_assert!(parent >= CENTRE, "seed corners have no quadtree children");
    let first = 4 * parent - 7;
    first..first + 4
}

/// The first DAG child of `vertex`, which was reached from its DAG parent `parent`.
///
/// The result is one of the quadtree children of `parent`.
#[inline]
pub fn first_child(parent: usize, vertex: usize) -> usize {
    4 * parent + (2 * parent + vertex - 6) % 4 - 7
}

/// The second DAG child of `vertex`, which was reached from its DAG parent `parent`.
#[inline]
pub fn second_child(parent: usize, vertex: usize) -> usize {
    4 * parent + (2 * parent + vertex - 5) % 4 - 7
}

/// Both DAG children of `vertex`, in traversal order.
#[inline]
pub fn children(parent: usize, vertex: usize) -> [usize; 2] {
    [first_child(parent, vertex), second_child(parent, vertex)]
}
