use bytemuck::cast_slice;

/// Statistics of a single refinement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefinementStats {
    /// The number of activity tests performed.
    pub visited: usize,
    /// The number of vertices that passed their activity test.
    pub active: usize,
}

/// A single triangle strip over the arena of a vertex hierarchy.
///
/// Every strip starts with the two sentinel indices `[0, 0]` and alternates between
/// left and right turns. When two consecutive vertices would turn the same way, the
/// second-to-last index is repeated, which inserts a degenerate triangle that flips
/// the winding back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriangleStrip {
    indices: Vec<u32>,
    parity: u32,
    stats: RefinementStats,
}

impl Default for TriangleStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleStrip {
    pub fn new() -> Self {
        Self {
            indices: vec![0, 0],
            parity: 0,
            stats: RefinementStats::default(),
        }
    }

    /// Appends `vertex` with the given turn parity.
    ///
    /// Vertices equal to one of the last two indices are skipped.
    pub fn append(&mut self, vertex: usize, parity: u32) {
        let vertex = vertex as u32;
        let length = self.indices.len();
        let (second_to_last, last) = (self.indices[length - 2], self.indices[length - 1]);

        if vertex == last || vertex == second_to_last {
            return;
        }

        if parity != self.parity {
            self.parity = parity;
        } else {
            self.indices.push(second_to_last);
        }

        self.indices.push(vertex);
    }

    /// Unconditionally appends `vertex`, used to close the strip.
    pub fn push(&mut self, vertex: usize) {
        self.indices.push(vertex as u32);
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn into_indices(self) -> Vec<u32> {
        self.indices
    }

    /// The indices as raw bytes, in native endianness.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.indices)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The triangles of the strip that span a non-zero area in index space.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .windows(3)
            .map(|window| [window[0], window[1], window[2]])
            .filter(|[a, b, c]| a != b && b != c && a != c)
    }

    #[inline]
    pub fn stats(&self) -> RefinementStats {
        self.stats
    }

    #[inline]
    pub(crate) fn stats_mut(&mut self) -> &mut RefinementStats {
        &mut self.stats
    }
}
