//! Spatial indexing for candidate-neighbor queries.
//!
//! An index answers one question: which points might lie within the
//! threshold of point `i`? Candidates are a superset of the true neighbors;
//! the edge builder confirms each one with the exact distance test.
//!
//! - `grid`: uniform grid (spatial hash), cell side = threshold. Default.
//! - `rtree`: R*-tree radius queries via `rstar`.

mod grid;
mod rtree;

pub use grid::{CellKey, GridIndex};
pub use rtree::{IndexedPoint, RTreeIndex};

/// Source of candidate neighbors for the edge builder.
pub trait CandidateIndex: Sync {
    /// Call `visit` once for every candidate of point `i`, never with `i`.
    ///
    /// Points that are not linkable (isolated, or at a non-finite position)
    /// have no candidates and are never candidates themselves.
    fn for_each_candidate(&self, i: usize, visit: &mut dyn FnMut(usize));

    /// Collect the candidates of point `i`.
    fn query_candidates(&self, i: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.for_each_candidate(i, &mut |j| out.push(j));
        out
    }
}
