//! R-tree candidate index using the rstar crate.
//!
//! An alternative to the uniform grid: linkable points are bulk-loaded into an
//! R*-tree and each query is a radius search. Slower to build than the grid
//! but insensitive to the ratio between threshold and scan extent.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::CandidateIndex;
use crate::scan::Projection;

/// A scan point tagged with its sample index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    /// Sample index in the scan.
    pub index: u32,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl IndexedPoint {
    pub fn new(index: u32, x: f64, y: f64) -> Self {
        Self { index, x, y }
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Radius-query index over the linkable points of a scan.
pub struct RTreeIndex {
    tree: RTree<IndexedPoint>,
    /// Query position per sample; `None` for unlinkable points
    positions: Vec<Option<[f64; 2]>>,
    radius_2: f64,
}

impl RTreeIndex {
    /// Bulk-load the linkable points of a projection.
    ///
    /// Queries return every point within `radius` (inclusive), which covers
    /// all pairs strictly closer than `radius`.
    pub fn build(points: &Projection, radius: f64) -> Self {
        let positions: Vec<Option<[f64; 2]>> = (0..points.len())
            .map(|i| points.is_linkable(i).then(|| [points.xs[i], points.ys[i]]))
            .collect();

        let points: Vec<IndexedPoint> = positions
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|[x, y]| IndexedPoint::new(i as u32, x, y)))
            .collect();

        Self {
            tree: RTree::bulk_load(points),
            positions,
            radius_2: radius * radius,
        }
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl CandidateIndex for RTreeIndex {
    fn for_each_candidate(&self, i: usize, visit: &mut dyn FnMut(usize)) {
        let Some(Some(center)) = self.positions.get(i) else {
            return;
        };
        for point in self.tree.locate_within_distance(*center, self.radius_2) {
            let j = point.index as usize;
            if j != i {
                visit(j);
            }
        }
    }
}
