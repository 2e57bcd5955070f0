//! Proximity edge construction.
//!
//! An edge `(i, j)` exists iff `distance_squared(i, j) < max_distance²`.
//! The indexed builder only evaluates that predicate on candidate pairs; the
//! brute-force builder evaluates it on all `n(n-1)/2` pairs and serves as the
//! reference. Both use [`Projection::distance_squared`], so for a given
//! projection they agree exactly.
//!
//! Equal-to-threshold pairs are not edges. Pairs involving a NaN coordinate
//! compare false and are never edges, and isolated samples are skipped by
//! every path.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::edge::ProximityEdge;
use crate::scan::Projection;
use crate::spatial::CandidateIndex;

/// Emit the edges `(i, j)` with `j > i` found among `i`'s candidates.
#[inline]
fn edges_from<I: CandidateIndex + ?Sized>(
    points: &Projection,
    index: &I,
    i: usize,
    max_distance_2: f64,
    out: &mut Vec<ProximityEdge>,
) {
    index.for_each_candidate(i, &mut |j| {
        if j <= i {
            return;
        }
        let d2 = points.distance_squared(i, j);
        if d2 < max_distance_2 {
            out.push(ProximityEdge::between(i, j, d2.sqrt()));
        }
    });
}

/// Build all proximity edges using a candidate index.
///
/// The index must have been built over `points` with a search radius of at
/// least `max_distance` (for a grid, cell side equal to `max_distance`).
/// With `parallel`, points are split across rayon workers that each fill a
/// private edge list; the lists are concatenated afterwards. Edges come out
/// ordered by source, not by target.
pub fn build_edges<I: CandidateIndex + ?Sized>(
    points: &Projection,
    index: &I,
    max_distance: f64,
    parallel: bool,
) -> Vec<ProximityEdge> {
    let max_distance_2 = max_distance * max_distance;
    let n = points.len();

    #[cfg(feature = "parallel")]
    if parallel {
        return (0..n)
            .into_par_iter()
            .fold(Vec::new, |mut edges, i| {
                edges_from(points, index, i, max_distance_2, &mut edges);
                edges
            })
            .reduce(Vec::new, |mut left, mut right| {
                left.append(&mut right);
                left
            });
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut edges = Vec::new();
    for i in 0..n {
        edges_from(points, index, i, max_distance_2, &mut edges);
    }
    edges
}

/// Build all proximity edges by testing every pair. O(n²).
pub fn brute_force_edges(points: &Projection, max_distance: f64) -> Vec<ProximityEdge> {
    let max_distance_2 = max_distance * max_distance;
    let n = points.len();

    let mut edges = Vec::new();
    for i in (0..n).filter(|&i| points.is_linkable(i)) {
        for j in (i + 1..n).filter(|&j| points.is_linkable(j)) {
            let d2 = points.distance_squared(i, j);
            if d2 < max_distance_2 {
                edges.push(ProximityEdge::between(i, j, d2.sqrt()));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Point2D;
    use crate::spatial::{GridIndex, RTreeIndex};

    fn pairs(mut edges: Vec<ProximityEdge>) -> Vec<(u32, u32)> {
        edges.sort();
        edges.iter().map(ProximityEdge::pair).collect()
    }

    fn grid_edges(points: &Projection, max_distance: f64) -> Vec<(u32, u32)> {
        let index = GridIndex::build(points, max_distance);
        pairs(build_edges(points, &index, max_distance, false))
    }

    #[test]
    fn test_threshold_is_strict() {
        let points = Projection::from_points(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 0.999),
        ]);

        // 0-1 at exactly 1.0 is excluded; 1-2 at 0.999 is kept
        assert_eq!(grid_edges(&points, 1.0), vec![(1, 2)]);
        assert_eq!(pairs(brute_force_edges(&points, 1.0)), vec![(1, 2)]);
    }

    #[test]
    fn test_just_below_threshold_is_an_edge() {
        let eps = 1e-9;
        let points = Projection::from_points(&[Point2D::new(0.0, 0.0), Point2D::new(2.0 - eps, 0.0)]);
        assert_eq!(grid_edges(&points, 2.0), vec![(0, 1)]);
    }

    #[test]
    fn test_edge_weight_is_distance() {
        let points = Projection::from_points(&[Point2D::new(0.0, 0.0), Point2D::new(0.3, 0.4)]);
        let index = GridIndex::build(&points, 1.0);
        let edges = build_edges(&points, &index, 1.0, false);

        assert_eq!(edges.len(), 1);
        approx::assert_relative_eq!(edges[0].distance, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_point_has_no_edges() {
        let points = Projection::from_points(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(f64::NAN, f64::NAN),
            Point2D::new(0.1, 0.0),
        ]);

        assert_eq!(grid_edges(&points, 10.0), vec![(0, 2)]);
        assert_eq!(pairs(brute_force_edges(&points, 10.0)), vec![(0, 2)]);
    }

    #[test]
    fn test_isolated_point_has_no_edges() {
        let mut points = Projection::from_points(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.2, 0.0),
            Point2D::new(0.1, 0.1),
        ]);
        points.isolate(1);

        let rtree = RTreeIndex::build(&points, 10.0);
        assert_eq!(grid_edges(&points, 10.0), vec![(0, 2)]);
        assert_eq!(pairs(build_edges(&points, &rtree, 10.0, false)), vec![(0, 2)]);
        assert_eq!(pairs(brute_force_edges(&points, 10.0)), vec![(0, 2)]);
    }

    #[test]
    fn test_edges_across_cell_boundaries() {
        // Neighbors straddling cell corners at multiples of 0.5
        let points = Projection::from_points(&[
            Point2D::new(0.49, 0.49),
            Point2D::new(0.51, 0.51),
            Point2D::new(-0.01, 0.49),
            Point2D::new(0.99, -0.01),
        ]);
        assert_eq!(grid_edges(&points, 0.5), pairs(brute_force_edges(&points, 0.5)));
    }

    #[test]
    fn test_no_duplicate_edges() {
        let points = Projection::from_points(&[Point2D::new(0.0, 0.0); 5]);
        let edges = grid_edges(&points, 1.0);

        assert_eq!(edges.len(), 10);
        let mut deduped = edges.clone();
        deduped.dedup();
        assert_eq!(deduped, edges);
        assert!(edges.iter().all(|&(s, t)| s < t));
    }

    #[test]
    fn test_rtree_matches_grid() {
        let points: Vec<Point2D> = (0..200)
            .map(|i| {
                let t = i as f64 * 0.37;
                Point2D::new(t.cos() * (1.0 + (i % 7) as f64), t.sin() * 3.0)
            })
            .collect();
        let points = Projection::from_points(&points);

        let rtree = RTreeIndex::build(&points, 0.8);
        assert_eq!(
            pairs(build_edges(&points, &rtree, 0.8, false)),
            grid_edges(&points, 0.8)
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let points: Vec<Point2D> = (0..3000)
            .map(|i| Point2D::new((i % 60) as f64 * 0.3, (i / 60) as f64 * 0.3))
            .collect();
        let points = Projection::from_points(&points);
        let index = GridIndex::build(&points, 0.5);

        let serial = pairs(build_edges(&points, &index, 0.5, false));
        let parallel = pairs(build_edges(&points, &index, 0.5, true));

        assert!(!serial.is_empty());
        assert_eq!(serial, parallel);
    }
}
