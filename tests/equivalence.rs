//! Indexed edge construction against the brute-force reference on random
//! scans.

use std::collections::HashSet;

use lidar_graph::graph::{brute_force_edges, build_edges};
use lidar_graph::spatial::{GridIndex, RTreeIndex};
use lidar_graph::{IndexKind, NodeId, ScanConfig, ScanGraphBuilder, lidar_to_graph, project};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random scan with occasional NaN, infinite and negative readings.
fn random_scan(rng: &mut ChaCha8Rng, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| match rng.gen_range(0..100) {
            0 => f64::NAN,
            1 => f64::INFINITY,
            2 => -rng.gen_range(0.0..3.0),
            _ => rng.gen_range(0.05..6.0),
        })
        .collect()
}

fn pair_set(pairs: impl Iterator<Item = (u32, u32)>) -> HashSet<(u32, u32)> {
    pairs.collect()
}

#[test]
fn grid_edges_equal_brute_force_on_random_scans() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for round in 0..200 {
        let len = rng.gen_range(1..400);
        let ranges = random_scan(&mut rng, len);
        let max_distance = rng.gen_range(0.01..3.0);
        let fov_min = rng.gen_range(-180.0..0.0);
        let fov_max = fov_min + rng.gen_range(1.0..360.0);

        let points = project(&ranges, fov_min, fov_max).unwrap();
        let expected = pair_set(brute_force_edges(&points, max_distance).iter().map(|e| e.pair()));

        let grid = GridIndex::build(&points, max_distance);
        let grid_edges = build_edges(&points, &grid, max_distance, false);
        assert_eq!(
            grid_edges.len(),
            expected.len(),
            "round {round}: duplicate or missing grid edges"
        );
        assert_eq!(pair_set(grid_edges.iter().map(|e| e.pair())), expected, "round {round}");

        let rtree = RTreeIndex::build(&points, max_distance);
        let rtree_edges = build_edges(&points, &rtree, max_distance, false);
        assert_eq!(pair_set(rtree_edges.iter().map(|e| e.pair())), expected, "round {round}");
    }
}

#[test]
fn grid_edges_equal_brute_force_on_lattice_boundaries() {
    // Points on exact multiples of the cell size, where cell assignment and
    // the strict threshold both sit on their boundaries
    let max_distance = 0.25;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for i in -6..=6 {
        for j in -6..=6 {
            xs.push(i as f64 * max_distance);
            ys.push(j as f64 * max_distance);
        }
    }
    let points = lidar_graph::Projection::new(xs, ys);

    let expected = pair_set(brute_force_edges(&points, max_distance).iter().map(|e| e.pair()));
    let grid = GridIndex::build(&points, max_distance);
    let actual = pair_set(build_edges(&points, &grid, max_distance, false).iter().map(|e| e.pair()));

    // Lattice neighbors are exactly max_distance apart: no edges at all
    assert!(expected.is_empty());
    assert_eq!(actual, expected);
}

#[test]
fn pipeline_backends_agree() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..50 {
        let len = rng.gen_range(1..300);
        let ranges = random_scan(&mut rng, len);
        let max_distance = rng.gen_range(0.05..2.0);

        let graphs: Vec<_> = [IndexKind::Grid, IndexKind::RTree, IndexKind::BruteForce]
            .into_iter()
            .map(|index| {
                let config = ScanConfig::default()
                    .with_max_distance(max_distance)
                    .with_index(index);
                lidar_to_graph(&ranges, &config).unwrap()
            })
            .collect();

        let reference: Vec<_> = graphs[2].edge_pairs().collect();
        for graph in &graphs[..2] {
            assert_eq!(graph.edge_pairs().collect::<Vec<_>>(), reference);
        }
    }
}

#[test]
fn repeated_builds_are_identical() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let ranges: Vec<f64> = (0..500).map(|_| rng.gen_range(0.1..4.0)).collect();
    let config = ScanConfig::default().with_max_distance(0.3);

    let mut builder = ScanGraphBuilder::new(config).unwrap();
    let first = builder.build(&ranges).unwrap();
    let second = builder.build(&ranges).unwrap();
    let fresh = lidar_to_graph(&ranges, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[test]
fn edges_are_canonical_and_unique() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let ranges = random_scan(&mut rng, 350);
    let graph = lidar_to_graph(&ranges, &ScanConfig::default().with_max_distance(1.5)).unwrap();

    let mut seen = HashSet::new();
    for (source, target) in graph.edge_pairs() {
        assert!(source < target);
        assert!(seen.insert((source, target)));
        assert!(!seen.contains(&(target, source)));
    }
    for edge in graph.edges() {
        assert!(graph.has_edge(edge.source, edge.target));
        assert!(graph.has_edge(edge.target, edge.source));
    }
}

#[test]
fn anomalous_samples_never_gain_edges() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    for _ in 0..50 {
        let len = rng.gen_range(1..300);
        let ranges = random_scan(&mut rng, len);
        let config = ScanConfig::default().with_max_distance(rng.gen_range(0.1..4.0));
        let graph = lidar_to_graph(&ranges, &config).unwrap();

        for (i, range) in ranges.iter().enumerate() {
            if !(range.is_finite() && *range >= 0.0) {
                assert_eq!(graph.degree(NodeId(i as u32)), 0, "sample {i} with range {range}");
            }
        }
    }
}

#[test]
fn nan_samples_never_gain_edges() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut ranges: Vec<f64> = (0..200).map(|_| rng.gen_range(0.1..1.0)).collect();
    for i in (0..200).step_by(13) {
        ranges[i] = f64::NAN;
    }

    // Threshold larger than the whole scan: every finite pair is joined
    let graph = lidar_to_graph(&ranges, &ScanConfig::default().with_max_distance(10.0)).unwrap();

    let nan_count = ranges.iter().filter(|r| r.is_nan()).count();
    let finite_count = ranges.len() - nan_count;
    assert_eq!(graph.node_count(), 200);
    assert_eq!(graph.edge_count(), finite_count * (finite_count - 1) / 2);
    for i in (0..200).step_by(13) {
        assert_eq!(graph.degree(NodeId(i as u32)), 0);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_pipeline_matches_serial() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let ranges = random_scan(&mut rng, 6000);

    let serial = ScanConfig::default()
        .with_max_distance(0.2)
        .with_parallel_threshold(usize::MAX);
    let parallel = serial.with_parallel_threshold(1);

    let serial = lidar_to_graph(&ranges, &serial).unwrap();
    let parallel = lidar_to_graph(&ranges, &parallel).unwrap();

    assert_eq!(
        serial.edge_pairs().collect::<Vec<_>>(),
        parallel.edge_pairs().collect::<Vec<_>>()
    );
    assert!(serial.edge_count() > 0);
}
