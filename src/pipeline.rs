//! Scan to graph pipeline.
//!
//! Stages run strictly in order, each fully materialized before the next:
//!
//! ```text
//! ranges -> project -> index -> edges -> assemble -> ProximityGraph
//! ```
//!
//! `ScanGraphBuilder` keeps its grid between calls so that a stream of
//! equally sized scans reuses the same buffers. The grid is rebuilt from
//! scratch on every call.

use log::debug;

use crate::config::{IndexKind, ScanConfig};
use crate::error::Result;
use crate::graph::{ProximityEdge, ProximityGraph, brute_force_edges, build_edges};
use crate::scan::{Projection, Projector};
use crate::spatial::{GridIndex, RTreeIndex};

/// Reusable scan-to-graph builder.
#[derive(Debug, Clone)]
pub struct ScanGraphBuilder {
    config: ScanConfig,
    projector: Projector,
    grid: GridIndex,
}

impl ScanGraphBuilder {
    /// Create a builder, rejecting an invalid configuration.
    pub fn new(config: ScanConfig) -> Result<Self> {
        Self::with_capacity(config, 0)
    }

    /// Create a builder with scratch space for `num_points` samples.
    pub fn with_capacity(config: ScanConfig, num_points: usize) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            projector: Projector::from_config(&config),
            grid: GridIndex::with_capacity(num_points),
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Turn one scan into a proximity graph.
    ///
    /// Fails only on invalid input (currently: an empty or oversized scan);
    /// NaN, infinite and negative readings become nodes without edges.
    pub fn build(&mut self, ranges: &[f64]) -> Result<ProximityGraph> {
        let projection = self.projector.project(ranges)?;
        let edges = self.find_edges(&projection);

        debug!(
            "[ScanGraph] {} samples -> {} edges (index={:?}, max_distance={})",
            ranges.len(),
            edges.len(),
            self.config.index,
            self.config.max_distance
        );

        Ok(ProximityGraph::assemble(ranges, projection, edges))
    }

    fn find_edges(&mut self, projection: &Projection) -> Vec<ProximityEdge> {
        let max_distance = self.config.max_distance;
        // Nothing is strictly closer than zero; also keeps cell sizes positive
        if max_distance * max_distance == 0.0 {
            return Vec::new();
        }

        let parallel = self.config.is_parallel(projection.len());
        match self.config.index {
            IndexKind::Grid => {
                self.grid.rebuild(projection, max_distance);
                build_edges(projection, &self.grid, max_distance, parallel)
            }
            IndexKind::RTree => {
                let index = RTreeIndex::build(projection, max_distance);
                build_edges(projection, &index, max_distance, parallel)
            }
            IndexKind::BruteForce => brute_force_edges(projection, max_distance),
        }
    }
}

/// Build the proximity graph of one scan.
pub fn lidar_to_graph(ranges: &[f64], config: &ScanConfig) -> Result<ProximityGraph> {
    ScanGraphBuilder::with_capacity(*config, ranges.len())?.build(ranges)
}
