//! Lidar Graph - proximity graphs from 2D range scans
//!
//! Turns one LiDAR sweep (an ordered array of range readings across a fixed
//! field of view) into a graph with one node per sample and an edge between
//! every two samples closer than a threshold. The edge set is exactly the
//! brute-force one; a uniform grid only narrows down which pairs are tested.
//!
//! # Architecture
//!
//! - `scan`: polar to Cartesian projection (SoA coordinate buffers)
//! - `spatial`: candidate-neighbor indices (uniform grid, R*-tree)
//! - `graph`: edge construction and the assembled `ProximityGraph`
//! - `pipeline`: `ScanGraphBuilder` / `lidar_to_graph` tying the stages together
//! - `config`, `error`: `ScanConfig` and the invalid-input `Error`
//!
//! The `parallel` feature (default) runs projection and edge search on the
//! rayon pool for large scans. Build with `--no-default-features` for
//! `wasm32-unknown-unknown`, where the JS bindings below are the entry point.

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod scan;
pub mod spatial;

pub use config::{IndexKind, ScanConfig};
pub use error::Error;
pub use graph::{NodeId, ProximityEdge, ProximityGraph, ScanNode};
pub use pipeline::{ScanGraphBuilder, lidar_to_graph};
pub use scan::{Point2D, Projection, project};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Scan-to-graph converter exposed to JavaScript.
///
/// Holds the configuration and a reusable spatial grid, so one instance can
/// process a stream of scans.
#[wasm_bindgen]
pub struct LidarGraphWasm {
    builder: ScanGraphBuilder,
}

#[wasm_bindgen]
impl LidarGraphWasm {
    /// Create a converter for the given field of view and edge threshold.
    ///
    /// # Arguments
    ///
    /// * `fov_min_deg` - Angle of the first sample in degrees
    /// * `fov_max_deg` - Angle of the last sample in degrees
    /// * `max_distance` - Samples strictly closer than this are joined
    #[wasm_bindgen(constructor)]
    pub fn new(fov_min_deg: f64, fov_max_deg: f64, max_distance: f64) -> std::result::Result<LidarGraphWasm, JsError> {
        let config = ScanConfig::default()
            .with_field_of_view(fov_min_deg, fov_max_deg)
            .with_max_distance(max_distance);
        Ok(Self {
            builder: ScanGraphBuilder::new(config)?,
        })
    }

    /// Create a converter from a (possibly partial) config object.
    ///
    /// Missing fields take their defaults, e.g. `{ maxDistance: 0.5 }`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> std::result::Result<LidarGraphWasm, JsError> {
        let config: ScanConfig = if config.is_undefined() || config.is_null() {
            ScanConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            builder: ScanGraphBuilder::new(config)?,
        })
    }

    /// Create a converter with scratch space pre-allocated for `num_points`
    /// samples per scan.
    #[wasm_bindgen(js_name = withCapacity)]
    pub fn with_capacity(
        fov_min_deg: f64,
        fov_max_deg: f64,
        max_distance: f64,
        num_points: usize,
    ) -> std::result::Result<LidarGraphWasm, JsError> {
        let config = ScanConfig::default()
            .with_field_of_view(fov_min_deg, fov_max_deg)
            .with_max_distance(max_distance);
        Ok(Self {
            builder: ScanGraphBuilder::with_capacity(config, num_points)?,
        })
    }

    /// Current configuration as a plain object.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.builder.config())?)
    }

    /// Build the proximity graph of one scan.
    ///
    /// Throws on an empty scan. NaN or out-of-range readings become nodes
    /// without edges.
    #[wasm_bindgen(js_name = buildGraph)]
    pub fn build_graph(&mut self, ranges: &[f64]) -> std::result::Result<ScanGraphWasm, JsError> {
        Ok(ScanGraphWasm {
            graph: self.builder.build(ranges)?,
        })
    }
}

/// A built proximity graph exposed to JavaScript.
#[wasm_bindgen]
pub struct ScanGraphWasm {
    graph: ProximityGraph,
}

#[wasm_bindgen]
impl ScanGraphWasm {
    // =========================================================================
    // Nodes
    // =========================================================================

    /// Get the number of nodes (one per sample).
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Get a node's X position.
    #[wasm_bindgen(js_name = getNodeX)]
    pub fn get_node_x(&self, node_id: u32) -> Option<f64> {
        self.graph.node(NodeId(node_id)).map(|n| n.position.x)
    }

    /// Get a node's Y position.
    #[wasm_bindgen(js_name = getNodeY)]
    pub fn get_node_y(&self, node_id: u32) -> Option<f64> {
        self.graph.node(NodeId(node_id)).map(|n| n.position.y)
    }

    /// Get a node's original range reading.
    #[wasm_bindgen(js_name = getNodeDistance)]
    pub fn get_node_distance(&self, node_id: u32) -> Option<f64> {
        self.graph.node(NodeId(node_id)).map(|n| n.distance)
    }

    /// Copy of all X positions.
    #[wasm_bindgen(js_name = positionsX)]
    pub fn positions_x(&self) -> Float64Array {
        Float64Array::from(self.graph.positions_x())
    }

    /// Copy of all Y positions.
    #[wasm_bindgen(js_name = positionsY)]
    pub fn positions_y(&self) -> Float64Array {
        Float64Array::from(self.graph.positions_y())
    }

    /// Copy of the original range readings.
    pub fn ranges(&self) -> Float64Array {
        Float64Array::from(self.graph.ranges())
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Get the number of edges.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// Edges as a flat Uint32Array `[src0, tgt0, src1, tgt1, ...]`, src < tgt.
    #[wasm_bindgen(js_name = edgePairs)]
    pub fn edge_pairs(&self) -> Vec<u32> {
        self.graph
            .edge_pairs()
            .flat_map(|(source, target)| [source, target])
            .collect()
    }

    /// Edge lengths, in the same order as `edgePairs`.
    #[wasm_bindgen(js_name = edgeDistances)]
    pub fn edge_distances(&self) -> Float64Array {
        let distances: Vec<f64> = self.graph.edges().map(|e| e.distance).collect();
        Float64Array::from(&distances[..])
    }

    /// Get neighbors of a node as a Uint32Array.
    pub fn neighbors(&self, node_id: u32) -> Vec<u32> {
        self.graph.neighbors(NodeId(node_id)).to_vec()
    }

    /// Get the adjacency in CSR format for GPU upload.
    ///
    /// Returns [offsets..., targets...] where offsets has node_count + 1 elements.
    #[wasm_bindgen(js_name = edgesCsr)]
    pub fn edges_csr(&self) -> Vec<u32> {
        self.graph.edges_csr()
    }

    /// The whole graph as a plain object `{ posX, posY, ranges, edges }`.
    #[wasm_bindgen(js_name = toJs)]
    pub fn to_js(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.graph)?)
    }
}
