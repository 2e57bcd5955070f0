//! ProximityGraph - the assembled scan graph.
//!
//! Nodes are stored in SoA layout (x, y, range buffers indexed by sample)
//! and edges as a sorted list of canonical pairs. A CSR adjacency built at
//! assembly time answers neighbor and degree queries in O(degree).

use petgraph::stable_graph::StableUnGraph;
use serde::Serialize;

use super::edge::ProximityEdge;
use super::node::{NodeId, ScanNode};
use crate::scan::{Point2D, Projection};

/// Proximity graph over one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityGraph {
    /// X positions (SoA layout)
    pos_x: Vec<f64>,

    /// Y positions (SoA layout)
    pos_y: Vec<f64>,

    /// Original range per node
    ranges: Vec<f64>,

    /// Edges sorted by (source, target)
    edges: Vec<ProximityEdge>,

    /// CSR offsets: neighbors of node `i` are `adjacency[offsets[i]..offsets[i + 1]]`
    #[serde(skip)]
    offsets: Vec<u32>,

    #[serde(skip)]
    adjacency: Vec<u32>,
}

impl ProximityGraph {
    /// Materialize the graph from the pipeline stages' outputs.
    ///
    /// `ranges` and `projection` must have one entry per sample, and every
    /// edge endpoint must be a valid sample index.
    pub fn assemble(ranges: &[f64], projection: Projection, mut edges: Vec<ProximityEdge>) -> Self {
        let n = ranges.len();
        debug_assert_eq!(projection.len(), n);
        debug_assert!(
            edges
                .iter()
                .all(|e| e.source < e.target && e.target.index() < n),
            "edge endpoint outside the scan"
        );

        edges.sort_unstable();
        debug_assert!(
            edges.windows(2).all(|w| w[0].pair() != w[1].pair()),
            "duplicate edge"
        );

        // Degree count, then prefix sum into offsets
        let mut offsets = vec![0u32; n + 1];
        for edge in &edges {
            offsets[edge.source.index() + 1] += 1;
            offsets[edge.target.index() + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        // Sorted edge order leaves each neighbor list ascending: lower
        // neighbors arrive as targets first, then higher ones as sources
        let mut cursor = offsets.clone();
        let mut adjacency = vec![0u32; offsets[n] as usize];
        for edge in &edges {
            let (s, t) = edge.pair();
            adjacency[cursor[s as usize] as usize] = t;
            cursor[s as usize] += 1;
            adjacency[cursor[t as usize] as usize] = s;
            cursor[t as usize] += 1;
        }

        Self {
            pos_x: projection.xs,
            pos_y: projection.ys,
            ranges: ranges.to_vec(),
            edges,
            offsets,
            adjacency,
        }
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Number of nodes (one per scan sample).
    pub fn node_count(&self) -> usize {
        self.ranges.len()
    }

    /// Attributes of node `id`.
    pub fn node(&self, id: NodeId) -> Option<ScanNode> {
        let i = id.index();
        let distance = *self.ranges.get(i)?;
        Some(ScanNode::new(Point2D::new(self.pos_x[i], self.pos_y[i]), distance))
    }

    /// All nodes in sample order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = (NodeId, ScanNode)> + '_ {
        (0..self.node_count()).map(|i| {
            let node = ScanNode::new(Point2D::new(self.pos_x[i], self.pos_y[i]), self.ranges[i]);
            (NodeId(i as u32), node)
        })
    }

    /// X positions, indexed by node.
    pub fn positions_x(&self) -> &[f64] {
        &self.pos_x
    }

    /// Y positions, indexed by node.
    pub fn positions_y(&self) -> &[f64] {
        &self.pos_y
    }

    /// Original range readings, indexed by node.
    pub fn ranges(&self) -> &[f64] {
        &self.ranges
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges ordered by `(source, target)`. Call again to restart.
    pub fn edges(&self) -> std::slice::Iter<'_, ProximityEdge> {
        self.edges.iter()
    }

    /// Edges as raw `(source, target)` pairs with `source < target`.
    pub fn edge_pairs(&self) -> impl ExactSizeIterator<Item = (u32, u32)> + '_ {
        self.edges.iter().map(ProximityEdge::pair)
    }

    /// Whether `a` and `b` are joined, in either order.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).binary_search(&b.0).is_ok()
    }

    /// Neighbors of `id`, ascending. Empty for unknown ids.
    pub fn neighbors(&self, id: NodeId) -> &[u32] {
        let i = id.index();
        if i >= self.node_count() {
            return &[];
        }
        &self.adjacency[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }

    /// Number of edges touching `id`.
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// Adjacency in CSR format: `[offsets..., targets...]`.
    ///
    /// `offsets` has `node_count + 1` entries. Each undirected edge appears
    /// under both endpoints.
    pub fn edges_csr(&self) -> Vec<u32> {
        let mut csr = Vec::with_capacity(self.offsets.len() + self.adjacency.len());
        csr.extend_from_slice(&self.offsets);
        csr.extend_from_slice(&self.adjacency);
        csr
    }

    /// Copy into a petgraph graph for general-purpose algorithms.
    ///
    /// Node indices match sample indices; edge weights are distances.
    pub fn to_petgraph(&self) -> StableUnGraph<ScanNode, f64> {
        let mut graph = StableUnGraph::with_capacity(self.node_count(), self.edge_count());
        let indices: Vec<_> = self.nodes().map(|(_, node)| graph.add_node(node)).collect();
        for edge in &self.edges {
            graph.add_edge(
                indices[edge.source.index()],
                indices[edge.target.index()],
                edge.distance,
            );
        }
        graph
    }
}
