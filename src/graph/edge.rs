//! Undirected proximity edges.
//!
//! An edge joins two distinct samples and is stored with
//! `source < target`, so each unordered pair has exactly one representation.
//! The Euclidean distance rides along as a weight but is not part of the
//! edge's identity.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::node::NodeId;

/// Undirected edge between two scan samples.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProximityEdge {
    /// Lower endpoint
    pub source: NodeId,
    /// Higher endpoint
    pub target: NodeId,
    /// Euclidean distance between the endpoints
    pub distance: f64,
}

impl ProximityEdge {
    /// Edge between `a` and `b`, stored in canonical order.
    #[inline]
    pub fn new(a: NodeId, b: NodeId, distance: f64) -> Self {
        debug_assert_ne!(a, b, "self-loops are not proximity edges");
        let (source, target) = if a < b { (a, b) } else { (b, a) };
        Self {
            source,
            target,
            distance,
        }
    }

    /// Edge between sample indices `i` and `j`.
    #[inline]
    pub(crate) fn between(i: usize, j: usize, distance: f64) -> Self {
        Self::new(NodeId(i as u32), NodeId(j as u32), distance)
    }

    /// Endpoints as raw `(source, target)` with `source < target`.
    #[inline]
    pub fn pair(&self) -> (u32, u32) {
        (self.source.0, self.target.0)
    }

    /// Whether `node` is an endpoint.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }
}

impl PartialEq for ProximityEdge {
    fn eq(&self, other: &Self) -> bool {
        self.pair() == other.pair()
    }
}

impl Eq for ProximityEdge {}

impl Hash for ProximityEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pair().hash(state);
    }
}

impl PartialOrd for ProximityEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProximityEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pair().cmp(&other.pair())
    }
}

impl fmt::Display for ProximityEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({}-{}, d={})", self.source.0, self.target.0, self.distance)
    }
}
