//! Node identifiers and attributes.
//!
//! Each node is one scan sample. Its id is the sample's position in the scan,
//! and it carries:
//! - Position (x, y) from the projection
//! - Distance: the original range reading, untouched by projection

use std::fmt;

use serde::Serialize;

use crate::scan::Point2D;

/// Node identifier: the index of the sample in its scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Id as a slice index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Attributes of one graph node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanNode {
    /// Projected position. Non-finite for NaN, infinite or no-return samples,
    /// mirrored through the origin for negative ones.
    pub position: Point2D,
    /// Original range reading.
    pub distance: f64,
}

impl ScanNode {
    #[inline]
    pub fn new(position: Point2D, distance: f64) -> Self {
        Self { position, distance }
    }
}
