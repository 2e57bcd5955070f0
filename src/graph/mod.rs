//! Proximity graph construction and storage.
//!
//! `builder` finds the edges (indexed or brute force), `proximity` assembles
//! them with the node attributes into a [`ProximityGraph`].

mod builder;
mod edge;
mod node;
mod proximity;

pub use builder::{brute_force_edges, build_edges};
pub use edge::ProximityEdge;
pub use node::{NodeId, ScanNode};
pub use proximity::ProximityGraph;
