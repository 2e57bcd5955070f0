//! Scan samples and their projection into the plane.
//!
//! A scan is an ordered slice of range readings spread linearly across a
//! field of view. Projection turns it into SoA coordinate buffers that the
//! spatial index and edge builder read.

mod projector;

pub use projector::{Point2D, Projection, Projector, project};
