//! Error types for lidar-graph.
//!
//! Every variant is an invalid-input condition detected before any work is
//! done. Numeric anomalies inside a scan (NaN, negative or infinite ranges)
//! are not errors: those samples become nodes without edges.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid-input errors reported by the pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The range sequence has no samples.
    #[error("Invalid input: scan contains no range samples")]
    EmptyScan,

    /// The field of view is empty, inverted or NaN.
    #[error("Invalid input: field of view [{min_deg}, {max_deg}] requires min < max")]
    InvalidFieldOfView {
        /// Lower bound in degrees
        min_deg: f64,
        /// Upper bound in degrees
        max_deg: f64,
    },

    /// The distance threshold is negative or not finite.
    #[error("Invalid input: max distance {0} must be finite and non-negative")]
    InvalidMaxDistance(f64),

    /// The no-return sentinel is NaN.
    #[error("Invalid input: no-return range {0} is not a number")]
    InvalidNoReturnRange(f64),

    /// Node ids are `u32`; larger scans cannot be indexed.
    #[error("Invalid input: scan has {0} samples, more than u32::MAX")]
    TooManySamples(usize),
}
