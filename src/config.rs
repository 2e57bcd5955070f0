//! Scan and pipeline configuration.
//!
//! `ScanConfig` is plain data with defaults matching a 270° sensor sweep.
//! It deserializes from partial objects (JSON or JS), filling the missing
//! fields from [`ScanConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default lower field-of-view bound in degrees.
pub const DEFAULT_FOV_MIN_DEG: f64 = -135.0;

/// Default upper field-of-view bound in degrees.
pub const DEFAULT_FOV_MAX_DEG: f64 = 135.0;

/// Default edge threshold, in the same units as the range readings.
pub const DEFAULT_MAX_DISTANCE: f64 = 1.0;

/// Scans with at least this many samples use the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// How candidate neighbor pairs are found.
///
/// All variants produce the same edge set; they differ only in cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexKind {
    /// Uniform grid with cell side equal to the threshold.
    #[default]
    Grid,
    /// R*-tree radius queries.
    RTree,
    /// Every pair is tested. O(n²), reference only.
    BruteForce,
}

/// Configuration for turning a scan into a proximity graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Angle of the first sample, in degrees (default: -135).
    pub fov_min_deg: f64,
    /// Angle of the last sample, in degrees (default: 135).
    pub fov_max_deg: f64,
    /// Edges join samples strictly closer than this (default: 1.0).
    pub max_distance: f64,
    /// Readings at or above this value mean "no return" (default: none).
    ///
    /// Such samples keep their node but get no coordinates, so they have no
    /// edges.
    pub no_return_range: Option<f64>,
    /// Neighbor search backend (default: grid).
    pub index: IndexKind,
    /// Minimum scan size for parallel stages (default: 4096).
    pub parallel_threshold: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fov_min_deg: DEFAULT_FOV_MIN_DEG,
            fov_max_deg: DEFAULT_FOV_MAX_DEG,
            max_distance: DEFAULT_MAX_DISTANCE,
            no_return_range: None,
            index: IndexKind::Grid,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ScanConfig {
    /// Set the angular span covered by the scan.
    pub fn with_field_of_view(mut self, min_deg: f64, max_deg: f64) -> Self {
        self.fov_min_deg = min_deg;
        self.fov_max_deg = max_deg;
        self
    }

    /// Set the edge distance threshold.
    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Treat readings at or above `range` as "no return".
    pub fn with_no_return_range(mut self, range: f64) -> Self {
        self.no_return_range = Some(range);
        self
    }

    /// Select the neighbor search backend.
    pub fn with_index(mut self, index: IndexKind) -> Self {
        self.index = index;
        self
    }

    /// Set the minimum scan size for parallel stages.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Check every field that does not depend on the scan itself.
    pub fn validate(&self) -> Result<()> {
        validate_field_of_view(self.fov_min_deg, self.fov_max_deg)?;

        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(Error::InvalidMaxDistance(self.max_distance));
        }

        if let Some(range) = self.no_return_range
            && range.is_nan()
        {
            return Err(Error::InvalidNoReturnRange(range));
        }

        Ok(())
    }

    /// Whether a scan of `len` samples should use the parallel stages.
    #[inline]
    pub fn is_parallel(&self, len: usize) -> bool {
        cfg!(feature = "parallel") && len >= self.parallel_threshold
    }
}

/// `min < max`, which also rejects NaN bounds.
pub(crate) fn validate_field_of_view(min_deg: f64, max_deg: f64) -> Result<()> {
    if min_deg < max_deg {
        Ok(())
    } else {
        Err(Error::InvalidFieldOfView { min_deg, max_deg })
    }
}
