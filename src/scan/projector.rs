//! Polar to Cartesian projection of a range scan.
//!
//! Sample `k` of `n` sits at `fov_min + k * (fov_max - fov_min) / (n - 1)`
//! degrees, with the last sample pinned to exactly `fov_max`:
//!
//! ```text
//! x[k] = range[k] * cos(angle[k])
//! y[k] = range[k] * sin(angle[k])
//! ```
//!
//! Malformed readings are not rejected. NaN and infinite ranges produce
//! non-finite coordinates, which the spatial index keeps out of every
//! candidate set and which never pass the distance test. Negative ranges
//! keep their mirrored coordinates but are marked isolated, so they stay
//! nodes without ever being linked.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{ScanConfig, validate_field_of_view};
use crate::error::{Error, Result};

/// A point in the scan plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Projected scan coordinates in SoA layout, one slot per sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    /// X coordinate per sample.
    pub xs: Vec<f64>,
    /// Y coordinate per sample.
    pub ys: Vec<f64>,
    /// Samples that keep a position but never take part in an edge
    isolated: Vec<bool>,
}

impl Projection {
    /// Build from coordinate buffers of equal length. No sample is isolated.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        let isolated = vec![false; xs.len()];
        Self { xs, ys, isolated }
    }

    /// Build from a list of points.
    pub fn from_points(points: &[Point2D]) -> Self {
        Self::new(
            points.iter().map(|p| p.x).collect(),
            points.iter().map(|p| p.y).collect(),
        )
    }

    /// Mark sample `i` as isolated.
    pub fn isolate(&mut self, i: usize) {
        self.isolated[i] = true;
    }

    /// Whether sample `i` may take part in edges: not isolated and at a
    /// finite position.
    #[inline]
    pub fn is_linkable(&self, i: usize) -> bool {
        !self.isolated[i] && self.point(i).is_finite()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Point for sample `i`.
    #[inline]
    pub fn point(&self, i: usize) -> Point2D {
        Point2D::new(self.xs[i], self.ys[i])
    }

    /// Squared distance between samples `i` and `j`.
    ///
    /// Every edge decision in the crate goes through this one expression, so
    /// the indexed and brute-force paths agree bit for bit. Any NaN operand
    /// yields NaN, which compares false against the threshold.
    #[inline]
    pub fn distance_squared(&self, i: usize, j: usize) -> f64 {
        let dx = self.xs[j] - self.xs[i];
        let dy = self.ys[j] - self.ys[i];
        dx * dx + dy * dy
    }
}

/// Angular layout of a scan plus the no-return policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub fov_min_deg: f64,
    pub fov_max_deg: f64,
    pub no_return_range: Option<f64>,
    pub parallel_threshold: usize,
}

impl Projector {
    /// Projector covering `[fov_min_deg, fov_max_deg]`.
    pub fn new(fov_min_deg: f64, fov_max_deg: f64) -> Self {
        Self {
            fov_min_deg,
            fov_max_deg,
            no_return_range: None,
            parallel_threshold: usize::MAX,
        }
    }

    /// Projector matching a pipeline configuration.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            fov_min_deg: config.fov_min_deg,
            fov_max_deg: config.fov_max_deg,
            no_return_range: config.no_return_range,
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Angle in degrees of sample `k` in a scan of `n` samples.
    #[inline]
    pub fn angle_deg(&self, k: usize, n: usize) -> f64 {
        if n <= 1 {
            return self.fov_min_deg;
        }
        if k == n - 1 {
            return self.fov_max_deg;
        }
        let step = (self.fov_max_deg - self.fov_min_deg) / (n - 1) as f64;
        self.fov_min_deg + k as f64 * step
    }

    /// Project one sample.
    #[inline]
    pub fn project_sample(&self, k: usize, n: usize, range: f64) -> Point2D {
        if let Some(limit) = self.no_return_range
            && range >= limit
        {
            return Point2D::new(f64::NAN, f64::NAN);
        }
        let (sin, cos) = self.angle_deg(k, n).to_radians().sin_cos();
        Point2D::new(range * cos, range * sin)
    }

    /// Project a whole scan.
    pub fn project(&self, ranges: &[f64]) -> Result<Projection> {
        validate_field_of_view(self.fov_min_deg, self.fov_max_deg)?;
        let n = ranges.len();
        if n == 0 {
            return Err(Error::EmptyScan);
        }
        if u32::try_from(n).is_err() {
            return Err(Error::TooManySamples(n));
        }

        #[cfg(feature = "parallel")]
        if n >= self.parallel_threshold {
            let (xs, ys): (Vec<f64>, Vec<f64>) = ranges
                .par_iter()
                .enumerate()
                .map(|(k, &range)| {
                    let p = self.project_sample(k, n, range);
                    (p.x, p.y)
                })
                .unzip();
            return Ok(isolate_negative(Projection::new(xs, ys), ranges));
        }

        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for (k, &range) in ranges.iter().enumerate() {
            let p = self.project_sample(k, n, range);
            xs.push(p.x);
            ys.push(p.y);
        }
        Ok(isolate_negative(Projection::new(xs, ys), ranges))
    }
}

fn isolate_negative(mut projection: Projection, ranges: &[f64]) -> Projection {
    for (k, &range) in ranges.iter().enumerate() {
        if range < 0.0 {
            projection.isolate(k);
        }
    }
    projection
}

/// Project `ranges` across `[fov_min_deg, fov_max_deg]`.
///
/// Fails on an empty scan or an empty/inverted field of view.
pub fn project(ranges: &[f64], fov_min_deg: f64, fov_max_deg: f64) -> Result<Projection> {
    Projector::new(fov_min_deg, fov_max_deg).project(ranges)
}
