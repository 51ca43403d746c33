//! Estimation result types and related structures.

use serde::{Deserialize, Serialize};

use crate::estimator::CvSelection;
use crate::types::Method;

/// Complete result from a CSD estimation.
///
/// The estimate is stored flattened in row-major `[time, x, (y), (z)]`
/// order; `shape` gives the axis lengths and the coordinate arrays give
/// the physical position of every spatial grid index. Values are in
/// µA/mm^dim for potentials supplied in mV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Estimated CSD, flattened with the time axis leading.
    pub values: Vec<f64>,

    /// Axis lengths: `[n_time, n_x, (n_y), (n_z)]`.
    pub shape: Vec<usize>,

    /// Grid positions along x, in mm.
    pub x: Vec<f64>,

    /// Grid positions along y, in mm (2D and 3D methods).
    pub y: Option<Vec<f64>>,

    /// Grid positions along z, in mm (3D methods).
    pub z: Option<Vec<f64>>,

    /// Start time of the first sample, in seconds, carried through
    /// unchanged from the input signals.
    pub t_start: f64,

    /// Sampling period, in seconds, carried through unchanged.
    pub sampling_period: f64,

    /// Estimation parameters for debugging and reporting.
    pub metadata: Metadata,
}

/// Parameters the estimate was produced with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Method that produced the estimate.
    pub method: Method,

    /// Basis radius used, in mm.
    pub radius: f64,

    /// Regularization used.
    pub lambda: f64,

    /// Number of electrodes the estimate was computed from.
    pub n_electrodes: usize,

    /// Number of basis sources spanning the CSD space.
    pub n_sources: usize,

    /// Cross-validation outcome, when a search was requested.
    pub cross_validation: Option<CvSelection>,
}

impl EstimationResult {
    /// Number of time samples.
    pub fn n_times(&self) -> usize {
        self.shape[0]
    }

    /// Number of spatial grid points per time sample.
    pub fn n_grid_points(&self) -> usize {
        self.shape[1..].iter().product()
    }

    /// The spatial estimate at time index `t`, flattened in
    /// `[x, (y), (z)]` order with the last axis fastest.
    ///
    /// # Panics
    ///
    /// Panics if `t` is out of range.
    pub fn time_slice(&self, t: usize) -> &[f64] {
        let grid = self.n_grid_points();
        assert!(t < self.n_times(), "time index {} out of range", t);
        &self.values[t * grid..(t + 1) * grid]
    }

    /// The estimate at time index `t` and spatial grid index
    /// `[ix, (iy), (iz)]`.
    ///
    /// # Panics
    ///
    /// Panics if the index rank or any index is out of range.
    pub fn at(&self, t: usize, spatial: &[usize]) -> f64 {
        let dims = &self.shape[1..];
        assert_eq!(spatial.len(), dims.len(), "spatial index rank mismatch");
        let mut offset = 0;
        for (&index, &len) in spatial.iter().zip(dims) {
            assert!(index < len, "spatial index {} out of range for axis of length {}", index, len);
            offset = offset * len + index;
        }
        self.time_slice(t)[offset]
    }
}
