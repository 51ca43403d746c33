//! Kernel CSD estimation.
//!
//! The estimator places basis sources on a regular grid spanning the
//! electrode hull, computes the potential each basis source would
//! produce at each electrode (the same physics the forward model
//! integrates, evaluated per basis), and solves the regularized Gram
//! system to map measured potentials onto source strengths at the
//! estimation grid:
//!
//! `csd = K_cross * (K + lambda * I)^-1 * potentials`
//!
//! This module is the numeric core: it consumes plain matrices in the
//! internal mm/mV frame. Unit handling and input validation live in the
//! dispatch layer.

mod basis;
mod cv;
mod kernel;

pub use basis::BasisKind;
pub use cv::{CrossValidationSpec, CvSelection};

use nalgebra::DMatrix;

use crate::config::EstimatorConfig;
use crate::constants::{DEFAULT_RADIUS_FRACTION, DISTANCE_FLOOR};
use crate::error::CsdError;
use crate::numerics::{line_kernel, linspace, plane_kernel, plane_kernel_moi, simpson_uniform};
use crate::types::Method;

use kernel::{gram_kernels, solve_regularized};

use std::f64::consts::PI;

/// Coordinate axes of the estimation grid, in mm.
#[derive(Debug, Clone)]
pub struct GridAxes {
    /// Grid positions along x.
    pub x: Vec<f64>,
    /// Grid positions along y (2D and 3D methods).
    pub y: Option<Vec<f64>>,
    /// Grid positions along z (3D methods).
    pub z: Option<Vec<f64>>,
}

impl GridAxes {
    /// Total number of grid points (product of axis lengths).
    pub fn len(&self) -> usize {
        self.x.len()
            * self.y.as_ref().map_or(1, Vec::len)
            * self.z.as_ref().map_or(1, Vec::len)
    }

    /// Whether the grid holds no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Axis lengths in `[x, (y), (z)]` order.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = vec![self.x.len()];
        if let Some(y) = &self.y {
            shape.push(y.len());
        }
        if let Some(z) = &self.z {
            shape.push(z.len());
        }
        shape
    }
}

/// Kernel CSD estimator over a fixed electrode geometry.
#[derive(Debug, Clone)]
pub struct KcsdEstimator {
    method: Method,
    config: EstimatorConfig,
    electrodes: Vec<[f64; 3]>,
    sources: Vec<[f64; 3]>,
    grid_points: Vec<[f64; 3]>,
    axes: GridAxes,
    default_radius: f64,
}

fn euclidean(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Cartesian product of per-axis positions, x varying slowest, padded
/// to three components.
fn product_grid(axes: &[Vec<f64>]) -> Vec<[f64; 3]> {
    let mut points = vec![[0.0; 3]];
    for (axis_index, axis) in axes.iter().enumerate() {
        let mut next = Vec::with_capacity(points.len() * axis.len());
        for point in &points {
            for &value in axis {
                let mut p = *point;
                p[axis_index] = value;
                next.push(p);
            }
        }
        points = next;
    }
    points
}

impl KcsdEstimator {
    /// Build an estimator for electrodes given as an `n_ele x dim`
    /// coordinate matrix in mm.
    ///
    /// Rejects malformed hyperparameters, a method/dimensionality
    /// mismatch, and degenerate geometries before any kernel work.
    pub fn new(
        method: Method,
        coordinates: &DMatrix<f64>,
        config: EstimatorConfig,
    ) -> Result<Self, CsdError> {
        config.validate()?;

        let dim = coordinates.ncols();
        if dim != method.dimensionality() {
            return Err(CsdError::IncompatibleMethod {
                method,
                dimensionality: dim,
                available: Method::available_for(dim),
            });
        }
        let n_ele = coordinates.nrows();
        if n_ele == 0 {
            return Err(CsdError::InvalidParameter {
                name: "electrodes",
                reason: "at least one electrode position is required".into(),
            });
        }

        let mut electrodes = Vec::with_capacity(n_ele);
        for i in 0..n_ele {
            let mut p = [0.0; 3];
            for j in 0..dim {
                p[j] = coordinates[(i, j)];
            }
            electrodes.push(p);
        }

        // Per-axis extent of the electrode hull, padded by `extension`.
        let mut spans = Vec::with_capacity(dim);
        for j in 0..dim {
            let column = coordinates.column(j);
            let min = column.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = column.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            spans.push((min - config.extension, max + config.extension));
        }
        let largest_span = spans.iter().map(|(lo, hi)| hi - lo).fold(0.0, f64::max);
        if largest_span <= 0.0 && config.basis_radius.is_none() {
            return Err(CsdError::InvalidParameter {
                name: "electrodes",
                reason: "electrode positions span zero extent, set basis_radius explicitly".into(),
            });
        }
        let default_radius =
            config.basis_radius.unwrap_or(DEFAULT_RADIUS_FRACTION * largest_span);

        let n_src = config.resolved_source_resolution(dim);
        let n_est = config.resolved_estimation_resolution(dim);
        let src_axes: Vec<Vec<f64>> =
            spans.iter().map(|&(lo, hi)| linspace(lo, hi, n_src)).collect();
        let est_axes: Vec<Vec<f64>> =
            spans.iter().map(|&(lo, hi)| linspace(lo, hi, n_est)).collect();

        let sources = product_grid(&src_axes);
        let grid_points = product_grid(&est_axes);
        let axes = GridAxes {
            x: est_axes[0].clone(),
            y: est_axes.get(1).cloned(),
            z: est_axes.get(2).cloned(),
        };

        Ok(Self { method, config, electrodes, sources, grid_points, axes, default_radius })
    }

    /// The method this estimator was built for.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Coordinate axes of the estimation grid.
    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    /// Basis radius used when no explicit candidate is given.
    pub fn default_radius(&self) -> f64 {
        self.default_radius
    }

    /// Number of basis sources.
    pub fn n_sources(&self) -> usize {
        self.sources.len()
    }

    /// Number of electrodes.
    pub fn n_electrodes(&self) -> usize {
        self.electrodes.len()
    }

    /// Estimate the CSD on the grid from an `n_ele x n_t` potential
    /// matrix, returning an `n_grid x n_t` matrix.
    ///
    /// `radius` and `lambda` default to the resolved basis radius and
    /// the configured regularization when `None` (the values chosen by
    /// cross-validation are passed here by the dispatch layer).
    pub fn estimate(
        &self,
        potentials: &DMatrix<f64>,
        radius: Option<f64>,
        lambda: Option<f64>,
    ) -> Result<DMatrix<f64>, CsdError> {
        if potentials.nrows() != self.electrodes.len() {
            return Err(CsdError::ChannelCountMismatch {
                electrodes: self.electrodes.len(),
                signals: potentials.nrows(),
            });
        }
        let radius = radius.unwrap_or(self.default_radius);
        let lambda = lambda.unwrap_or(self.config.lambda);

        let b_pot = self.build_b_pot(radius);
        let b_src = self.build_b_src(radius);
        let kernels = gram_kernels(&b_pot, &b_src);
        let beta = solve_regularized(&kernels.k_pot, lambda, potentials)?;
        Ok(kernels.k_cross * beta)
    }

    /// Potential matrix of every basis source at every electrode,
    /// `n_src x n_ele`.
    pub(crate) fn build_b_pot(&self, radius: f64) -> DMatrix<f64> {
        DMatrix::from_fn(self.sources.len(), self.electrodes.len(), |s, e| {
            self.basis_potential(self.sources[s], self.electrodes[e], radius)
        })
    }

    /// Basis density evaluated at every estimation grid point,
    /// `n_src x n_est`.
    pub(crate) fn build_b_src(&self, radius: f64) -> DMatrix<f64> {
        let dim = self.method.dimensionality();
        DMatrix::from_fn(self.sources.len(), self.grid_points.len(), |s, g| {
            self.config.basis.evaluate(euclidean(self.sources[s], self.grid_points[g]), radius, dim)
        })
    }

    /// Potential a unit basis source centred at `source` produces at
    /// `electrode`, by quadrature against the method's Poisson kernel.
    fn basis_potential(&self, source: [f64; 3], electrode: [f64; 3], radius: f64) -> f64 {
        match self.method {
            Method::Kcsd1d => self.basis_potential_1d(source[0], electrode[0], radius),
            Method::Kcsd2d => self.basis_potential_2d(source, electrode, radius, None),
            Method::MoiKcsd => {
                let moi = self.config.moi;
                let w_ts = (self.config.sigma - moi.saline_conductivity)
                    / (self.config.sigma + moi.saline_conductivity);
                self.basis_potential_2d(source, electrode, radius, Some((w_ts, moi.images)))
            }
            Method::Kcsd3d => {
                self.basis_potential_3d(euclidean(source, electrode), radius)
            }
        }
    }

    fn basis_potential_1d(&self, centre: f64, electrode: f64, radius: f64) -> f64 {
        let q = self.config.quadrature_points;
        let xs = linspace(centre - radius, centre + radius, q);
        let dx = xs[1] - xs[0];
        let values: Vec<f64> = xs
            .iter()
            .map(|&x| {
                self.config.basis.evaluate((x - centre).abs(), radius, 1)
                    * line_kernel(x - electrode, self.config.h)
            })
            .collect();
        simpson_uniform(&values, dx) / (2.0 * self.config.sigma)
    }

    fn basis_potential_2d(
        &self,
        source: [f64; 3],
        electrode: [f64; 3],
        radius: f64,
        moi: Option<(f64, usize)>,
    ) -> f64 {
        let q = self.config.quadrature_points;
        let h = self.config.h;
        let xs = linspace(source[0] - radius, source[0] + radius, q);
        let ys = linspace(source[1] - radius, source[1] + radius, q);
        let dx = xs[1] - xs[0];
        let dy = ys[1] - ys[0];

        let mut row = vec![0.0; q];
        let mut inner = vec![0.0; q];
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                let from_centre =
                    ((x - source[0]).powi(2) + (y - source[1]).powi(2)).sqrt();
                let to_electrode =
                    ((x - electrode[0]).powi(2) + (y - electrode[1]).powi(2)).sqrt();
                let kernel = match moi {
                    Some((w_ts, images)) => plane_kernel_moi(to_electrode, h, w_ts, images),
                    None => plane_kernel(to_electrode, h),
                };
                row[j] = self.config.basis.evaluate(from_centre, radius, 2) * kernel;
            }
            inner[i] = simpson_uniform(&row, dy);
        }
        simpson_uniform(&inner, dx) / (2.0 * PI * self.config.sigma)
    }

    /// Spherically symmetric bases reduce the volume integral to radial
    /// shells: `phi(d) = [ (1/d) * int_0^min(d,R) f r^2 dr
    /// + int_min(d,R)^R f r dr ] / sigma`.
    fn basis_potential_3d(&self, distance: f64, radius: f64) -> f64 {
        let q = self.config.quadrature_points;
        let d = distance.max(DISTANCE_FLOOR);
        let split = d.min(radius);

        let near = {
            let rs = linspace(0.0, split, q);
            let values: Vec<f64> = rs
                .iter()
                .map(|&r| self.config.basis.evaluate(r, radius, 3) * r * r)
                .collect();
            simpson_uniform(&values, rs[1] - rs[0]) / d
        };

        let far = if split < radius {
            let rs = linspace(split, radius, q);
            let values: Vec<f64> =
                rs.iter().map(|&r| self.config.basis.evaluate(r, radius, 3) * r).collect();
            simpson_uniform(&values, rs[1] - rs[0])
        } else {
            0.0
        };

        (near + far) / self.config.sigma
    }
}
