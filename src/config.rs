//! Configuration for CSD estimation.

use crate::constants::{AUTO_ESTIMATION_RESOLUTION, AUTO_SOURCE_RESOLUTION};
use crate::error::CsdError;
use crate::estimator::BasisKind;

/// Configuration options for the kernel estimator.
///
/// Every knob has an explicit documented default, so an empty
/// configuration is a fully specified one rather than a request for a
/// hidden heuristic.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Basis source model placed on the source grid (default: Gaussian).
    pub basis: BasisKind,

    /// Basis radius R in mm. `None` resolves to 0.3 times the largest
    /// electrode-span axis.
    pub basis_radius: Option<f64>,

    /// Basis sources per axis (default: Auto).
    pub source_resolution: GridResolution,

    /// Estimation grid points per axis (default: Auto).
    pub estimation_resolution: GridResolution,

    /// Ridge regularization lambda (default: 0.0).
    ///
    /// The solver applies a small relative floor, so zero still yields
    /// an invertible system; cross-validation requires strictly
    /// positive candidates instead.
    pub lambda: f64,

    /// Tissue conductivity sigma (default: 1.0).
    pub sigma: f64,

    /// Source-model half-thickness h in mm (default: 1.0).
    pub h: f64,

    /// Grid extension beyond the electrode hull per axis, in mm
    /// (default: 0.0).
    pub extension: f64,

    /// Simpson points per axis when integrating basis potentials
    /// (default: 33).
    pub quadrature_points: usize,

    /// Boundary parameters, used by `MoIKCSD` only.
    pub moi: MoiParams,
}

/// Per-axis grid point count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridResolution {
    /// Resolve from the dimensionality-specific defaults.
    Auto,
    /// Use exactly N points per axis.
    Fixed(usize),
}

/// Tissue/saline boundary parameters for the method of images.
#[derive(Debug, Clone, Copy)]
pub struct MoiParams {
    /// Conductivity of the saline layer above the slice (default: 5.0).
    pub saline_conductivity: f64,
    /// Number of mirror-image terms summed (default: 20).
    pub images: usize,
}

impl Default for MoiParams {
    fn default() -> Self {
        Self { saline_conductivity: 5.0, images: 20 }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            basis: BasisKind::Gaussian,
            basis_radius: None,
            source_resolution: GridResolution::Auto,
            estimation_resolution: GridResolution::Auto,
            lambda: 0.0,
            sigma: 1.0,
            h: 1.0,
            extension: 0.0,
            quadrature_points: crate::constants::DEFAULT_QUADRATURE_POINTS,
            moi: MoiParams::default(),
        }
    }
}

impl GridResolution {
    fn resolve(&self, auto: &[usize; 3], dimensionality: usize) -> usize {
        match self {
            GridResolution::Auto => auto[dimensionality - 1],
            GridResolution::Fixed(n) => *n,
        }
    }
}

impl EstimatorConfig {
    /// Basis sources per axis for the given dimensionality.
    pub fn resolved_source_resolution(&self, dimensionality: usize) -> usize {
        self.source_resolution.resolve(&AUTO_SOURCE_RESOLUTION, dimensionality)
    }

    /// Estimation grid points per axis for the given dimensionality.
    pub fn resolved_estimation_resolution(&self, dimensionality: usize) -> usize {
        self.estimation_resolution.resolve(&AUTO_ESTIMATION_RESOLUTION, dimensionality)
    }

    /// Reject malformed hyperparameters before any kernel work.
    pub(crate) fn validate(&self) -> Result<(), CsdError> {
        if !(self.lambda.is_finite() && self.lambda >= 0.0) {
            return Err(CsdError::InvalidParameter {
                name: "lambda",
                reason: format!("regularization must be finite and non-negative, got {}", self.lambda),
            });
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(CsdError::InvalidParameter {
                name: "sigma",
                reason: format!("conductivity must be positive and finite, got {}", self.sigma),
            });
        }
        if !(self.h.is_finite() && self.h > 0.0) {
            return Err(CsdError::InvalidParameter {
                name: "h",
                reason: format!("source half-thickness must be positive and finite, got {}", self.h),
            });
        }
        if !(self.extension.is_finite() && self.extension >= 0.0) {
            return Err(CsdError::InvalidParameter {
                name: "extension",
                reason: format!("grid extension must be finite and non-negative, got {}", self.extension),
            });
        }
        if self.quadrature_points < 3 {
            return Err(CsdError::InvalidParameter {
                name: "quadrature_points",
                reason: format!("basis quadrature needs at least 3 points, got {}", self.quadrature_points),
            });
        }
        if let Some(r) = self.basis_radius {
            if !(r.is_finite() && r > 0.0) {
                return Err(CsdError::InvalidParameter {
                    name: "basis_radius",
                    reason: format!("basis radius must be positive and finite, got {}", r),
                });
            }
        }
        if let GridResolution::Fixed(n) = self.source_resolution {
            if n == 0 {
                return Err(CsdError::InvalidParameter {
                    name: "source_resolution",
                    reason: "at least one basis source per axis is required".into(),
                });
            }
        }
        if let GridResolution::Fixed(n) = self.estimation_resolution {
            if n < 2 {
                return Err(CsdError::InvalidParameter {
                    name: "estimation_resolution",
                    reason: format!("estimation grid needs at least 2 points per axis, got {}", n),
                });
            }
        }
        if !(self.moi.saline_conductivity.is_finite() && self.moi.saline_conductivity > 0.0) {
            return Err(CsdError::InvalidParameter {
                name: "saline_conductivity",
                reason: format!(
                    "saline conductivity must be positive and finite, got {}",
                    self.moi.saline_conductivity
                ),
            });
        }
        Ok(())
    }
}
