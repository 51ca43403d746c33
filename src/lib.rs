//! # kcsd
//!
//! Estimate current source density from extracellular potentials.
//!
//! This crate reconstructs the spatial distribution of current sources
//! and sinks in neural tissue from potentials recorded at electrode
//! positions, using kernel methods: basis sources placed on a grid, a
//! regularized linear inverse through a Gram kernel matrix, and
//! optional cross-validated selection of the basis radius and ridge
//! parameter. A paired forward model synthesizes potentials from known
//! analytic source profiles, closing the loop for validation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kcsd::{estimate, ElectrodePosition, ElectrodeSignal, Method};
//!
//! let positions: Vec<ElectrodePosition> =
//!     [0.1, 0.3, 0.5, 0.7, 0.9].iter().map(|&x| ElectrodePosition::millimeters(&[x])).collect();
//! let signals: Vec<ElectrodeSignal> = recorded_millivolts
//!     .into_iter()
//!     .map(|samples| ElectrodeSignal::millivolts(samples, 0.0, 1e-3))
//!     .collect();
//!
//! let result = estimate(Method::Kcsd1d, &positions, &signals)?;
//! println!("{} grid points per time step", result.n_grid_points());
//! ```
//!
//! ## Validating against a known source
//!
//! ```ignore
//! use kcsd::{forward_1d, sources::gauss_1d_dipole, ForwardConfig};
//! use kcsd::numerics::electrode_grid_1d;
//!
//! let ele_x = electrode_grid_1d((0.1, 0.9), 5);
//! let potentials = forward_1d(gauss_1d_dipole, &ele_x, &ForwardConfig::default())?;
//! // Feed the synthesized potentials back through `estimate` and
//! // compare the reconstruction with the true dipole.
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod dispatch;
mod error;
mod result;
mod types;
mod units;

// Functional modules
pub mod estimator;
pub mod forward;
pub mod numerics;
pub mod sources;

// Re-exports for public API
pub use config::{EstimatorConfig, GridResolution, MoiParams};
pub use dispatch::CsdAnalysis;
pub use error::{CsdError, ErrorKind};
pub use estimator::{BasisKind, CrossValidationSpec, CvSelection, GridAxes, KcsdEstimator};
pub use forward::{forward_1d, forward_2d, forward_3d, ForwardConfig};
pub use result::{EstimationResult, Metadata};
pub use types::{
    ElectrodePosition, ElectrodeSignal, Method, AVAILABLE_1D, AVAILABLE_2D, AVAILABLE_3D,
};
pub use units::{LengthUnit, PotentialUnit};

/// Convenience function for estimation with default configuration.
///
/// Runs the full pipeline: validates the channel-aligned `positions`
/// and `signals`, builds the kernel estimator for `method`, and returns
/// the estimated CSD with its grid axes. Use [`CsdAnalysis`] when you
/// need to adjust hyperparameters or request cross-validation.
pub fn estimate(
    method: Method,
    positions: &[ElectrodePosition],
    signals: &[ElectrodeSignal],
) -> Result<EstimationResult, CsdError> {
    CsdAnalysis::new(method).estimate(positions, signals)
}
