//! Shared numeric infrastructure for forward modelling and kernel
//! construction.
//!
//! - Composite Simpson quadrature over uniform grids
//! - Poisson-kernel terms with singularity protection
//! - Coordinate grid generation (electrode layouts, estimation grids)

pub mod greens;
pub mod grid;
pub mod quadrature;

pub use greens::{line_kernel, plane_kernel, plane_kernel_moi, volume_kernel};
pub use grid::{electrode_grid_1d, electrode_grid_2d, electrode_grid_3d, linspace};
pub use quadrature::simpson_uniform;
