//! Numeric constants shared across the estimation pipeline.

/// Floor applied to source-electrode distances before evaluating the
/// singular 2D/3D Poisson kernels. Matches the spacing at which the
/// integrands are no longer resolvable on realistic charge grids.
pub const DISTANCE_FLOOR: f64 = 1e-7;

/// Relative ridge floor: the effective regularization used by the solver
/// is `max(lambda, LAMBDA_FLOOR * trace(K) / n)`, so the kernel system
/// stays invertible even when the caller leaves `lambda` at zero.
pub const LAMBDA_FLOOR: f64 = 1e-10;

/// Default regularization candidates for cross-validation when the
/// caller supplies only `Rs`. Logarithmic sweep, strictly positive.
pub const DEFAULT_LAMBDA_GRID: [f64; 11] = [
    1e-12, 1e-11, 1e-10, 1e-9, 1e-8, 1e-7, 1e-6, 1e-5, 1e-4, 1e-3, 1e-2,
];

/// Basis radius as a fraction of the largest electrode-span axis, used
/// when the caller does not fix the radius explicitly.
pub const DEFAULT_RADIUS_FRACTION: f64 = 0.3;

/// Gaussian basis standard deviation as a fraction of the basis radius.
/// Three standard deviations fit inside the integration support.
pub const GAUSSIAN_RADIUS_FRACTION: f64 = 1.0 / 3.0;

/// Simpson points per axis for basis-potential quadrature.
pub const DEFAULT_QUADRATURE_POINTS: usize = 33;

/// Per-axis basis-source counts resolved from `GridResolution::Auto`,
/// indexed by dimensionality - 1.
pub const AUTO_SOURCE_RESOLUTION: [usize; 3] = [128, 12, 5];

/// Per-axis estimation-grid counts resolved from `GridResolution::Auto`,
/// indexed by dimensionality - 1.
pub const AUTO_ESTIMATION_RESOLUTION: [usize; 3] = [100, 32, 16];
