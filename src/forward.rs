//! Forward model: potentials generated by a known source distribution.
//!
//! Given an analytic source-density profile and electrode positions,
//! these integrators evaluate the Poisson-kernel integral over a
//! bounded charge grid with composite Simpson quadrature, one potential
//! per electrode. Dimensionality is explicit in the function name, so a
//! caller can never fall into the 2D path by passing an empty z array.

use crate::error::CsdError;
use crate::numerics::{linspace, simpson_uniform};
use crate::numerics::{line_kernel, plane_kernel, volume_kernel};

use std::f64::consts::PI;

/// Integration domain and medium parameters for the forward model.
#[derive(Debug, Clone)]
pub struct ForwardConfig {
    /// Charge-grid range along x, in mm (default `(0, 1)`).
    pub x_bounds: (f64, f64),
    /// Charge-grid range along y, ignored in 1D (default `(0, 1)`).
    pub y_bounds: (f64, f64),
    /// Charge-grid range along z, ignored below 3D (default `(0, 1)`).
    pub z_bounds: (f64, f64),
    /// Charge-grid points per axis (default 50).
    pub resolution: usize,
    /// Tissue conductivity (default 1.0).
    pub sigma: f64,
    /// Source half-separation of the laminar/planar model (default 50).
    pub h: f64,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            x_bounds: (0.0, 1.0),
            y_bounds: (0.0, 1.0),
            z_bounds: (0.0, 1.0),
            resolution: 50,
            sigma: 1.0,
            h: 50.0,
        }
    }
}

impl ForwardConfig {
    fn validate(&self, dimensionality: usize) -> Result<(), CsdError> {
        if self.resolution < 3 {
            return Err(CsdError::InvalidParameter {
                name: "resolution",
                reason: format!("integration needs at least 3 grid points, got {}", self.resolution),
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
                reason: format!("source half-separation must be positive and finite, got {}", self.h),
            });
        }
        let bounds: [(&'static str, (f64, f64)); 3] =
            [("x_bounds", self.x_bounds), ("y_bounds", self.y_bounds), ("z_bounds", self.z_bounds)];
        for &(name, (lo, hi)) in bounds.iter().take(dimensionality) {
            if !(lo.is_finite() && hi.is_finite() && hi > lo) {
                return Err(CsdError::InvalidParameter {
                    name,
                    reason: format!("bounds must be finite with start < end, got ({}, {})", lo, hi),
                });
            }
        }
        Ok(())
    }
}

fn check_electrode_arrays(lengths: &[usize]) -> Result<(), CsdError> {
    let first = lengths[0];
    if first == 0 {
        return Err(CsdError::InvalidParameter {
            name: "electrodes",
            reason: "at least one electrode position is required".into(),
        });
    }
    if lengths.iter().any(|&l| l != first) {
        return Err(CsdError::InvalidParameter {
            name: "electrodes",
            reason: format!("coordinate arrays differ in length: {:?}", lengths),
        });
    }
    Ok(())
}

/// Potentials of a 1D source profile at laminar electrode positions.
///
/// Integrates `csd(x') * (sqrt((x'-x0)^2 + h^2) - |x'-x0|)` over the
/// charge grid and scales by `1/(2*sigma)`.
pub fn forward_1d<F>(profile: F, ele_x: &[f64], config: &ForwardConfig) -> Result<Vec<f64>, CsdError>
where
    F: Fn(f64) -> f64,
{
    config.validate(1)?;
    check_electrode_arrays(&[ele_x.len()])?;

    let xs = linspace(config.x_bounds.0, config.x_bounds.1, config.resolution);
    let dx = xs[1] - xs[0];
    let csd: Vec<f64> = xs.iter().map(|&x| profile(x)).collect();

    let mut integrand = vec![0.0; xs.len()];
    let pots = ele_x
        .iter()
        .map(|&x0| {
            for (i, &x) in xs.iter().enumerate() {
                integrand[i] = csd[i] * line_kernel(x - x0, config.h);
            }
            simpson_uniform(&integrand, dx) / (2.0 * config.sigma)
        })
        .collect();
    Ok(pots)
}

/// Potentials of a 2D source profile at planar electrode positions.
///
/// Integrates `csd(x', y') * asinh(2h / r)` over the charge grid with
/// the distance floored at 1e-7, and scales by `1/(2*pi*sigma)`.
pub fn forward_2d<F>(
    profile: F,
    ele_x: &[f64],
    ele_y: &[f64],
    config: &ForwardConfig,
) -> Result<Vec<f64>, CsdError>
where
    F: Fn(f64, f64) -> f64,
{
    config.validate(2)?;
    check_electrode_arrays(&[ele_x.len(), ele_y.len()])?;

    let n = config.resolution;
    let xs = linspace(config.x_bounds.0, config.x_bounds.1, n);
    let ys = linspace(config.y_bounds.0, config.y_bounds.1, n);
    let dx = xs[1] - xs[0];
    let dy = ys[1] - ys[0];

    // Profile sampled once; the kernel varies per electrode.
    let mut csd = Vec::with_capacity(n * n);
    for &x in &xs {
        for &y in &ys {
            csd.push(profile(x, y));
        }
    }

    let mut inner = vec![0.0; n];
    let mut row = vec![0.0; n];
    let mut pots = Vec::with_capacity(ele_x.len());
    for (&x0, &y0) in ele_x.iter().zip(ele_y) {
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                let r = ((x - x0).powi(2) + (y - y0).powi(2)).sqrt();
                row[j] = csd[i * n + j] * plane_kernel(r, config.h);
            }
            inner[i] = simpson_uniform(&row, dy);
        }
        pots.push(simpson_uniform(&inner, dx) / (2.0 * PI * config.sigma));
    }
    Ok(pots)
}

/// Potentials of a 3D source profile at volumetric electrode positions.
///
/// Integrates `csd(x', y', z') / r` over the charge grid with the
/// distance floored at 1e-7, and scales by `1/(4*pi*sigma)`.
pub fn forward_3d<F>(
    profile: F,
    ele_x: &[f64],
    ele_y: &[f64],
    ele_z: &[f64],
    config: &ForwardConfig,
) -> Result<Vec<f64>, CsdError>
where
    F: Fn(f64, f64, f64) -> f64,
{
    config.validate(3)?;
    check_electrode_arrays(&[ele_x.len(), ele_y.len(), ele_z.len()])?;

    let n = config.resolution;
    let xs = linspace(config.x_bounds.0, config.x_bounds.1, n);
    let ys = linspace(config.y_bounds.0, config.y_bounds.1, n);
    let zs = linspace(config.z_bounds.0, config.z_bounds.1, n);
    let dx = xs[1] - xs[0];
    let dy = ys[1] - ys[0];
    let dz = zs[1] - zs[0];

    let mut csd = Vec::with_capacity(n * n * n);
    for &x in &xs {
        for &y in &ys {
            for &z in &zs {
                csd.push(profile(x, y, z));
            }
        }
    }

    let mut inner_y = vec![0.0; n];
    let mut inner_z = vec![0.0; n];
    let mut outer = vec![0.0; n];
    let mut pots = Vec::with_capacity(ele_x.len());
    for ((&x0, &y0), &z0) in ele_x.iter().zip(ele_y).zip(ele_z) {
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                for (k, &z) in zs.iter().enumerate() {
                    let r = ((x - x0).powi(2) + (y - y0).powi(2) + (z - z0).powi(2)).sqrt();
                    inner_z[k] = csd[(i * n + j) * n + k] * volume_kernel(r);
                }
                inner_y[j] = simpson_uniform(&inner_z, dz);
            }
            outer[i] = simpson_uniform(&inner_y, dy);
        }
        pots.push(simpson_uniform(&outer, dx) / (4.0 * PI * config.sigma));
    }
    Ok(pots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::electrode_grid_1d;
    use crate::sources::{gauss_1d_dipole, gauss_3d_dipole, large_source_2d};

    #[test]
    fn dipole_1d_potentials_are_antisymmetric() {
        let ele = electrode_grid_1d((0.1, 0.9), 5);
        let pots = forward_1d(gauss_1d_dipole, &ele, &ForwardConfig::default()).unwrap();
        assert_eq!(pots.len(), 5);
        assert!(pots.iter().all(|p| p.is_finite()));
        // Source at 0.7, sink at 0.3: outer electrodes see opposite signs.
        assert!(pots[4] > 0.0);
        assert!(pots[0] < 0.0);
        assert!((pots[0] + pots[4]).abs() < 1e-3);
    }

    #[test]
    fn electrode_on_charge_grid_node_is_finite_2d() {
        // (0.5, 0.5) lies exactly on the 3x3 charge grid.
        let config = ForwardConfig { resolution: 3, ..ForwardConfig::default() };
        let pots = forward_2d(large_source_2d, &[0.5], &[0.5], &config).unwrap();
        assert!(pots[0].is_finite());
    }

    #[test]
    fn electrode_on_charge_grid_node_is_finite_3d() {
        let config = ForwardConfig { resolution: 3, ..ForwardConfig::default() };
        let pots = forward_3d(gauss_3d_dipole, &[0.5], &[0.5], &[0.5], &config).unwrap();
        assert!(pots[0].is_finite());
    }

    #[test]
    fn mismatched_coordinate_arrays_are_rejected() {
        let err = forward_2d(large_source_2d, &[0.1, 0.2], &[0.1], &ForwardConfig::default())
            .unwrap_err();
        assert!(matches!(err, CsdError::InvalidParameter { name: "electrodes", .. }));
    }

    #[test]
    fn degenerate_resolution_is_rejected() {
        let config = ForwardConfig { resolution: 2, ..ForwardConfig::default() };
        let err = forward_1d(gauss_1d_dipole, &[0.5], &config).unwrap_err();
        assert!(matches!(err, CsdError::InvalidParameter { name: "resolution", .. }));
    }
}
