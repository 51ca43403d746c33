//! Basis source models placed on the source grid.

use std::f64::consts::PI;

use crate::constants::GAUSSIAN_RADIUS_FRACTION;

/// Shape of the elementary source used to span the CSD space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisKind {
    /// Gaussian bump with standard deviation R/3, effectively supported
    /// within the basis radius.
    Gaussian,
    /// Uniform density inside the basis radius, zero outside.
    Step,
}

impl BasisKind {
    /// Source density at `distance` from the basis centre, normalized
    /// to unit total current in the given dimensionality.
    pub fn evaluate(&self, distance: f64, radius: f64, dimensionality: usize) -> f64 {
        match self {
            BasisKind::Gaussian => {
                let s = radius * GAUSSIAN_RADIUS_FRACTION;
                let norm = match dimensionality {
                    1 => (2.0 * PI).sqrt() * s,
                    2 => 2.0 * PI * s * s,
                    _ => (2.0 * PI).powf(1.5) * s * s * s,
                };
                (-(distance * distance) / (2.0 * s * s)).exp() / norm
            }
            BasisKind::Step => {
                if distance > radius {
                    return 0.0;
                }
                match dimensionality {
                    1 => 0.5 / radius,
                    2 => 1.0 / (PI * radius * radius),
                    _ => 3.0 / (4.0 * PI * radius * radius * radius),
                }
            }
        }
    }
}
