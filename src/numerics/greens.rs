//! Poisson-kernel terms relating a point of source density to the
//! potential it contributes at an electrode.
//!
//! The same terms drive both sides of the pipeline: the forward model
//! integrates an arbitrary profile against them, and the estimator
//! integrates basis sources against them when assembling kernels. The
//! 2D and 3D terms are singular at zero distance, so distances are
//! floored before any reciprocal or `asinh`.

use crate::constants::DISTANCE_FLOOR;

/// 1D term for a laminar geometry with source half-thickness `h`:
/// `sqrt(dx^2 + h^2) - |dx|`. Finite everywhere, no floor needed.
pub fn line_kernel(dx: f64, h: f64) -> f64 {
    (dx * dx + h * h).sqrt() - dx.abs()
}

/// 2D term for a planar slice of thickness `2h`: `asinh(2h / r)`.
pub fn plane_kernel(r: f64, h: f64) -> f64 {
    (2.0 * h / r.max(DISTANCE_FLOOR)).asinh()
}

/// 2D term with the method-of-images boundary correction.
///
/// Models a conductivity step at the slice surface (tissue `sigma`
/// below, saline `sigma_saline` above) by summing mirror sources at
/// offsets `2nh` with weights `w_ts^n`, where
/// `w_ts = (sigma - sigma_saline) / (sigma + sigma_saline)`. Each image
/// pair contributes symmetrically, hence the factor 2.
pub fn plane_kernel_moi(r: f64, h: f64, w_ts: f64, images: usize) -> f64 {
    let r = r.max(DISTANCE_FLOOR);
    let mut term = (2.0 * h / r).asinh();
    let mut weight = 1.0;
    for n in 1..=images {
        weight *= w_ts;
        let offset = 2.0 * n as f64 * h;
        term += 2.0 * weight * (2.0 * h / (r * r + offset * offset).sqrt()).asinh();
    }
    term
}

/// 3D free-medium term: `1 / r`.
pub fn volume_kernel(r: f64) -> f64 {
    1.0 / r.max(DISTANCE_FLOOR)
}
