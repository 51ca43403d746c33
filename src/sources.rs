//! Closed-form source density profiles for validating the estimator.
//!
//! Each profile is a plain function over spatial coordinates (in the
//! internal millimetre frame) and plugs directly into the forward-model
//! integrators, which synthesize the potentials those sources would
//! produce at a set of electrodes.

use std::f64::consts::PI;

/// 1D dipole: a Gaussian source centred at 0.7 and a matching sink at
/// 0.3, both with variance 0.3.
pub fn gauss_1d_dipole(x: f64) -> f64 {
    let norm = (2.0 * PI * 0.3_f64).sqrt().recip();
    let src = 0.5 * (-(x - 0.7).powi(2) / (2.0 * 0.3)).exp() * norm;
    let snk = -0.5 * (-(x - 0.3).powi(2) / (2.0 * 0.3)).exp() * norm;
    src + snk
}

/// 2D profile of four broad Gaussian sources and sinks.
pub fn large_source_2d(x: f64, y: f64) -> f64 {
    let f1 = 0.5965 * ((-1.0 * (x - 0.1350).powi(2) - (y - 0.8628).powi(2)) / 0.4464).exp();
    let f2 = -0.9269 * ((-2.0 * (x - 0.1848).powi(2) - (y - 0.0897).powi(2)) / 0.2046).exp();
    let f3 = 0.5910 * ((-3.0 * (x - 1.3189).powi(2) - (y - 0.3522).powi(2)) / 0.2129).exp();
    let f4 = -0.1963 * ((-4.0 * (x - 1.3386).powi(2) - (y - 0.5297).powi(2)) / 0.2507).exp();
    f1 + f2 + f3 + f4
}

/// 2D profile of four narrow Gaussian sources and sinks arranged as two
/// close dipole pairs.
pub fn small_source_2d(x: f64, y: f64) -> f64 {
    fn gauss2d(x: f64, y: f64, p: [f64; 6]) -> f64 {
        let rcen_x = p[0] * p[5].cos() - p[1] * p[5].sin();
        let rcen_y = p[0] * p[5].sin() + p[1] * p[5].cos();
        let xp = x * p[5].cos() - y * p[5].sin();
        let yp = x * p[5].sin() + y * p[5].cos();
        p[4] * (-(((rcen_x - xp) / p[2]).powi(2) + ((rcen_y - yp) / p[3]).powi(2)) / 2.0).exp()
    }
    gauss2d(x, y, [0.3, 0.7, 0.038, 0.058, 0.5, 0.0])
        + gauss2d(x, y, [0.3, 0.6, 0.038, 0.058, -0.5, 0.0])
        + gauss2d(x, y, [0.45, 0.7, 0.038, 0.058, 0.5, 0.0])
        + gauss2d(x, y, [0.45, 0.6, 0.038, 0.058, -0.5, 0.0])
}

/// 3D dipole: a Gaussian source at (0.3, 0.7, 0.3) and sink at
/// (0.6, 0.5, 0.7), both with variance 0.023.
pub fn gauss_3d_dipole(x: f64, y: f64, z: f64) -> f64 {
    let (x0, y0, z0) = (0.3, 0.7, 0.3);
    let (x1, y1, z1) = (0.6, 0.5, 0.7);
    let sig_2 = 0.023;
    let a = (2.0 * PI * sig_2).recip();
    let f1 = a * ((-(x - x0).powi(2) - (y - y0).powi(2) - (z - z0).powi(2)) / (2.0 * sig_2)).exp();
    let f2 = -a * ((-(x - x1).powi(2) - (y - y1).powi(2) - (z - z1).powi(2)) / (2.0 * sig_2)).exp();
    f1 + f2
}
