//! Coordinate grid generation.
//!
//! Regularly spaced electrode layouts for forward-model validation and
//! the flattening convention shared with the estimation grid: the x
//! axis varies slowest, z fastest.

/// `n` evenly spaced values covering `[start, stop]` inclusive.
///
/// # Panics
///
/// Panics if `n` is zero.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    assert!(n > 0, "linspace needs at least one point");
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Regularly spaced 1D electrode layout.
pub fn electrode_grid_1d(x_bounds: (f64, f64), n: usize) -> Vec<f64> {
    linspace(x_bounds.0, x_bounds.1, n)
}

/// Regularly spaced 2D electrode layout, flattened with x slowest.
///
/// Returns `(x, y)` arrays of length `n * n`, channel-aligned.
pub fn electrode_grid_2d(x_bounds: (f64, f64), y_bounds: (f64, f64), n: usize) -> (Vec<f64>, Vec<f64>) {
    let xs = linspace(x_bounds.0, x_bounds.1, n);
    let ys = linspace(y_bounds.0, y_bounds.1, n);
    let mut ele_x = Vec::with_capacity(n * n);
    let mut ele_y = Vec::with_capacity(n * n);
    for &x in &xs {
        for &y in &ys {
            ele_x.push(x);
            ele_y.push(y);
        }
    }
    (ele_x, ele_y)
}

/// Regularly spaced 3D electrode layout, flattened with x slowest and z
/// fastest.
///
/// Returns `(x, y, z)` arrays of length `n^3`, channel-aligned.
pub fn electrode_grid_3d(
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
    z_bounds: (f64, f64),
    n: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let xs = linspace(x_bounds.0, x_bounds.1, n);
    let ys = linspace(y_bounds.0, y_bounds.1, n);
    let zs = linspace(z_bounds.0, z_bounds.1, n);
    let mut ele_x = Vec::with_capacity(n * n * n);
    let mut ele_y = Vec::with_capacity(n * n * n);
    let mut ele_z = Vec::with_capacity(n * n * n);
    for &x in &xs {
        for &y in &ys {
            for &z in &zs {
                ele_x.push(x);
                ele_y.push(y);
                ele_z.push(z);
            }
        }
    }
    (ele_x, ele_y, ele_z)
}
