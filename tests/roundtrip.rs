//! Forward-model potentials fed back through the estimator must
//! recover the generating source structure.

use kcsd::numerics::{electrode_grid_1d, electrode_grid_2d, electrode_grid_3d};
use kcsd::sources::{gauss_1d_dipole, gauss_3d_dipole, large_source_2d};
use kcsd::{
    forward_1d, forward_2d, forward_3d, CrossValidationSpec, CsdAnalysis, ElectrodePosition,
    ElectrodeSignal, EstimatorConfig, ForwardConfig, GridResolution, Method,
};

fn nearest(axis: &[f64], target: f64) -> usize {
    let mut best = 0;
    for (i, &v) in axis.iter().enumerate() {
        if (v - target).abs() < (axis[best] - target).abs() {
            best = i;
        }
    }
    best
}

/// Laminar probe at x = [0.1, 0.3, 0.5, 0.7, 0.9] mm recording a
/// Gaussian dipole with its sink at 0.3 and source at 0.7: the
/// estimate must be negative near the sink, positive near the source,
/// and cross zero in between.
#[test]
fn laminar_dipole_recovers_sink_and_source() {
    let ele_x = electrode_grid_1d((0.1, 0.9), 5);
    let pots = forward_1d(gauss_1d_dipole, &ele_x, &ForwardConfig::default()).unwrap();

    let positions: Vec<ElectrodePosition> =
        ele_x.iter().map(|&x| ElectrodePosition::millimeters(&[x])).collect();
    let signals: Vec<ElectrodeSignal> =
        pots.iter().map(|&p| ElectrodeSignal::millivolts(vec![p], 0.0, 1e-3)).collect();

    let result = kcsd::estimate(Method::Kcsd1d, &positions, &signals).unwrap();
    let estimate = result.time_slice(0);

    assert!(!estimate.is_empty());
    assert!(estimate.iter().all(|v| v.is_finite()));
    assert!(estimate.iter().any(|&v| v != 0.0));

    assert!(estimate[nearest(&result.x, 0.3)] < 0.0, "expected a sink near x = 0.3");
    assert!(estimate[nearest(&result.x, 0.7)] > 0.0, "expected a source near x = 0.7");

    // The deepest sink and strongest source sit in their own halves,
    // with the zero crossing between them.
    let argmin = (0..estimate.len()).min_by(|&a, &b| estimate[a].total_cmp(&estimate[b])).unwrap();
    let argmax = (0..estimate.len()).max_by(|&a, &b| estimate[a].total_cmp(&estimate[b])).unwrap();
    assert!(result.x[argmin] < 0.5);
    assert!(result.x[argmax] > 0.5);

    let mut crossing = None;
    for i in argmin..argmax {
        if estimate[i] < 0.0 && estimate[i + 1] >= 0.0 {
            crossing = Some(0.5 * (result.x[i] + result.x[i + 1]));
        }
    }
    let crossing = crossing.expect("estimate never crosses zero between sink and source");
    assert!((0.25..=0.75).contains(&crossing), "zero crossing at {}", crossing);
}

/// Planar array over the broad four-source profile: the reconstruction
/// keeps the sign of the two strongest sources.
#[test]
fn planar_array_recovers_dominant_sources() {
    let (ele_x, ele_y) = electrode_grid_2d((0.1, 0.9), (0.1, 0.9), 4);
    let pots = forward_2d(large_source_2d, &ele_x, &ele_y, &ForwardConfig::default()).unwrap();

    let positions: Vec<ElectrodePosition> = ele_x
        .iter()
        .zip(&ele_y)
        .map(|(&x, &y)| ElectrodePosition::millimeters(&[x, y]))
        .collect();
    let signals: Vec<ElectrodeSignal> =
        pots.iter().map(|&p| ElectrodeSignal::millivolts(vec![p], 0.0, 1e-3)).collect();

    let config = EstimatorConfig {
        source_resolution: GridResolution::Fixed(8),
        estimation_resolution: GridResolution::Fixed(16),
        quadrature_points: 17,
        ..EstimatorConfig::default()
    };
    let result = CsdAnalysis::new(Method::Kcsd2d)
        .config(config)
        .cross_validate(CrossValidationSpec::new())
        .estimate(&positions, &signals)
        .unwrap();

    let y_axis = result.y.clone().unwrap();
    let estimate = result.time_slice(0);
    assert_eq!(estimate.len(), 16 * 16);
    assert!(estimate.iter().all(|v| v.is_finite()));

    // Positive source near (0.135, 0.863), dominant sink near
    // (0.185, 0.090).
    let at = |x: f64, y: f64| result.at(0, &[nearest(&result.x, x), nearest(&y_axis, y)]);
    assert!(at(0.135, 0.863) > 0.0, "expected a source near (0.14, 0.86)");
    assert!(at(0.185, 0.090) < 0.0, "expected a sink near (0.18, 0.09)");
}

/// Volumetric array over a 3D Gaussian dipole: the estimate keeps both
/// polarities and places the extremes on the correct side.
#[test]
fn volumetric_dipole_keeps_polarity() {
    let (ele_x, ele_y, ele_z) = electrode_grid_3d((0.1, 0.9), (0.1, 0.9), (0.1, 0.9), 3);
    let fwd_config = ForwardConfig { resolution: 20, ..ForwardConfig::default() };
    let pots = forward_3d(gauss_3d_dipole, &ele_x, &ele_y, &ele_z, &fwd_config).unwrap();

    let positions: Vec<ElectrodePosition> = (0..ele_x.len())
        .map(|i| ElectrodePosition::millimeters(&[ele_x[i], ele_y[i], ele_z[i]]))
        .collect();
    let signals: Vec<ElectrodeSignal> =
        pots.iter().map(|&p| ElectrodeSignal::millivolts(vec![p], 0.0, 1e-3)).collect();

    let config = EstimatorConfig {
        source_resolution: GridResolution::Fixed(4),
        estimation_resolution: GridResolution::Fixed(8),
        quadrature_points: 17,
        ..EstimatorConfig::default()
    };
    let result =
        CsdAnalysis::new(Method::Kcsd3d).config(config).estimate(&positions, &signals).unwrap();

    let estimate = result.time_slice(0);
    assert_eq!(estimate.len(), 8 * 8 * 8);
    assert!(estimate.iter().all(|v| v.is_finite()));
    assert!(estimate.iter().any(|&v| v > 0.0));
    assert!(estimate.iter().any(|&v| v < 0.0));

    // The strongest positive estimate lies closer to the true source
    // at (0.3, 0.7, 0.3) than to the sink at (0.6, 0.5, 0.7).
    let y_axis = result.y.clone().unwrap();
    let z_axis = result.z.clone().unwrap();
    let mut best = (0, 0, 0);
    let mut best_value = f64::NEG_INFINITY;
    for ix in 0..8 {
        for iy in 0..8 {
            for iz in 0..8 {
                let v = result.at(0, &[ix, iy, iz]);
                if v > best_value {
                    best_value = v;
                    best = (ix, iy, iz);
                }
            }
        }
    }
    let p = [result.x[best.0], y_axis[best.1], z_axis[best.2]];
    let d_source =
        ((p[0] - 0.3).powi(2) + (p[1] - 0.7).powi(2) + (p[2] - 0.3).powi(2)).sqrt();
    let d_sink = ((p[0] - 0.6).powi(2) + (p[1] - 0.5).powi(2) + (p[2] - 0.7).powi(2)).sqrt();
    assert!(d_source < d_sink, "source peak at {:?}", p);
}

/// Multiple time samples keep the per-time structure: scaling the
/// potentials scales the estimate linearly.
#[test]
fn estimation_is_linear_across_time_columns() {
    let ele_x = electrode_grid_1d((0.1, 0.9), 5);
    let pots = forward_1d(gauss_1d_dipole, &ele_x, &ForwardConfig::default()).unwrap();

    let positions: Vec<ElectrodePosition> =
        ele_x.iter().map(|&x| ElectrodePosition::millimeters(&[x])).collect();
    let signals: Vec<ElectrodeSignal> = pots
        .iter()
        .map(|&p| ElectrodeSignal::millivolts(vec![p, 2.0 * p], 0.0, 1e-3))
        .collect();

    let result = kcsd::estimate(Method::Kcsd1d, &positions, &signals).unwrap();
    assert_eq!(result.n_times(), 2);
    let first = result.time_slice(0).to_vec();
    let second = result.time_slice(1);
    for (a, b) in first.iter().zip(second) {
        assert!((2.0 * a - b).abs() < 1e-9 * (1.0 + b.abs()));
    }
}
