//! Forward-model integrators and electrode grid generation.

use kcsd::numerics::{electrode_grid_1d, electrode_grid_2d, electrode_grid_3d};
use kcsd::sources::{gauss_1d_dipole, gauss_3d_dipole, large_source_2d, small_source_2d};
use kcsd::{forward_1d, forward_2d, forward_3d, CsdError, ForwardConfig};

#[test]
fn default_electrode_grid_matches_laminar_probe() {
    let ele_x = electrode_grid_1d((0.1, 0.9), 5);
    let expected = [0.1, 0.3, 0.5, 0.7, 0.9];
    for (a, b) in ele_x.iter().zip(expected) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn dipole_1d_potentials_reflect_source_and_sink() {
    let ele_x = electrode_grid_1d((0.1, 0.9), 5);
    let pots = forward_1d(gauss_1d_dipole, &ele_x, &ForwardConfig::default()).unwrap();
    assert_eq!(pots.len(), 5);
    assert!(pots.iter().all(|p| p.is_finite()));
    // Sink at 0.3, source at 0.7.
    assert!(pots[0] < 0.0);
    assert!(pots[4] > 0.0);
    // The profile is antisymmetric about 0.5, so the centre electrode
    // and the sum of mirrored electrodes sit near zero.
    assert!(pots[2].abs() < 1e-3);
    assert!((pots[1] + pots[3]).abs() < 1e-3);
}

#[test]
fn potentials_scale_inversely_with_conductivity() {
    let ele_x = electrode_grid_1d((0.1, 0.9), 3);
    let base = forward_1d(gauss_1d_dipole, &ele_x, &ForwardConfig::default()).unwrap();
    let halved = forward_1d(
        gauss_1d_dipole,
        &ele_x,
        &ForwardConfig { sigma: 2.0, ..ForwardConfig::default() },
    )
    .unwrap();
    for (a, b) in base.iter().zip(&halved) {
        assert!((a - 2.0 * b).abs() < 1e-12);
    }
}

#[test]
fn electrode_on_charge_grid_node_stays_finite() {
    // Resolution 51 puts charge-grid nodes at multiples of 0.02, so the
    // electrode at (0.2, 0.2) coincides exactly with a node.
    let config = ForwardConfig { resolution: 51, ..ForwardConfig::default() };
    let pots = forward_2d(large_source_2d, &[0.2], &[0.2], &config).unwrap();
    assert!(pots[0].is_finite());

    let pots = forward_3d(gauss_3d_dipole, &[0.2], &[0.2], &[0.2], &config).unwrap();
    assert!(pots[0].is_finite());
}

#[test]
fn planar_array_sees_small_sources() {
    let (ele_x, ele_y) = electrode_grid_2d((0.1, 0.9), (0.1, 0.9), 4);
    let pots = forward_2d(small_source_2d, &ele_x, &ele_y, &ForwardConfig::default()).unwrap();
    assert_eq!(pots.len(), 16);
    assert!(pots.iter().all(|p| p.is_finite()));
    assert!(pots.iter().any(|&p| p != 0.0));
}

#[test]
fn volumetric_dipole_potentials_have_both_signs() {
    let (ele_x, ele_y, ele_z) = electrode_grid_3d((0.1, 0.9), (0.1, 0.9), (0.1, 0.9), 3);
    let config = ForwardConfig { resolution: 20, ..ForwardConfig::default() };
    let pots = forward_3d(gauss_3d_dipole, &ele_x, &ele_y, &ele_z, &config).unwrap();
    assert_eq!(pots.len(), 27);
    assert!(pots.iter().all(|p| p.is_finite()));
    assert!(pots.iter().any(|&p| p > 0.0));
    assert!(pots.iter().any(|&p| p < 0.0));
}

#[test]
fn grid_generator_flattens_x_slowest() {
    let (x, y) = electrode_grid_2d((0.0, 1.0), (0.0, 1.0), 3);
    assert_eq!(x.len(), 9);
    // First three entries share x, sweep y.
    assert_eq!(&x[..3], &[0.0, 0.0, 0.0]);
    assert_eq!(&y[..3], &[0.0, 0.5, 1.0]);
}

#[test]
fn malformed_domains_are_rejected() {
    let err = forward_1d(
        gauss_1d_dipole,
        &[0.5],
        &ForwardConfig { x_bounds: (1.0, 0.0), ..ForwardConfig::default() },
    )
    .unwrap_err();
    assert!(matches!(err, CsdError::InvalidParameter { name: "x_bounds", .. }));

    let err = forward_2d(
        large_source_2d,
        &[0.5],
        &[0.5, 0.6],
        &ForwardConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CsdError::InvalidParameter { name: "electrodes", .. }));
}
