//! Main analysis entry point: validation, marshalling, and dispatch.
//!
//! [`CsdAnalysis`] walks a fixed sequence of checks before any numeric
//! work: unit normalization, channel-count agreement, coordinate
//! dimensionality, method compatibility, and signal-shape consistency.
//! Only then is the potential matrix assembled, the estimator built for
//! the requested method tag, cross-validation run when requested, and
//! the estimate packaged with its grid axes and the pass-through
//! sampling metadata. Any rejection aborts the whole call; there are no
//! partial results.

use nalgebra::DMatrix;

use crate::config::EstimatorConfig;
use crate::error::CsdError;
use crate::estimator::{CrossValidationSpec, KcsdEstimator};
use crate::result::{EstimationResult, Metadata};
use crate::types::{ElectrodePosition, ElectrodeSignal, Method};

/// Configurable CSD analysis over one set of recorded signals.
///
/// # Example
///
/// ```ignore
/// use kcsd::{CsdAnalysis, CrossValidationSpec, Method};
///
/// let result = CsdAnalysis::new(Method::Kcsd1d)
///     .cross_validate(CrossValidationSpec::new().with_rs(vec![0.1, 0.25, 0.5]))
///     .estimate(&positions, &signals)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsdAnalysis {
    method: Option<Method>,
    config: EstimatorConfig,
    cv: Option<CrossValidationSpec>,
}

impl CsdAnalysis {
    /// Analysis with the given method and default hyperparameters.
    pub fn new(method: Method) -> Self {
        Self { method: Some(method), config: EstimatorConfig::default(), cv: None }
    }

    /// Set or replace the estimation method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Replace the estimator configuration.
    pub fn config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Request cross-validated hyperparameter selection.
    pub fn cross_validate(mut self, spec: CrossValidationSpec) -> Self {
        self.cv = Some(spec);
        self
    }

    /// Run the analysis.
    ///
    /// `positions` and `signals` are channel-aligned: position `i`
    /// locates the electrode that recorded signal `i`.
    pub fn estimate(
        &self,
        positions: &[ElectrodePosition],
        signals: &[ElectrodeSignal],
    ) -> Result<EstimationResult, CsdError> {
        let method = self.method.ok_or(CsdError::UnspecifiedMethod)?;

        // Normalize coordinate units first: an untagged position is a
        // hard error even when everything else lines up.
        let mut coords_mm: Vec<Vec<f64>> = Vec::with_capacity(positions.len());
        for (index, position) in positions.iter().enumerate() {
            let mm = position.to_millimeters().ok_or(CsdError::MissingUnit {
                what: "electrode position",
                index,
            })?;
            coords_mm.push(mm);
        }

        if positions.len() != signals.len() {
            return Err(CsdError::ChannelCountMismatch {
                electrodes: positions.len(),
                signals: signals.len(),
            });
        }
        if positions.is_empty() {
            return Err(CsdError::InvalidParameter {
                name: "electrodes",
                reason: "at least one electrode position is required".into(),
            });
        }

        for (index, coords) in coords_mm.iter().enumerate() {
            if coords.is_empty() || coords.len() > 3 {
                return Err(CsdError::InvalidCoordinates {
                    index,
                    components: coords.len(),
                    expected: 0,
                });
            }
        }
        let dim = coords_mm[0].len();
        for (index, coords) in coords_mm.iter().enumerate() {
            if coords.len() != dim {
                return Err(CsdError::InvalidCoordinates {
                    index,
                    components: coords.len(),
                    expected: dim,
                });
            }
        }

        let available = Method::available_for(dim);
        if !available.contains(&method) {
            return Err(CsdError::IncompatibleMethod {
                method,
                dimensionality: dim,
                available,
            });
        }

        let potentials = assemble_potentials(signals)?;
        let coordinates = DMatrix::from_fn(coords_mm.len(), dim, |i, j| coords_mm[i][j]);

        let estimator = KcsdEstimator::new(method, &coordinates, self.config.clone())?;

        let selection = match &self.cv {
            Some(spec) => Some(estimator.cross_validate(&potentials, spec)?),
            None => None,
        };
        let (radius, lambda) = match &selection {
            Some(s) => (s.radius, s.lambda),
            None => (estimator.default_radius(), self.config.lambda),
        };

        let csd = estimator.estimate(&potentials, Some(radius), Some(lambda))?;

        // Roll the time axis to the front: the solver returns the grid
        // axis first.
        let n_grid = csd.nrows();
        let n_times = csd.ncols();
        let mut values = Vec::with_capacity(n_grid * n_times);
        for t in 0..n_times {
            for g in 0..n_grid {
                values.push(csd[(g, t)]);
            }
        }

        let axes = estimator.axes().clone();
        let mut shape = vec![n_times];
        shape.extend(axes.shape());

        Ok(EstimationResult {
            values,
            shape,
            x: axes.x,
            y: axes.y,
            z: axes.z,
            t_start: signals[0].t_start(),
            sampling_period: signals[0].sampling_period(),
            metadata: Metadata {
                method,
                radius,
                lambda,
                n_electrodes: positions.len(),
                n_sources: estimator.n_sources(),
                cross_validation: selection,
            },
        })
    }
}

/// Assemble the channel-by-time potential matrix in millivolts.
fn assemble_potentials(signals: &[ElectrodeSignal]) -> Result<DMatrix<f64>, CsdError> {
    let n_times = signals[0].len();
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(signals.len());
    for (index, signal) in signals.iter().enumerate() {
        if signal.is_empty() {
            return Err(CsdError::EmptySignal { index });
        }
        if signal.len() != n_times {
            return Err(CsdError::SampleCountMismatch {
                expected: n_times,
                index,
                found: signal.len(),
            });
        }
        let mv = signal
            .to_millivolts()
            .ok_or(CsdError::MissingUnit { what: "signal", index })?;
        rows.push(mv);
    }
    Ok(DMatrix::from_fn(signals.len(), n_times, |i, j| rows[i][j]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn laminar_positions(n: usize) -> Vec<ElectrodePosition> {
        (0..n)
            .map(|i| ElectrodePosition::millimeters(&[0.1 + 0.8 * i as f64 / (n - 1) as f64]))
            .collect()
    }

    fn constant_signals(n: usize, value: f64) -> Vec<ElectrodeSignal> {
        (0..n).map(|_| ElectrodeSignal::millivolts(vec![value, value], 0.0, 1e-3)).collect()
    }

    #[test]
    fn default_analysis_has_no_method() {
        let err = CsdAnalysis::default()
            .estimate(&laminar_positions(3), &constant_signals(3, 0.1))
            .unwrap_err();
        assert!(matches!(err, CsdError::UnspecifiedMethod));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn untagged_position_is_a_unit_error() {
        let mut positions = laminar_positions(3);
        positions[1] = ElectrodePosition::untagged(&[0.5]);
        let err = CsdAnalysis::new(Method::Kcsd1d)
            .estimate(&positions, &constant_signals(3, 0.1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unit);
    }

    #[test]
    fn channel_count_mismatch_is_a_validation_error() {
        let err = CsdAnalysis::new(Method::Kcsd1d)
            .estimate(&laminar_positions(3), &constant_signals(4, 0.1))
            .unwrap_err();
        assert!(matches!(err, CsdError::ChannelCountMismatch { electrodes: 3, signals: 4 }));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn four_component_coordinates_are_rejected() {
        let positions = vec![ElectrodePosition::millimeters(&[0.1, 0.2, 0.3, 0.4])];
        let err = CsdAnalysis::new(Method::Kcsd3d)
            .estimate(&positions, &constant_signals(1, 0.1))
            .unwrap_err();
        assert!(matches!(err, CsdError::InvalidCoordinates { .. }));
    }

    #[test]
    fn ragged_signals_are_rejected() {
        let positions = laminar_positions(3);
        let mut signals = constant_signals(3, 0.1);
        signals[2] = ElectrodeSignal::millivolts(vec![0.1], 0.0, 1e-3);
        let err = CsdAnalysis::new(Method::Kcsd1d).estimate(&positions, &signals).unwrap_err();
        assert!(matches!(err, CsdError::SampleCountMismatch { index: 2, .. }));
    }

    #[test]
    fn sampling_metadata_passes_through() {
        let positions = laminar_positions(5);
        let signals: Vec<ElectrodeSignal> = (0..5)
            .map(|i| ElectrodeSignal::millivolts(vec![0.01 * i as f64], 0.25, 2e-3))
            .collect();
        let result = CsdAnalysis::new(Method::Kcsd1d).estimate(&positions, &signals).unwrap();
        assert_eq!(result.t_start, 0.25);
        assert_eq!(result.sampling_period, 2e-3);
        assert_eq!(result.shape[0], 1);
    }
}
