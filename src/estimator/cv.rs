//! Cross-validated selection of the basis radius and regularization.
//!
//! Leave-one-out search over the Cartesian product of candidate radii
//! (`Rs`) and ridge parameters (`lambdas`): each electrode in turn is
//! held out, the reduced kernel system predicts its potential from the
//! remaining electrodes, and the squared residual is accumulated over
//! channels and time. The pair with minimum error wins; ties resolve to
//! the earliest candidates in input order, so repeated runs select
//! identically. Candidate radii evaluate independently and run in
//! parallel when the `parallel` feature is enabled.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::constants::DEFAULT_LAMBDA_GRID;
use crate::error::CsdError;

use super::kernel::solve_regularized;
use super::KcsdEstimator;

/// Candidate grids for cross-validation.
///
/// Only the two knobs the kernel method exposes can be searched: the
/// basis radius (`Rs`) and the ridge parameter (`lambdas`). Anything
/// else is a configuration error, rejected before kernel computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossValidationSpec {
    rs: Option<Vec<f64>>,
    lambdas: Option<Vec<f64>>,
}

impl CrossValidationSpec {
    /// Empty spec: searches the default lambda grid at the resolved
    /// default radius.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate basis radii.
    pub fn with_rs(mut self, rs: Vec<f64>) -> Self {
        self.rs = Some(rs);
        self
    }

    /// Set the candidate regularization values.
    pub fn with_lambdas(mut self, lambdas: Vec<f64>) -> Self {
        self.lambdas = Some(lambdas);
        self
    }

    /// Build a spec from dynamic `(key, values)` entries.
    ///
    /// The only accepted keys are `"Rs"` and `"lambdas"`; any other key
    /// is rejected, as are duplicates. This is the entry point for
    /// callers marshalling loosely typed analysis descriptions.
    pub fn from_entries(entries: &[(&str, Vec<f64>)]) -> Result<Self, CsdError> {
        let mut spec = Self::new();
        for (key, values) in entries {
            match *key {
                "Rs" => {
                    if spec.rs.is_some() {
                        return Err(CsdError::InvalidCrossValidation {
                            reason: "duplicate key \"Rs\"".into(),
                        });
                    }
                    spec.rs = Some(values.clone());
                }
                "lambdas" => {
                    if spec.lambdas.is_some() {
                        return Err(CsdError::InvalidCrossValidation {
                            reason: "duplicate key \"lambdas\"".into(),
                        });
                    }
                    spec.lambdas = Some(values.clone());
                }
                other => return Err(CsdError::UnknownCvKey { key: other.to_string() }),
            }
        }
        Ok(spec)
    }

    /// Candidate radii, if supplied.
    pub fn rs(&self) -> Option<&[f64]> {
        self.rs.as_deref()
    }

    /// Candidate regularization values, if supplied.
    pub fn lambdas(&self) -> Option<&[f64]> {
        self.lambdas.as_deref()
    }

    /// Reject unusable candidate grids before any kernel work.
    pub(crate) fn validate(&self) -> Result<(), CsdError> {
        if let Some(rs) = &self.rs {
            if rs.is_empty() {
                return Err(CsdError::InvalidCrossValidation {
                    reason: "Rs candidate list is empty".into(),
                });
            }
            if rs.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
                return Err(CsdError::InvalidCrossValidation {
                    reason: format!("Rs candidates must be positive and finite, got {:?}", rs),
                });
            }
        }
        if let Some(lambdas) = &self.lambdas {
            if lambdas.is_empty() {
                return Err(CsdError::InvalidCrossValidation {
                    reason: "lambdas candidate list is empty".into(),
                });
            }
            if lambdas.iter().any(|l| !(l.is_finite() && *l > 0.0)) {
                return Err(CsdError::InvalidCrossValidation {
                    reason: format!(
                        "lambdas candidates must be strictly positive and finite, got {:?}",
                        lambdas
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Outcome of a cross-validation search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvSelection {
    /// Selected basis radius, in mm.
    pub radius: f64,
    /// Selected regularization.
    pub lambda: f64,
    /// Leave-one-out squared-residual error of the selection.
    pub error: f64,
    /// Number of (radius, lambda) pairs evaluated.
    pub candidates: usize,
}

impl KcsdEstimator {
    /// Select `(radius, lambda)` by leave-one-out cross-validation over
    /// the candidate grids in `spec`.
    ///
    /// An omitted `Rs` searches only the resolved default radius; an
    /// omitted `lambdas` falls back to the built-in logarithmic grid,
    /// so the regularization axis is always searched.
    pub fn cross_validate(
        &self,
        potentials: &DMatrix<f64>,
        spec: &CrossValidationSpec,
    ) -> Result<CvSelection, CsdError> {
        spec.validate()?;
        if potentials.nrows() != self.electrodes.len() {
            return Err(CsdError::ChannelCountMismatch {
                electrodes: self.electrodes.len(),
                signals: potentials.nrows(),
            });
        }
        if self.electrodes.len() < 2 {
            return Err(CsdError::InvalidCrossValidation {
                reason: "leave-one-out needs at least two electrodes".into(),
            });
        }

        let radii: Vec<f64> = match spec.rs() {
            Some(rs) => rs.to_vec(),
            None => vec![self.default_radius],
        };
        let lambdas: Vec<f64> = match spec.lambdas() {
            Some(ls) => ls.to_vec(),
            None => DEFAULT_LAMBDA_GRID.to_vec(),
        };

        // Each radius owns one kernel build; the lambda sweep reuses it.
        let evaluate_radius = |&radius: &f64| -> Result<Vec<f64>, CsdError> {
            let b_pot = self.build_b_pot(radius);
            let k_pot = (b_pot.transpose() * &b_pot) / b_pot.nrows() as f64;
            lambdas
                .iter()
                .map(|&lambda| loo_error(&k_pot, lambda, potentials))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let per_radius: Vec<Vec<f64>> =
            radii.par_iter().map(evaluate_radius).collect::<Result<_, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let per_radius: Vec<Vec<f64>> =
            radii.iter().map(evaluate_radius).collect::<Result<_, _>>()?;

        // Completion order never matters: candidates are compared in
        // (radius, lambda) input order with strict improvement only.
        let mut best = (0usize, 0usize);
        let mut best_error = f64::INFINITY;
        for (ri, errors) in per_radius.iter().enumerate() {
            for (li, &error) in errors.iter().enumerate() {
                if error < best_error {
                    best = (ri, li);
                    best_error = error;
                }
            }
        }

        Ok(CvSelection {
            radius: radii[best.0],
            lambda: lambdas[best.1],
            error: best_error,
            candidates: radii.len() * lambdas.len(),
        })
    }
}

/// Leave-one-out squared residual of predicting each electrode's
/// potential from the others through the reduced kernel system.
fn loo_error(k_pot: &DMatrix<f64>, lambda: f64, potentials: &DMatrix<f64>) -> Result<f64, CsdError> {
    let n = k_pot.nrows();
    let mut error = 0.0;
    for held_out in 0..n {
        let k_reduced = k_pot.clone().remove_row(held_out).remove_column(held_out);
        let v_reduced = potentials.clone().remove_row(held_out);
        let beta = solve_regularized(&k_reduced, lambda, &v_reduced)?;

        // Cross row k(held_out, j != held_out) interpolates the
        // held-out electrode from the reduced solution.
        let cross = k_pot.row(held_out).into_owned().remove_column(held_out);
        let predicted = cross * beta;
        for t in 0..potentials.ncols() {
            let residual = predicted[(0, t)] - potentials[(held_out, t)];
            error += residual * residual;
        }
    }
    Ok(error)
}
