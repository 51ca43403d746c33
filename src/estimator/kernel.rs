//! Gram kernel assembly and the regularized solve.

use nalgebra::{Cholesky, DMatrix};

use crate::constants::LAMBDA_FLOOR;
use crate::error::CsdError;

/// The two kernels of the inverse problem.
#[derive(Debug, Clone)]
pub(crate) struct Kernels {
    /// Electrode-electrode Gram matrix, `n_ele x n_ele`. Symmetric
    /// positive semi-definite by construction.
    pub k_pot: DMatrix<f64>,
    /// Grid-electrode cross kernel, `n_est x n_ele`.
    pub k_cross: DMatrix<f64>,
}

/// Assemble the Gram kernels from the basis-potential matrix
/// (`n_src x n_ele`) and the basis-density matrix (`n_src x n_est`).
pub(crate) fn gram_kernels(b_pot: &DMatrix<f64>, b_src: &DMatrix<f64>) -> Kernels {
    let n_src = b_pot.nrows() as f64;
    let k_pot = (b_pot.transpose() * b_pot) / n_src;
    let k_cross = (b_src.transpose() * b_pot) / n_src;
    Kernels { k_pot, k_cross }
}

/// Solve `(K + ridge * I) X = rhs` by Cholesky decomposition.
///
/// The effective ridge is floored at `LAMBDA_FLOOR * trace(K) / n` (and
/// at `LAMBDA_FLOOR` absolute), so a zero `lambda` still produces an
/// invertible system. If the decomposition fails anyway the ridge is
/// escalated a few times before giving up.
pub(crate) fn solve_regularized(
    k_pot: &DMatrix<f64>,
    lambda: f64,
    rhs: &DMatrix<f64>,
) -> Result<DMatrix<f64>, CsdError> {
    let n = k_pot.nrows();
    let relative_floor = LAMBDA_FLOOR * k_pot.trace() / n as f64;
    let mut ridge = lambda.max(relative_floor).max(LAMBDA_FLOOR);

    for _ in 0..6 {
        let mut system = k_pot.clone();
        for i in 0..n {
            system[(i, i)] += ridge;
        }
        if let Some(chol) = Cholesky::new(system) {
            return Ok(chol.solve(rhs));
        }
        ridge *= 100.0;
    }
    Err(CsdError::InvalidParameter {
        name: "lambda",
        reason: "kernel system is not positive definite even after regularization".into(),
    })
}
