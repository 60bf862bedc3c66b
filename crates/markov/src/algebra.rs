//! n-step transition matrices and distribution propagation.
//!
//! ```text
//! P^0 = I
//! P^n = P · P^(n-1)          (computed by repeated squaring)
//! v_n = v_0 · P^n            (row vector times matrix)
//! ```
//!
//! Both operations renormalize their inputs when they drift from 1 by more
//! than the propagation tolerance, and renormalize intermediate products so
//! that hundreds of steps do not accumulate rounding error.

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::config::PROPAGATION_TOLERANCE;
use crate::distribution::check_weights;
use crate::error::MarkovError;
use crate::normalize::{Renormalized, renormalize, renormalize_rows, rescale};

/// Raises a transition matrix to the integer power `steps`.
///
/// Entry `(i, j)` of the result is the probability of being in state `j`
/// exactly `steps` transitions after starting in state `i`. `steps == 0`
/// returns the identity.
///
/// # Errors
///
/// Returns [`MarkovError::NotSquare`] if `matrix` is not square,
/// [`MarkovError::EmptyStateSet`] if it is 0×0,
/// [`MarkovError::NonFiniteData`] if it contains NaN or infinity, and
/// [`MarkovError::NegativeProbability`] for a negative entry.
pub fn n_step_matrix(matrix: &Array2<f64>, steps: u32) -> Result<Array2<f64>, MarkovError> {
    n_step_matrix_with_tolerance(matrix, steps, PROPAGATION_TOLERANCE)
}

/// [`n_step_matrix`] with an explicit row-sum tolerance.
pub fn n_step_matrix_with_tolerance(
    matrix: &Array2<f64>,
    steps: u32,
    tolerance: f64,
) -> Result<Array2<f64>, MarkovError> {
    check_square(matrix)?;
    let mut base = matrix.to_owned();
    let fixed = renormalize_rows(&mut base, tolerance);
    if fixed > 0 {
        debug!(rows = fixed, "renormalized transition rows before exponentiation");
    }
    Ok(matrix_power(base, steps))
}

/// Propagates an initial distribution `steps` transitions forward.
///
/// Computes `initial · matrix^steps`. The initial vector is renormalized
/// (with a warning) if it does not sum to 1, and the result is rescaled to sum
/// to exactly 1.
///
/// # Errors
///
/// Returns the errors of [`n_step_matrix`], plus
/// [`MarkovError::LengthMismatch`] if `initial` does not have one entry per
/// state, [`MarkovError::NegativeProbability`] / [`MarkovError::NonFiniteData`]
/// for invalid entries, and [`MarkovError::DegenerateDistribution`] if the
/// vector has no mass.
pub fn n_step_distribution(
    initial: &Array1<f64>,
    matrix: &Array2<f64>,
    steps: u32,
) -> Result<Array1<f64>, MarkovError> {
    n_step_distribution_with_tolerance(initial, matrix, steps, PROPAGATION_TOLERANCE)
}

/// [`n_step_distribution`] with an explicit sum tolerance.
pub fn n_step_distribution_with_tolerance(
    initial: &Array1<f64>,
    matrix: &Array2<f64>,
    steps: u32,
    tolerance: f64,
) -> Result<Array1<f64>, MarkovError> {
    check_square(matrix)?;
    if initial.len() != matrix.nrows() {
        return Err(MarkovError::LengthMismatch {
            expected: matrix.nrows(),
            got: initial.len(),
        });
    }
    check_weights(initial)?;

    let mut v = initial.to_owned();
    if let Renormalized::Degenerate { .. } =
        renormalize(v.view_mut(), tolerance, "initial distribution")
    {
        return Err(MarkovError::DegenerateDistribution);
    }

    let power = n_step_matrix_with_tolerance(matrix, steps, tolerance)?;
    let mut out = v.dot(&power);
    if out.sum() <= 0.0 {
        return Err(MarkovError::DegenerateDistribution);
    }
    rescale(out.view_mut());
    Ok(out)
}

pub(crate) fn check_square(matrix: &Array2<f64>) -> Result<(), MarkovError> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(MarkovError::NotSquare { rows, cols });
    }
    if rows == 0 {
        return Err(MarkovError::EmptyStateSet);
    }
    for (index, &p) in matrix.iter().enumerate() {
        if !p.is_finite() {
            return Err(MarkovError::NonFiniteData);
        }
        if p < 0.0 {
            return Err(MarkovError::NegativeProbability { index, value: p });
        }
    }
    Ok(())
}

/// Exponentiation by squaring on a square, finite matrix.
///
/// Each product has its rows rescaled so the result stays row-stochastic.
pub(crate) fn matrix_power(mut base: Array2<f64>, steps: u32) -> Array2<f64> {
    let mut result = Array2::eye(base.nrows());
    let mut e = steps;
    while e > 0 {
        if e & 1 == 1 {
            result = result.dot(&base);
            rescale_rows(&mut result);
        }
        e >>= 1;
        if e > 0 {
            base = base.dot(&base);
            rescale_rows(&mut base);
        }
    }
    result
}

fn rescale_rows(m: &mut Array2<f64>) {
    for row in m.rows_mut() {
        rescale(row);
    }
}
