//! Renormalization of probability vectors and stochastic-matrix rows.
//!
//! Every component that consumes or produces a probability vector goes
//! through [`renormalize`], so drift is corrected and reported in one place.

use ndarray::{Array2, ArrayViewMut1};
use tracing::warn;

/// Outcome of a [`renormalize`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Renormalized {
    /// The values already summed to 1 within tolerance.
    Unchanged,
    /// The values were divided by their former sum.
    Rescaled {
        /// Sum before rescaling.
        sum: f64,
    },
    /// The sum was zero or non-finite; values were left untouched.
    Degenerate {
        /// The offending sum.
        sum: f64,
    },
}

impl Renormalized {
    /// Returns `true` if the values were modified.
    pub fn was_rescaled(self) -> bool {
        matches!(self, Self::Rescaled { .. })
    }
}

/// Divides `values` by their sum, treating a zero or non-finite sum as 1.
///
/// Returns the divisor that was applied.
pub fn rescale(mut values: ArrayViewMut1<'_, f64>) -> f64 {
    let s = values.sum();
    let divisor = if s.is_finite() && s.abs() > f64::MIN_POSITIVE {
        s
    } else {
        1.0
    };
    values.mapv_inplace(|p| p / divisor);
    divisor
}

/// Checks that `values` sum to 1 within `tolerance`, rescaling and logging a
/// warning if they do not.
///
/// `label` names the vector in the diagnostic (e.g. `"row 2"`).
pub fn renormalize(
    mut values: ArrayViewMut1<'_, f64>,
    tolerance: f64,
    label: impl std::fmt::Display,
) -> Renormalized {
    let s = values.sum();
    if (s - 1.0).abs() <= tolerance {
        return Renormalized::Unchanged;
    }
    if !s.is_finite() || s.abs() <= f64::MIN_POSITIVE {
        warn!(%label, sum = s, "probabilities have no usable mass, left unnormalized");
        return Renormalized::Degenerate { sum: s };
    }
    warn!(%label, sum = s, "probabilities do not sum to 1, renormalizing");
    values.mapv_inplace(|p| p / s);
    Renormalized::Rescaled { sum: s }
}

/// Applies [`renormalize`] to every row of `matrix`.
///
/// Returns the number of rows that were rescaled.
pub fn renormalize_rows(matrix: &mut Array2<f64>, tolerance: f64) -> usize {
    let mut rescaled = 0;
    for (i, row) in matrix.rows_mut().into_iter().enumerate() {
        if renormalize(row, tolerance, format_args!("row {i}")).was_rescaled() {
            rescaled += 1;
        }
    }
    rescaled
}

/// Largest absolute deviation of any row sum from 1.
pub fn max_row_deviation(matrix: &Array2<f64>) -> f64 {
    matrix
        .rows()
        .into_iter()
        .map(|row| (row.sum() - 1.0).abs())
        .fold(0.0, f64::max)
}
