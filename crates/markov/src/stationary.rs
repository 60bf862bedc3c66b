//! Stationary distribution via eigen-decomposition of the transposed kernel.
//!
//! A stationary distribution `π` satisfies `π·P = π`, i.e. it is a left
//! eigenvector of `P` for eigenvalue 1, or equivalently a right eigenvector of
//! `Pᵀ`. The solver:
//!
//! 1. computes the (complex) eigenvalues of `Pᵀ` from its real Schur form;
//! 2. selects the eigenvalue with the smallest `|λ − 1|`;
//! 3. takes the null vector of `Pᵀ − Re(λ)·I` from its singular value
//!    decomposition (the right singular vector of the smallest singular
//!    value), which is real, so any imaginary part is discarded;
//! 4. takes absolute values and normalizes to sum 1.
//!
//! # Limitations
//!
//! For reducible or periodic chains the eigenvalue 1 may be repeated, or
//! other eigenvalues may lie on the unit circle. The selection rule above
//! still returns one vector deterministically, but it is not guaranteed to be
//! *the* stationary distribution and non-uniqueness is not reported.

use nalgebra::{Complex, DMatrix};
use ndarray::{Array1, Array2};
use tracing::{debug, warn};

use crate::config::PROPAGATION_TOLERANCE;
use crate::error::MarkovError;
use crate::normalize::{renormalize_rows, rescale};

/// Selected eigenvalues further than this from 1 are reported.
const EIGENVALUE_WARN_DISTANCE: f64 = 1e-6;

/// A stationary distribution together with the eigenvalue it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct StationaryDistribution {
    probs: Array1<f64>,
    eigenvalue: Complex<f64>,
}

impl StationaryDistribution {
    /// Long-run probability of each state.
    pub fn probs(&self) -> &Array1<f64> {
        &self.probs
    }

    /// Consumes the result and returns the probability vector.
    pub fn into_probs(self) -> Array1<f64> {
        self.probs
    }

    /// The eigenvalue of `Pᵀ` that was selected (ideally exactly 1).
    pub fn eigenvalue(&self) -> Complex<f64> {
        self.eigenvalue
    }

    /// Largest component of `|π·P − π|`.
    ///
    /// # Panics
    ///
    /// Panics if `matrix` does not match the length of the distribution.
    pub fn residual(&self, matrix: &Array2<f64>) -> f64 {
        let moved = self.probs.dot(matrix);
        moved
            .iter()
            .zip(self.probs.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

/// Computes the stationary distribution of a row-stochastic matrix.
///
/// Rows that drift from 1 by more than `1e-8` are renormalized first.
///
/// # Errors
///
/// Returns [`MarkovError::NotSquare`] if `matrix` is not square,
/// [`MarkovError::EmptyStateSet`] if it is 0×0,
/// [`MarkovError::NonFiniteData`] for NaN/infinite entries, and
/// [`MarkovError::DegenerateDistribution`] if the extracted eigenvector has no
/// mass.
#[tracing::instrument(skip_all, fields(n_states = matrix.nrows()))]
pub fn stationary_distribution(
    matrix: &Array2<f64>,
) -> Result<StationaryDistribution, MarkovError> {
    crate::algebra::check_square(matrix)?;
    let n = matrix.nrows();
    let mut p = matrix.to_owned();
    renormalize_rows(&mut p, PROPAGATION_TOLERANCE);

    if n == 1 {
        return Ok(StationaryDistribution {
            probs: Array1::ones(1),
            eigenvalue: Complex::new(p[[0, 0]], 0.0),
        });
    }

    // Pᵀ, built element-wise so row/column-major layout never matters.
    let pt = DMatrix::from_fn(n, n, |i, j| p[[j, i]]);

    let one = Complex::new(1.0, 0.0);
    let eigenvalues = pt.complex_eigenvalues();
    let lambda = eigenvalues
        .iter()
        .copied()
        .min_by(|a, b| (*a - one).norm().total_cmp(&(*b - one).norm()))
        .ok_or(MarkovError::EmptyStateSet)?;

    let distance = (lambda - one).norm();
    if distance > EIGENVALUE_WARN_DISTANCE {
        warn!(
            re = lambda.re,
            im = lambda.im,
            distance,
            "eigenvalue closest to 1 is far from 1, matrix may not be stochastic"
        );
    } else {
        debug!(re = lambda.re, im = lambda.im, "selected eigenvalue");
    }

    let shifted = &pt - DMatrix::<f64>::identity(n, n) * lambda.re;
    let svd = shifted.svd(false, true);
    let v_t = svd.v_t.ok_or(MarkovError::DegenerateDistribution)?;
    let k = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(k, _)| k)
        .ok_or(MarkovError::EmptyStateSet)?;

    let mut probs: Array1<f64> = v_t.row(k).iter().map(|x| x.abs()).collect();
    if probs.sum() <= f64::MIN_POSITIVE {
        return Err(MarkovError::DegenerateDistribution);
    }
    rescale(probs.view_mut());

    Ok(StationaryDistribution {
        probs,
        eigenvalue: lambda,
    })
}
