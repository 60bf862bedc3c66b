//! Transition matrix estimation from observed navigation sequences.

use ndarray::{Array2, ArrayView1};
use tracing::{debug, info, warn};

use crate::config::MarkovConfig;
use crate::error::MarkovError;
use crate::normalize::{max_row_deviation, renormalize_rows, rescale};
use crate::state::StateSet;

/// An n×n row-stochastic transition matrix.
///
/// Row `i` holds the probabilities of moving from state `i` to every state,
/// indexed by the [`StateSet`] the matrix was built against. Immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    probs: Array2<f64>,
}

impl TransitionMatrix {
    /// Wraps an array that is already known to be square and row-stochastic.
    pub(crate) fn from_probs(probs: Array2<f64>) -> Self {
        Self { probs }
    }

    /// Builds a transition matrix from an arbitrary array.
    ///
    /// Rows that drift from 1 by more than `1e-8` are renormalized with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::NotSquare`] for non-square (or empty) input,
    /// [`MarkovError::NonFiniteData`] for NaN/infinite entries,
    /// [`MarkovError::NegativeProbability`] for negative entries, and
    /// [`MarkovError::DegenerateDistribution`] if a row has no mass.
    pub fn from_array(mut probs: Array2<f64>) -> Result<Self, MarkovError> {
        let (rows, cols) = probs.dim();
        if rows != cols || rows == 0 {
            return Err(MarkovError::NotSquare { rows, cols });
        }
        for (index, &p) in probs.iter().enumerate() {
            if !p.is_finite() {
                return Err(MarkovError::NonFiniteData);
            }
            if p < 0.0 {
                return Err(MarkovError::NegativeProbability { index, value: p });
            }
        }
        if probs.rows().into_iter().any(|row| row.sum() <= 0.0) {
            return Err(MarkovError::DegenerateDistribution);
        }
        renormalize_rows(&mut probs, crate::config::PROPAGATION_TOLERANCE);
        Ok(Self { probs })
    }

    /// Builds a transition matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Same as [`from_array`](Self::from_array); ragged rows are reported as
    /// [`MarkovError::NotSquare`].
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MarkovError> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(MarkovError::NotSquare {
                rows: n,
                cols: bad.len(),
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let probs = Array2::from_shape_vec((n, n), flat).map_err(|_| MarkovError::NotSquare {
            rows: n,
            cols: n,
        })?;
        Self::from_array(probs)
    }

    /// The n×n matrix with every entry equal to `1/n`.
    pub fn uniform(n: usize) -> Self {
        Self::from_probs(Array2::from_elem((n, n), 1.0 / n as f64))
    }

    /// Number of states.
    pub fn n_states(&self) -> usize {
        self.probs.nrows()
    }

    /// Returns the transition probabilities out of state `from`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is out of range.
    pub fn row(&self, from: usize) -> ArrayView1<'_, f64> {
        self.probs.row(from)
    }

    /// Returns the probability of moving from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        self.probs[[from, to]]
    }

    /// Returns the underlying array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.probs
    }

    /// Consumes the matrix and returns the underlying array.
    pub fn into_array(self) -> Array2<f64> {
        self.probs
    }

    /// Validates that the matrix is row-stochastic.
    ///
    /// Checks that all values are finite, in `[0, 1]`, and that each row sums
    /// to 1 within `tolerance`; a larger deviation is
    /// [`MarkovError::NotStochastic`].
    pub fn validate(&self, tolerance: f64) -> Result<(), MarkovError> {
        for (index, &p) in self.probs.iter().enumerate() {
            if !p.is_finite() {
                return Err(MarkovError::NonFiniteData);
            }
            if p < 0.0 {
                return Err(MarkovError::NegativeProbability { index, value: p });
            }
        }
        let deviation = max_row_deviation(&self.probs);
        if deviation > tolerance {
            return Err(MarkovError::NotStochastic { deviation });
        }
        Ok(())
    }
}

/// Smoothed transition counts.
///
/// Every cell starts at the configured pseudo-count and is incremented once
/// per observed transition.
#[derive(Debug, Clone)]
pub struct TransitionCounts {
    counts: Array2<f64>,
    n_transitions: usize,
    n_sequences: usize,
    n_dropped: usize,
}

impl TransitionCounts {
    /// Creates an n×n count matrix filled with `pseudo_count`.
    pub fn new(n_states: usize, pseudo_count: f64) -> Self {
        Self {
            counts: Array2::from_elem((n_states, n_states), pseudo_count),
            n_transitions: 0,
            n_sequences: 0,
            n_dropped: 0,
        }
    }

    /// Counts every consecutive pair of every usable sequence.
    ///
    /// Sequences with an unknown label or fewer than two elements are
    /// dropped with a warning; the rest are counted.
    pub fn from_sequences<S: AsRef<[String]>>(
        sequences: &[S],
        states: &StateSet,
        pseudo_count: f64,
    ) -> Self {
        let mut counts = Self::new(states.len(), pseudo_count);
        for (i, seq) in sequences.iter().enumerate() {
            let seq = seq.as_ref();
            if seq.len() < 2 {
                warn!(sequence = i, len = seq.len(), "sequence too short, dropped");
                counts.n_dropped += 1;
                continue;
            }
            match states.indices_of(seq) {
                Ok(indices) => counts.add_indices(&indices),
                Err(e) => {
                    warn!(sequence = i, error = %e, "sequence has unrecognised state, dropped");
                    counts.n_dropped += 1;
                }
            }
        }
        counts
    }

    /// Counts the transitions of one already-indexed sequence.
    fn add_indices(&mut self, indices: &[usize]) {
        for pair in indices.windows(2) {
            self.counts[[pair[0], pair[1]]] += 1.0;
            self.n_transitions += 1;
        }
        self.n_sequences += 1;
    }

    /// The smoothed count matrix.
    pub fn counts(&self) -> &Array2<f64> {
        &self.counts
    }

    /// Number of observed transitions (excluding the smoothing prior).
    pub fn n_transitions(&self) -> usize {
        self.n_transitions
    }

    /// Number of sequences that contributed transitions.
    pub fn n_sequences(&self) -> usize {
        self.n_sequences
    }

    /// Number of sequences that were dropped.
    pub fn n_dropped(&self) -> usize {
        self.n_dropped
    }

    /// Normalizes every row into a probability distribution.
    ///
    /// A row with no mass (only possible with a zero pseudo-count) becomes
    /// uniform. After division each row is re-checked against `tolerance`.
    pub fn to_matrix(&self, tolerance: f64) -> TransitionMatrix {
        let n = self.counts.nrows();
        let mut probs = self.counts.clone();
        for (i, mut row) in probs.rows_mut().into_iter().enumerate() {
            if row.sum() <= 0.0 {
                debug!(row = i, "row has no counts, using uniform fallback");
                row.fill(1.0 / n as f64);
            } else {
                rescale(row);
            }
        }
        renormalize_rows(&mut probs, tolerance);
        TransitionMatrix::from_probs(probs)
    }
}

/// Estimates the smoothed transition matrix from navigation sequences.
///
/// # Arguments
///
/// * `sequences` - Observed state sequences, each an ordered list of labels.
/// * `states` - Ordered state set defining the matrix indexing.
/// * `config` - Estimation configuration (smoothing pseudo-count, tolerance).
///
/// With no usable sequences the result is built from the smoothing prior
/// alone, i.e. every row is uniform.
///
/// # Errors
///
/// Returns [`MarkovError::InvalidConfig`] if `config` fails validation.
#[tracing::instrument(skip_all, fields(n_sequences = sequences.len(), n_states = states.len()))]
pub fn estimate_transitions<S: AsRef<[String]>>(
    sequences: &[S],
    states: &StateSet,
    config: &MarkovConfig,
) -> Result<TransitionMatrix, MarkovError> {
    config.validate()?;

    let counts = TransitionCounts::from_sequences(sequences, states, config.smoothing());
    if counts.n_sequences() == 0 {
        info!("no usable sequences, matrix reflects the smoothing prior only");
    }
    debug!(
        used = counts.n_sequences(),
        dropped = counts.n_dropped(),
        transitions = counts.n_transitions(),
        "transitions counted"
    );

    Ok(counts.to_matrix(config.estimate_tolerance()))
}
