//! Probability vectors over the state set.

use ndarray::Array1;

use crate::config::PROPAGATION_TOLERANCE;
use crate::error::MarkovError;
use crate::normalize::{Renormalized, renormalize};

/// A probability vector: non-negative entries summing to 1.
///
/// Used for the initial distribution supplied as configuration. Weights that
/// do not sum to 1 are renormalized once at construction, with a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    probs: Array1<f64>,
}

impl Distribution {
    /// Builds a distribution from non-negative weights.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::EmptyStateSet`] for an empty vector,
    /// [`MarkovError::NonFiniteData`] / [`MarkovError::NegativeProbability`]
    /// for invalid entries, and [`MarkovError::DegenerateDistribution`] when
    /// every weight is zero.
    pub fn new(weights: Array1<f64>) -> Result<Self, MarkovError> {
        Self::with_tolerance(weights, PROPAGATION_TOLERANCE)
    }

    /// Like [`new`](Self::new), with an explicit sum tolerance.
    pub fn with_tolerance(mut weights: Array1<f64>, tolerance: f64) -> Result<Self, MarkovError> {
        check_weights(&weights)?;
        if let Renormalized::Degenerate { .. } =
            renormalize(weights.view_mut(), tolerance, "initial distribution")
        {
            return Err(MarkovError::DegenerateDistribution);
        }
        Ok(Self { probs: weights })
    }

    /// Builds a distribution from a slice of weights.
    pub fn from_slice(weights: &[f64]) -> Result<Self, MarkovError> {
        Self::new(Array1::from(weights.to_vec()))
    }

    /// The uniform distribution over `n` states.
    pub fn uniform(n: usize) -> Self {
        Self {
            probs: Array1::from_elem(n, 1.0 / n as f64),
        }
    }

    /// All mass on state `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n`.
    pub fn point_mass(n: usize, index: usize) -> Self {
        let mut probs = Array1::zeros(n);
        probs[index] = 1.0;
        Self { probs }
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Returns `true` if the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Probability of state `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.probs.get(index).copied()
    }

    /// The underlying vector.
    pub fn as_array(&self) -> &Array1<f64> {
        &self.probs
    }

    /// Consumes the distribution and returns the underlying vector.
    pub fn into_array(self) -> Array1<f64> {
        self.probs
    }
}

/// Rejects empty, non-finite and negative weight vectors.
pub(crate) fn check_weights(weights: &Array1<f64>) -> Result<(), MarkovError> {
    if weights.is_empty() {
        return Err(MarkovError::EmptyStateSet);
    }
    for (index, &w) in weights.iter().enumerate() {
        if !w.is_finite() {
            return Err(MarkovError::NonFiniteData);
        }
        if w < 0.0 {
            return Err(MarkovError::NegativeProbability { index, value: w });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn already_normalized_unchanged() {
        let d = Distribution::from_slice(&[0.3, 0.25, 0.15, 0.2, 0.1]).unwrap();
        assert_eq!(d.as_array(), &array![0.3, 0.25, 0.15, 0.2, 0.1]);
    }

    #[test]
    fn weights_renormalized() {
        let d = Distribution::from_slice(&[3.0, 1.0]).unwrap();
        assert_abs_diff_eq!(d.get(0).unwrap(), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(d.get(1).unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn invalid_weights_rejected() {
        assert_eq!(
            Distribution::from_slice(&[]),
            Err(MarkovError::EmptyStateSet)
        );
        assert_eq!(
            Distribution::from_slice(&[0.5, f64::INFINITY]),
            Err(MarkovError::NonFiniteData)
        );
        assert!(matches!(
            Distribution::from_slice(&[0.5, -0.1]),
            Err(MarkovError::NegativeProbability { index: 1, .. })
        ));
        assert_eq!(
            Distribution::from_slice(&[0.0, 0.0]),
            Err(MarkovError::DegenerateDistribution)
        );
    }

    #[test]
    fn uniform_and_point_mass() {
        let u = Distribution::uniform(4);
        assert_abs_diff_eq!(u.as_array().sum(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(u.get(3).unwrap(), 0.25);

        let p = Distribution::point_mass(3, 1);
        assert_eq!(p.as_array(), &array![0.0, 1.0, 0.0]);
        assert_eq!(p.len(), 3);
    }
}
