//! Immutable model object tying together states, kernel and initial vector.

use ndarray::{Array1, Array2};
use tracing::info;

use crate::algebra::{n_step_distribution_with_tolerance, n_step_matrix_with_tolerance};
use crate::config::MarkovConfig;
use crate::distribution::Distribution;
use crate::error::MarkovError;
use crate::recommend::{Recommendation, recommend};
use crate::state::StateSet;
use crate::stationary::{StationaryDistribution, stationary_distribution};
use crate::transition::{TransitionMatrix, estimate_transitions};

/// A fitted Markov chain over a fixed state set.
///
/// Built once and passed explicitly to every analysis; nothing is cached or
/// mutated after construction.
///
/// # Example
///
/// ```
/// use aitrends_markov::{Distribution, MarkovConfig, MarkovModel, StateSet};
///
/// let states = StateSet::new(["A", "B"]).unwrap();
/// let sequences = vec![vec!["A".to_string(), "B".to_string()]];
/// let initial = Distribution::from_slice(&[0.5, 0.5]).unwrap();
///
/// let model = MarkovModel::fit(&sequences, states, initial, &MarkovConfig::new()).unwrap();
/// let after_three = model.n_step_distribution(3).unwrap();
/// assert!((after_three.sum() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct MarkovModel {
    states: StateSet,
    matrix: TransitionMatrix,
    initial: Distribution,
    tolerance: f64,
}

impl MarkovModel {
    /// Assembles a model from an existing matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::LengthMismatch`] if the matrix or the initial
    /// distribution does not have one entry per state.
    pub fn new(
        states: StateSet,
        matrix: TransitionMatrix,
        initial: Distribution,
    ) -> Result<Self, MarkovError> {
        if matrix.n_states() != states.len() {
            return Err(MarkovError::LengthMismatch {
                expected: states.len(),
                got: matrix.n_states(),
            });
        }
        if initial.len() != states.len() {
            return Err(MarkovError::LengthMismatch {
                expected: states.len(),
                got: initial.len(),
            });
        }
        Ok(Self {
            states,
            matrix,
            initial,
            tolerance: crate::config::PROPAGATION_TOLERANCE,
        })
    }

    /// Estimates the matrix from sequences and assembles the model.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`estimate_transitions`] and [`MarkovModel::new`].
    pub fn fit<S: AsRef<[String]>>(
        sequences: &[S],
        states: StateSet,
        initial: Distribution,
        config: &MarkovConfig,
    ) -> Result<Self, MarkovError> {
        let matrix = estimate_transitions(sequences, &states, config)?;
        info!(n_states = states.len(), "transition matrix estimated");
        let mut model = Self::new(states, matrix, initial)?;
        model.tolerance = config.propagation_tolerance();
        Ok(model)
    }

    /// The ordered state set.
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// The one-step transition matrix.
    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    /// The initial distribution.
    pub fn initial(&self) -> &Distribution {
        &self.initial
    }

    /// The transition matrix raised to `steps`.
    pub fn n_step_matrix(&self, steps: u32) -> Result<Array2<f64>, MarkovError> {
        n_step_matrix_with_tolerance(self.matrix.as_array(), steps, self.tolerance)
    }

    /// The initial distribution propagated `steps` transitions.
    pub fn n_step_distribution(&self, steps: u32) -> Result<Array1<f64>, MarkovError> {
        self.n_step_distribution_from(self.initial.as_array(), steps)
    }

    /// An arbitrary starting vector propagated `steps` transitions.
    pub fn n_step_distribution_from(
        &self,
        initial: &Array1<f64>,
        steps: u32,
    ) -> Result<Array1<f64>, MarkovError> {
        n_step_distribution_with_tolerance(initial, self.matrix.as_array(), steps, self.tolerance)
    }

    /// The stationary distribution of the chain.
    pub fn stationary(&self) -> Result<StationaryDistribution, MarkovError> {
        stationary_distribution(self.matrix.as_array())
    }

    /// The `top_k` most likely destinations from every state.
    pub fn recommendations(&self, top_k: usize) -> Result<Vec<Recommendation>, MarkovError> {
        recommend(&self.matrix, &self.states, top_k)
    }
}
