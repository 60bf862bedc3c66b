//! Error types for the aitrends-markov crate.

/// Error type for all fallible operations in the aitrends-markov crate.
///
/// Numerical drift (rows or vectors that do not quite sum to 1) is never an
/// error: it is corrected in place and reported through `tracing`. Only
/// structural problems end up here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkovError {
    /// Returned when a transition matrix is not square.
    #[error("transition matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Returned when a vector does not match the number of states.
    #[error("length mismatch: expected {expected} entries, got {got}")]
    LengthMismatch {
        /// Number of states.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// Returned when a state set would contain no states.
    #[error("state set is empty")]
    EmptyStateSet,

    /// Returned when a state name appears more than once.
    #[error("duplicate state: {name:?}")]
    DuplicateState {
        /// The repeated name.
        name: String,
    },

    /// Returned when a state name is not part of the state set.
    #[error("unknown state: {name:?}")]
    UnknownState {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when input contains NaN or infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when a probability or count is negative.
    #[error("negative probability at index {index}: {value}")]
    NegativeProbability {
        /// Flat index of the offending entry.
        index: usize,
        /// The negative value.
        value: f64,
    },

    /// Returned when a matrix row does not sum to 1 within tolerance.
    #[error("matrix is not row-stochastic: row sums deviate from 1 by {deviation:e}")]
    NotStochastic {
        /// Largest absolute deviation of a row sum from 1.
        deviation: f64,
    },

    /// Returned when a vector has no mass left to normalize.
    #[error("distribution has zero total mass")]
    DegenerateDistribution,

    /// Returned when a configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_not_square() {
        let e = MarkovError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(e.to_string(), "transition matrix must be square, got 2x3");
    }

    #[test]
    fn error_length_mismatch() {
        let e = MarkovError::LengthMismatch {
            expected: 5,
            got: 4,
        };
        assert_eq!(e.to_string(), "length mismatch: expected 5 entries, got 4");
    }

    #[test]
    fn error_empty_state_set() {
        assert_eq!(MarkovError::EmptyStateSet.to_string(), "state set is empty");
    }

    #[test]
    fn error_duplicate_state() {
        let e = MarkovError::DuplicateState {
            name: "OpenAI".to_string(),
        };
        assert_eq!(e.to_string(), "duplicate state: \"OpenAI\"");
    }

    #[test]
    fn error_unknown_state() {
        let e = MarkovError::UnknownState {
            name: "Mistral".to_string(),
        };
        assert_eq!(e.to_string(), "unknown state: \"Mistral\"");
    }

    #[test]
    fn error_non_finite_data() {
        assert_eq!(
            MarkovError::NonFiniteData.to_string(),
            "input data contains non-finite values"
        );
    }

    #[test]
    fn error_negative_probability() {
        let e = MarkovError::NegativeProbability {
            index: 3,
            value: -0.5,
        };
        assert_eq!(e.to_string(), "negative probability at index 3: -0.5");
    }

    #[test]
    fn error_not_stochastic() {
        let e = MarkovError::NotStochastic { deviation: 0.1 };
        assert_eq!(
            e.to_string(),
            "matrix is not row-stochastic: row sums deviate from 1 by 1e-1"
        );
    }

    #[test]
    fn error_degenerate_distribution() {
        assert_eq!(
            MarkovError::DegenerateDistribution.to_string(),
            "distribution has zero total mass"
        );
    }

    #[test]
    fn error_invalid_config() {
        let e = MarkovError::InvalidConfig {
            reason: "top_k must be at least 1".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid configuration: top_k must be at least 1"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<MarkovError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<MarkovError>();
    }
}
