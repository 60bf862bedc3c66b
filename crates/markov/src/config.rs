//! Configuration for transition-matrix estimation.

use crate::error::MarkovError;

/// Row-sum tolerance checked after estimation.
pub const ESTIMATE_TOLERANCE: f64 = 1e-10;

/// Row/vector-sum tolerance checked before propagating through the chain.
pub const PROPAGATION_TOLERANCE: f64 = 1e-8;

/// Configuration for Markov chain estimation.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use aitrends_markov::MarkovConfig;
///
/// let config = MarkovConfig::new().with_smoothing(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct MarkovConfig {
    smoothing: f64,
    estimate_tolerance: f64,
    propagation_tolerance: f64,
}

impl MarkovConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `smoothing = 1.0` (Laplace add-one),
    /// `estimate_tolerance = 1e-10`, `propagation_tolerance = 1e-8`.
    pub fn new() -> Self {
        Self {
            smoothing: 1.0,
            estimate_tolerance: ESTIMATE_TOLERANCE,
            propagation_tolerance: PROPAGATION_TOLERANCE,
        }
    }

    /// Sets the pseudo-count added to every transition cell before counting.
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Sets the row-sum tolerance applied after estimation.
    pub fn with_estimate_tolerance(mut self, tol: f64) -> Self {
        self.estimate_tolerance = tol;
        self
    }

    /// Sets the tolerance applied to rows and vectors before propagation.
    pub fn with_propagation_tolerance(mut self, tol: f64) -> Self {
        self.propagation_tolerance = tol;
        self
    }

    // --- Accessors ---

    /// Returns the smoothing pseudo-count.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Returns the post-estimation row-sum tolerance.
    pub fn estimate_tolerance(&self) -> f64 {
        self.estimate_tolerance
    }

    /// Returns the pre-propagation tolerance.
    pub fn propagation_tolerance(&self) -> f64 {
        self.propagation_tolerance
    }

    /// Validates this configuration.
    ///
    /// The pseudo-count must be finite and non-negative; both tolerances must
    /// be finite and strictly positive.
    pub fn validate(&self) -> Result<(), MarkovError> {
        if !self.smoothing.is_finite() || self.smoothing < 0.0 {
            return Err(MarkovError::InvalidConfig {
                reason: format!(
                    "smoothing must be finite and non-negative, got {}",
                    self.smoothing
                ),
            });
        }
        Self::validate_tolerance(self.estimate_tolerance, "estimate_tolerance")?;
        Self::validate_tolerance(self.propagation_tolerance, "propagation_tolerance")?;
        Ok(())
    }

    fn validate_tolerance(tol: f64, name: &str) -> Result<(), MarkovError> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(MarkovError::InvalidConfig {
                reason: format!("{name} must be finite and positive, got {tol}"),
            });
        }
        Ok(())
    }
}

impl Default for MarkovConfig {
    fn default() -> Self {
        Self::new()
    }
}
