//! Discrete-time Markov chain of user switching between AI platforms.
//!
//! This crate estimates a Laplace-smoothed, row-stochastic transition matrix
//! from observed navigation sequences and derives n-step transition
//! matrices, n-step distributions, the stationary distribution and simple
//! per-platform recommendations from it.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │  sequences   │────▶│  transition    │──┬─▶│  algebra         │
//!  │  (labels)    │     │  (estimate P)  │  │  │  (P^n, v·P^n)    │
//!  └──────────────┘     └────────────────┘  │  └──────────────────┘
//!                                           ├─▶ stationary  (π·P = π)
//!                                           └─▶ recommend   (top-k per row)
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use aitrends_markov::{MarkovConfig, StateSet, estimate_transitions, n_step_matrix};
//!
//! let states = StateSet::new(["A", "B", "C"]).unwrap();
//! let sequences = vec![
//!     vec!["A".to_string(), "B".to_string()],
//!     vec!["A".to_string(), "B".to_string()],
//!     vec!["B".to_string(), "C".to_string()],
//!     vec!["C".to_string(), "A".to_string()],
//! ];
//!
//! let p = estimate_transitions(&sequences, &states, &MarkovConfig::new()).unwrap();
//! assert!((p.prob(0, 1) - 0.6).abs() < 1e-12);
//!
//! let p0 = n_step_matrix(p.as_array(), 0).unwrap();
//! assert_eq!(p0, ndarray::Array2::eye(3));
//! ```

pub mod algebra;
pub mod config;
pub mod distribution;
pub mod error;
pub mod model;
pub mod normalize;
pub mod recommend;
pub mod state;
pub mod stationary;
pub mod transition;

pub use algebra::{n_step_distribution, n_step_matrix};
pub use config::MarkovConfig;
pub use distribution::Distribution;
pub use error::MarkovError;
pub use model::MarkovModel;
pub use recommend::{Destination, Recommendation, recommend};
pub use state::StateSet;
pub use stationary::{StationaryDistribution, stationary_distribution};
pub use transition::{TransitionCounts, TransitionMatrix, estimate_transitions};
