//! Most likely destination states per source state.

use crate::error::MarkovError;
use crate::state::StateSet;
use crate::transition::TransitionMatrix;

/// One destination with its one-step transition probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    /// Index of the destination state.
    pub index: usize,
    /// Name of the destination state.
    pub name: String,
    /// Probability of moving there in one step.
    pub prob: f64,
}

/// Ranked destinations for users currently on one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Index of the source state.
    pub from_index: usize,
    /// Name of the source state.
    pub from: String,
    /// Up to `top_k` destinations, most likely first.
    pub destinations: Vec<Destination>,
}

impl Recommendation {
    /// The most likely destination, i.e. the suggested integration target.
    pub fn best(&self) -> Option<&Destination> {
        self.destinations.first()
    }
}

/// Ranks the `top_k` most likely next states for every state.
///
/// Ties keep state order. Self-transitions are ranked like any other
/// destination.
///
/// # Errors
///
/// Returns [`MarkovError::InvalidConfig`] if `top_k` is zero and
/// [`MarkovError::LengthMismatch`] if `states` does not match the matrix.
pub fn recommend(
    matrix: &TransitionMatrix,
    states: &StateSet,
    top_k: usize,
) -> Result<Vec<Recommendation>, MarkovError> {
    if top_k == 0 {
        return Err(MarkovError::InvalidConfig {
            reason: "top_k must be at least 1".to_string(),
        });
    }
    if states.len() != matrix.n_states() {
        return Err(MarkovError::LengthMismatch {
            expected: matrix.n_states(),
            got: states.len(),
        });
    }

    let recs = states
        .iter()
        .map(|(i, from)| {
            let mut ranked: Vec<(usize, f64)> = matrix.row(i).iter().copied().enumerate().collect();
            // Stable sort keeps state order among equal probabilities.
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            let destinations = ranked
                .into_iter()
                .take(top_k)
                .map(|(j, prob)| Destination {
                    index: j,
                    name: states.names()[j].clone(),
                    prob,
                })
                .collect();
            Recommendation {
                from_index: i,
                from: from.to_string(),
                destinations,
            }
        })
        .collect();
    Ok(recs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fixture() -> (TransitionMatrix, StateSet) {
        let tm = TransitionMatrix::from_array(array![
            [0.2, 0.6, 0.2],
            [0.25, 0.25, 0.5],
            [0.1, 0.1, 0.8],
        ])
        .unwrap();
        (tm, StateSet::new(["A", "B", "C"]).unwrap())
    }

    #[test]
    fn sorted_descending() {
        let (tm, states) = fixture();
        let recs = recommend(&tm, &states, 2).unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].from, "A");
        let names: Vec<&str> = recs[0].destinations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(recs[1].best().unwrap().name, "C");
        assert_eq!(recs[2].best().unwrap().index, 2);
    }

    #[test]
    fn ties_keep_state_order() {
        let (tm, states) = fixture();
        let recs = recommend(&tm, &states, 3).unwrap();
        // Row B: A and B tie at 0.25; A comes first.
        let names: Vec<&str> = recs[1].destinations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn top_k_truncates_and_caps() {
        let (tm, states) = fixture();
        assert_eq!(recommend(&tm, &states, 1).unwrap()[0].destinations.len(), 1);
        assert_eq!(recommend(&tm, &states, 10).unwrap()[0].destinations.len(), 3);
    }

    #[test]
    fn zero_top_k_rejected() {
        let (tm, states) = fixture();
        assert!(matches!(
            recommend(&tm, &states, 0),
            Err(MarkovError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn state_count_mismatch() {
        let (tm, _) = fixture();
        let states = StateSet::new(["A", "B"]).unwrap();
        assert_eq!(
            recommend(&tm, &states, 2),
            Err(MarkovError::LengthMismatch {
                expected: 3,
                got: 2
            })
        );
    }
}
