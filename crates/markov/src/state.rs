//! Ordered state space of the chain.

use std::collections::HashMap;

use crate::error::MarkovError;

/// An ordered, fixed set of platform identifiers.
///
/// The order of the names defines the row/column index of every matrix and
/// vector built against this set, so the same `StateSet` must be used for the
/// whole lifetime of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl StateSet {
    /// Builds a state set from names in index order.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::EmptyStateSet`] if `names` is empty,
    /// [`MarkovError::InvalidConfig`] for a blank name, and
    /// [`MarkovError::DuplicateState`] if a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self, MarkovError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(MarkovError::EmptyStateSet);
        }
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(MarkovError::InvalidConfig {
                    reason: format!("state name at position {i} is blank"),
                });
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(MarkovError::DuplicateState { name: name.clone() });
            }
        }
        Ok(Self { names, index })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// State names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Zero-based index of `name`, if it belongs to the set.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name of the state at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns `true` if `name` is a known state.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Maps a sequence of labels to indices.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::UnknownState`] for the first unrecognised label.
    pub fn indices_of<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, MarkovError> {
        labels
            .iter()
            .map(|l| {
                let l = l.as_ref();
                self.index_of(l).ok_or_else(|| MarkovError::UnknownState {
                    name: l.to_string(),
                })
            })
            .collect()
    }

    /// Iterates over `(index, name)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }
}
