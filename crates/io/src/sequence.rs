//! Validated navigation sequences and the records that were skipped.

use std::fmt;

/// One user's ordered platform visits.
///
/// Every label has been checked against the state set and there are at
/// least two of them, so the record contributes at least one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Identifier from the first field of the record.
    pub user_id: String,
    /// Visited states, in order.
    pub states: Vec<String>,
}

impl SequenceRecord {
    /// Consecutive `(from, to)` label pairs.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.states
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
    }
}

impl AsRef<[String]> for SequenceRecord {
    fn as_ref(&self) -> &[String] {
        &self.states
    }
}

/// Why a line did not produce a [`SequenceRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line has no labels after the user identifier (blank lines too).
    NoStates,
    /// One or more labels are not in the state set.
    UnknownStates(Vec<String>),
    /// Only one label, so no transition can be counted.
    TooShort,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStates => write!(f, "no states"),
            Self::UnknownStates(labels) => {
                write!(f, "unrecognised platforms: {}", labels.join(", "))
            }
            Self::TooShort => write!(f, "fewer than 2 states"),
        }
    }
}

/// A skipped input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the input (the header is line 1).
    pub line: usize,
    /// Why the line was skipped.
    pub reason: SkipReason,
}

/// Result of reading a sequence file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceData {
    /// Valid sequences in file order.
    pub records: Vec<SequenceRecord>,
    /// Lines that were dropped, in file order.
    pub skipped: Vec<SkippedLine>,
}

impl SequenceData {
    /// Number of valid sequences.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no valid sequence was read.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of transitions across all sequences.
    pub fn n_transitions(&self) -> usize {
        self.records.iter().map(|r| r.states.len() - 1).sum()
    }

    /// Lines skipped because of unrecognised platforms.
    pub fn n_invalid(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::UnknownStates(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(states: &[&str]) -> SequenceRecord {
        SequenceRecord {
            user_id: "u1".to_string(),
            states: states.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn transitions_are_consecutive_pairs() {
        let r = record(&["OpenAI", "Cohere", "OpenAI"]);
        let pairs: Vec<_> = r.transitions().collect();
        assert_eq!(pairs, vec![("OpenAI", "Cohere"), ("Cohere", "OpenAI")]);
    }

    #[test]
    fn as_ref_exposes_states() {
        let r = record(&["A", "B"]);
        let s: &[String] = r.as_ref();
        assert_eq!(s, &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn skip_reason_display() {
        assert_eq!(SkipReason::NoStates.to_string(), "no states");
        assert_eq!(SkipReason::TooShort.to_string(), "fewer than 2 states");
        assert_eq!(
            SkipReason::UnknownStates(vec!["Mistral".into(), "Grok".into()]).to_string(),
            "unrecognised platforms: Mistral, Grok"
        );
    }

    #[test]
    fn counts() {
        let data = SequenceData {
            records: vec![record(&["A", "B", "C"]), record(&["B", "A"])],
            skipped: vec![
                SkippedLine {
                    line: 4,
                    reason: SkipReason::UnknownStates(vec!["Z".into()]),
                },
                SkippedLine {
                    line: 5,
                    reason: SkipReason::TooShort,
                },
            ],
        };
        assert_eq!(data.len(), 2);
        assert_eq!(data.n_transitions(), 3);
        assert_eq!(data.n_invalid(), 1);
        assert!(!data.is_empty());
    }
}
