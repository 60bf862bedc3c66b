//! # aitrends-io
//!
//! Read labelled navigation sequences from delimited text files and validate
//! them against a [`StateSet`](aitrends_markov::StateSet). Bridges the file
//! format into the `&[Vec<String>]`-style input that
//! [`estimate_transitions`](aitrends_markov::estimate_transitions) expects.
//!
//! Each record is a user identifier followed by the platforms that user
//! visited, in order:
//!
//! ```text
//! user_id,visits
//! u001,OpenAI,Anthropic,OpenAI
//! u002,GoogleAI,HuggingFace
//! ```

mod error;
mod reader;
mod sequence;

pub use error::IoError;
pub use reader::{ReaderConfig, parse_sequences, read_sequences};
pub use sequence::{SequenceData, SequenceRecord, SkipReason, SkippedLine};
