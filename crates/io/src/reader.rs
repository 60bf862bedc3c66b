//! Sequence file reader and label validation.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use aitrends_markov::StateSet;
use tracing::{debug, info, warn};

use crate::error::IoError;
use crate::sequence::{SequenceData, SequenceRecord, SkipReason, SkippedLine};

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading sequence files.
///
/// Defaults: comma-delimited, first line is a header.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    delimiter: char,
    has_header: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

impl ReaderConfig {
    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first line is a header to skip.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Field delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Whether the first line is skipped.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Validate the configuration.
    ///
    /// The delimiter must not be whitespace, since fields are trimmed.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.delimiter.is_whitespace() {
            return Err(IoError::InvalidConfig {
                reason: format!("delimiter must not be whitespace, got {:?}", self.delimiter),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Read and validate a sequence file.
///
/// # Errors
///
/// Returns [`IoError::InvalidConfig`] for a bad configuration,
/// [`IoError::FileNotFound`] if `path` does not exist, and
/// [`IoError::Read`] for any other I/O failure. Malformed records are skipped
/// and reported in [`SequenceData::skipped`].
#[tracing::instrument(skip(states, config), fields(path = %path.display()))]
pub fn read_sequences(
    path: &Path,
    states: &StateSet,
    config: &ReaderConfig,
) -> Result<SequenceData, IoError> {
    config.validate()?;
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data = parse_lines(BufReader::new(file), states, config, path)?;
    info!(
        n_sequences = data.len(),
        n_skipped = data.skipped.len(),
        "sequences loaded"
    );
    Ok(data)
}

/// Parse sequence records from any buffered reader.
///
/// Same rules as [`read_sequences`]; I/O errors are reported against the
/// placeholder path `<reader>`.
pub fn parse_sequences<R: BufRead>(
    reader: R,
    states: &StateSet,
    config: &ReaderConfig,
) -> Result<SequenceData, IoError> {
    config.validate()?;
    parse_lines(reader, states, config, Path::new("<reader>"))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn parse_lines<R: BufRead>(
    reader: R,
    states: &StateSet,
    config: &ReaderConfig,
    path: &Path,
) -> Result<SequenceData, IoError> {
    let mut data = SequenceData::default();
    let skip = usize::from(config.has_header);

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| IoError::Read {
            path: PathBuf::from(path),
            source,
        })?;
        if i < skip {
            continue;
        }
        let line_no = i + 1;
        match parse_record(&line, states, config.delimiter) {
            Ok(record) => data.records.push(record),
            Err(reason) => {
                match &reason {
                    SkipReason::UnknownStates(labels) => {
                        warn!(line = line_no, invalid = ?labels, "line contains unrecognised platforms, skipped");
                    }
                    SkipReason::TooShort | SkipReason::NoStates => {
                        debug!(line = line_no, %reason, "line skipped");
                    }
                }
                data.skipped.push(SkippedLine {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    if data.is_empty() {
        warn!("no valid sequences found");
    }
    Ok(data)
}

/// Parse one record: `user_id, state, state, ...`.
///
/// Fields are trimmed and empty fields ignored.
fn parse_record(line: &str, states: &StateSet, delimiter: char) -> Result<SequenceRecord, SkipReason> {
    let mut fields = line.split(delimiter).map(str::trim);
    let user_id = fields.next().unwrap_or_default().to_string();
    let labels: Vec<String> = fields.filter(|f| !f.is_empty()).map(String::from).collect();

    if labels.is_empty() {
        return Err(SkipReason::NoStates);
    }
    let unknown: Vec<String> = labels
        .iter()
        .filter(|l| !states.contains(l))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(SkipReason::UnknownStates(unknown));
    }
    if labels.len() < 2 {
        return Err(SkipReason::TooShort);
    }
    Ok(SequenceRecord {
        user_id,
        states: labels,
    })
}
