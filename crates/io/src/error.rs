//! Error types for aitrends-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the aitrends-io crate.
///
/// Malformed records are not errors: they are skipped, logged and listed in
/// [`SequenceData::skipped`](crate::SequenceData). Only failures that prevent
/// reading the input at all end up here.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the sequence file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an I/O failure while opening or reading the input.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path being read (`<reader>` for in-memory input).
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when a reader configuration is invalid.
    #[error("invalid reader configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.csv");
    }

    #[test]
    fn display_read() {
        let err = IoError::Read {
            path: PathBuf::from("data.csv"),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "stream did not contain valid UTF-8",
            ),
        };
        assert_eq!(
            err.to_string(),
            "failed to read data.csv: stream did not contain valid UTF-8"
        );
    }

    #[test]
    fn display_invalid_config() {
        let err = IoError::InvalidConfig {
            reason: "delimiter must not be whitespace".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid reader configuration: delimiter must not be whitespace"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
