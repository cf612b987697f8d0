//! Readings persistence for Metronome.
//!
//! Readings are stored as a small `name = value` text file inside the
//! repository and committed with Git so the history scanner can find them.

#![warn(missing_docs)]

pub mod codec;
pub mod readings_file;

pub use codec::{parse_readings, parse_value, stringify_readings, AUTOGENERATED_HEADER};
pub use readings_file::{CommitAuthor, ReadingsFile, BRANCH_PLACEHOLDER};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Git operation error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Malformed line in a readings file
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        reason: String,
    },
}
