//! Git history scanning for Metronome.
//!
//! Walks a repository's history oldest-first and extracts the two commit
//! message markers Metronome understands:
//!
//! - `[meter-readings:<branch>]` marks a commit that updated a readings file
//! - `[meter-expect:<text>]` declares an expectation in natural language

#![warn(missing_docs)]

pub mod expectation_text;
pub mod history;
pub mod marker;

pub use expectation_text::parse_expectation;
pub use history::{scan_history, scan_history_with, ExpectationsCommit, ReadingsCommit, ScannedCommit};

/// Result type for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while scanning history.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Git operation error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Expectation text did not follow the grammar
    #[error("invalid expectation `{text}`: {reason}")]
    InvalidExpectation {
        /// Offending text
        text: String,
        /// What was wrong
        reason: String,
    },

    /// Expectation parsed but failed validation
    #[error(transparent)]
    Core(#[from] metronome_core::CoreError),
}
