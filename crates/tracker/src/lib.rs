//! Expectation tracking
//!
//! Incremental evaluation of expectations against a stream of readings.

#![warn(missing_docs)]

pub mod board;
pub mod evaluator;
pub mod tracker;

pub use board::{BoardSnapshot, ExpectationStatus, Outcome, TrackerBoard};
pub use tracker::ExpectationTracker;

use metronome_core::Direction;

/// Result alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors reported when evaluating an expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// The direction has no evaluation algorithm
    #[error("direction `{0}` is not supported")]
    UnsupportedDirection(Direction),
}
