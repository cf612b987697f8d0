//! Metronome core data models.
//!
//! This crate defines the records the rest of the workspace passes around:
//! expectations declared in commit history and the meter readings they are
//! judged against.

#![warn(missing_docs)]

mod error;
mod expectation;
mod measure;
mod reading;

pub use error::{CoreError, Result};
pub use expectation::{Direction, Expectation};
pub use measure::{Measure, ReadingValue, Unit};
pub use reading::Reading;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
