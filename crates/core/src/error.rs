//! Validation errors for core records.

use crate::{Direction, Time, Unit};

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised when constructing an invalid record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Meter name was empty or whitespace
    #[error("meter name must not be empty")]
    EmptyMeter,

    /// Deadline falls before the start of the window
    #[error("deadline {deadline} is before from date {from_date}")]
    InvertedWindow {
        /// Start of the window
        from_date: Time,
        /// Requested deadline
        deadline: Time,
    },

    /// Numeric target was NaN or infinite
    #[error("measure value must be finite")]
    NonFiniteMeasure,

    /// Direction cannot be judged with this kind of measure
    #[error("direction `{direction}` does not accept a {unit} measure")]
    IncompatibleMeasure {
        /// Declared direction
        direction: Direction,
        /// Unit of the declared measure
        unit: Unit,
    },
}
