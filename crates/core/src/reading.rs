//! Reading model - one observed value of a meter.

use serde::{Deserialize, Serialize};
use crate::measure::ReadingValue;
use crate::Time;

/// A single observation of a meter at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Meter name
    pub meter: String,

    /// Observed value
    pub value: ReadingValue,

    /// When the reading was taken
    pub date: Time,
}

impl Reading {
    /// Create a reading.
    pub fn new(meter: impl Into<String>, value: impl Into<ReadingValue>, date: Time) -> Self {
        Self {
            meter: meter.into(),
            value: value.into(),
            date,
        }
    }
}
