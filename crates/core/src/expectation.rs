//! Expectation model - a declared goal for a meter.

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::{CoreError, Result};
use crate::measure::Measure;
use crate::Time;

/// A goal declared for a meter: reach `measure` in `direction` before `deadline`.
///
/// Expectations are validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExpectation")]
pub struct Expectation {
    meter: String,
    from_date: Time,
    deadline: Time,
    direction: Direction,
    measure: Measure,
}

impl Expectation {
    /// Create a validated expectation.
    pub fn new(
        meter: impl Into<String>,
        from_date: Time,
        deadline: Time,
        direction: Direction,
        measure: Measure,
    ) -> Result<Self> {
        let meter = meter.into();
        if meter.trim().is_empty() {
            return Err(CoreError::EmptyMeter);
        }
        if deadline < from_date {
            return Err(CoreError::InvertedWindow { from_date, deadline });
        }
        if let Some(value) = measure.as_number() {
            if !value.is_finite() {
                return Err(CoreError::NonFiniteMeasure);
            }
        }

        let unit = measure.unit();
        let compatible = match direction {
            Direction::IncreaseBy
            | Direction::DecreaseBy
            | Direction::IncreaseTo
            | Direction::DecreaseTo => unit.is_numeric(),
            Direction::Become | Direction::Maintain => true,
        };
        if !compatible {
            return Err(CoreError::IncompatibleMeasure { direction, unit });
        }

        Ok(Self {
            meter,
            from_date,
            deadline,
            direction,
            measure,
        })
    }

    /// Name of the judged meter.
    pub fn meter(&self) -> &str {
        &self.meter
    }

    /// Start of the evaluation window.
    pub fn from_date(&self) -> Time {
        self.from_date
    }

    /// Instant by which the goal must be met.
    pub fn deadline(&self) -> Time {
        self.deadline
    }

    /// Kind of comparison.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Target value.
    pub fn measure(&self) -> &Measure {
        &self.measure
    }

    /// Whether `date` falls within `[from_date, deadline]`.
    pub fn covers(&self, date: Time) -> bool {
        self.from_date <= date && date <= self.deadline
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} by {}",
            self.meter,
            self.direction,
            self.measure,
            self.deadline.format("%Y-%m-%d")
        )
    }
}

#[derive(Deserialize)]
struct RawExpectation {
    meter: String,
    from_date: Time,
    deadline: Time,
    direction: Direction,
    measure: Measure,
}

impl TryFrom<RawExpectation> for Expectation {
    type Error = CoreError;

    fn try_from(raw: RawExpectation) -> Result<Self> {
        Expectation::new(raw.meter, raw.from_date, raw.deadline, raw.direction, raw.measure)
    }
}

/// Kind of comparison that defines goal satisfaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Latest reading grows by the measure relative to the first one
    IncreaseBy,
    /// Latest reading shrinks by the measure relative to the first one
    DecreaseBy,
    /// Any reading reaches the measure from below
    IncreaseTo,
    /// Any reading reaches the measure from above
    DecreaseTo,
    /// Latest reading equals the measure
    Become,
    /// Readings stay at the measure (not evaluable yet)
    Maintain,
}

impl Direction {
    /// Every direction, in declaration order.
    pub const ALL: [Direction; 6] = [
        Direction::IncreaseBy,
        Direction::DecreaseBy,
        Direction::IncreaseTo,
        Direction::DecreaseTo,
        Direction::Become,
        Direction::Maintain,
    ];

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::IncreaseBy => "increase_by",
            Direction::DecreaseBy => "decrease_by",
            Direction::IncreaseTo => "increase_to",
            Direction::DecreaseTo => "decrease_to",
            Direction::Become => "become",
            Direction::Maintain => "maintain",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    /// Accepts `increase_by`, `increase by` and any casing of either.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();

        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| format!("unknown direction: {}", s))
    }
}
