//! Direction-specific evaluators.
//!
//! Each evaluator is a pure function of the tracked readings and the
//! expectation's measure. The first tracked reading is the baseline and the
//! last one is the latest.

use metronome_core::{Direction, Measure, Reading};
use crate::{Result, TrackerError};

/// Decide whether `readings` satisfy `measure` for `direction`.
pub fn evaluate(direction: Direction, measure: &Measure, readings: &[Reading]) -> Result<bool> {
    match direction {
        Direction::IncreaseBy => Ok(increase_by(measure, readings)),
        Direction::DecreaseBy => Ok(decrease_by(measure, readings)),
        Direction::IncreaseTo => Ok(increase_to(measure, readings)),
        Direction::DecreaseTo => Ok(decrease_to(measure, readings)),
        Direction::Become => Ok(becomes(measure, readings)),
        Direction::Maintain => Err(TrackerError::UnsupportedDirection(direction)),
    }
}

/// Latest reading rose by at least the measure over the baseline.
pub fn increase_by(measure: &Measure, readings: &[Reading]) -> bool {
    let Some((baseline, latest)) = baseline_and_latest(readings) else {
        return false;
    };
    match *measure {
        Measure::Percent(target) => latest >= baseline * (1.0 + target / 100.0),
        Measure::Number(target) => latest >= baseline + target,
        _ => false,
    }
}

/// Latest reading fell by at least the measure below the baseline.
pub fn decrease_by(measure: &Measure, readings: &[Reading]) -> bool {
    let Some((baseline, latest)) = baseline_and_latest(readings) else {
        return false;
    };
    match *measure {
        Measure::Percent(target) => latest <= baseline * (1.0 - target / 100.0),
        Measure::Number(target) => latest <= baseline - target,
        _ => false,
    }
}

/// Some reading reached the target or went above it.
pub fn increase_to(measure: &Measure, readings: &[Reading]) -> bool {
    let Some(target) = measure.as_number() else {
        return false;
    };
    numbers(readings).any(|v| v >= target)
}

/// Some reading reached the target or went below it.
pub fn decrease_to(measure: &Measure, readings: &[Reading]) -> bool {
    let Some(target) = measure.as_number() else {
        return false;
    };
    numbers(readings).any(|v| v <= target)
}

/// The latest reading equals the target; earlier matches do not count.
pub fn becomes(measure: &Measure, readings: &[Reading]) -> bool {
    readings
        .last()
        .map(|latest| measure.matches(&latest.value))
        .unwrap_or(false)
}

fn numbers(readings: &[Reading]) -> impl Iterator<Item = f64> + '_ {
    readings.iter().filter_map(|r| r.value.as_number())
}

// A single reading is only a baseline.
fn baseline_and_latest(readings: &[Reading]) -> Option<(f64, f64)> {
    if readings.len() < 2 {
        return None;
    }
    let baseline = readings.first()?.value.as_number()?;
    let latest = readings.last()?.value.as_number()?;
    Some((baseline, latest))
}
