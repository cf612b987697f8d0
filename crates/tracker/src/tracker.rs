//! Per-expectation tracking state.

use metronome_core::{Expectation, Reading, Time};
use crate::evaluator;
use crate::Result;

/// Tracks readings relevant to one expectation.
///
/// Readings are accepted through [`track`](Self::track) only. A reading is
/// relevant when its meter equals the expectation's meter and its value
/// category matches the measure's unit. Relevant readings always move
/// [`last_viewed_reading_date`](Self::last_viewed_reading_date) forward, but
/// only those inside `[from_date, deadline]` are retained.
#[derive(Debug, Clone)]
pub struct ExpectationTracker {
    expectation: Expectation,
    tracked: Vec<Reading>,
    last_viewed: Option<Time>,
}

impl ExpectationTracker {
    /// Create a tracker with no readings.
    pub fn new(expectation: Expectation) -> Self {
        Self {
            expectation,
            tracked: Vec::new(),
            last_viewed: None,
        }
    }

    /// The expectation being tracked.
    pub fn expectation(&self) -> &Expectation {
        &self.expectation
    }

    /// Feed a batch of readings.
    ///
    /// Irrelevant readings are dropped without error. Effects of successive
    /// calls accumulate.
    pub fn track(&mut self, readings: &[Reading]) {
        for reading in readings {
            if !self.is_relevant(reading) {
                continue;
            }

            // Running maximum, so out-of-order batches cannot move it back.
            if self.last_viewed.map_or(true, |seen| reading.date > seen) {
                self.last_viewed = Some(reading.date);
            }

            if self.expectation.covers(reading.date) {
                self.tracked.push(reading.clone());
            }
        }
    }

    /// Retained readings, in the order they were tracked.
    pub fn tracked_readings(&self) -> &[Reading] {
        &self.tracked
    }

    /// Latest date of any relevant reading, inside the window or not.
    pub fn last_viewed_reading_date(&self) -> Option<Time> {
        self.last_viewed
    }

    /// Whether a relevant reading was seen strictly after the deadline.
    pub fn reached_deadline(&self) -> bool {
        self.last_viewed
            .map_or(false, |seen| seen > self.expectation.deadline())
    }

    /// Whether the tracked readings satisfy the expectation.
    ///
    /// Fails only for directions without an evaluation algorithm.
    pub fn has_met_expectation(&self) -> Result<bool> {
        evaluator::evaluate(
            self.expectation.direction(),
            self.expectation.measure(),
            &self.tracked,
        )
    }

    fn is_relevant(&self, reading: &Reading) -> bool {
        reading.meter == self.expectation.meter()
            && self.expectation.measure().unit().accepts(&reading.value)
    }
}
