//! A set of trackers fed from one reading stream.

use chrono::{DateTime, Utc};
use metronome_core::{Expectation, Reading, Time};
use serde::Serialize;
use tracing::debug;
use crate::tracker::ExpectationTracker;
use crate::TrackerError;

/// Evaluation outcome of one expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Goal met
    Met,
    /// Not met yet, deadline not reached
    Pending,
    /// Not met and the deadline has passed
    Missed,
    /// Direction cannot be evaluated
    Unsupported,
}

impl Outcome {
    /// Classify a tracker's current state.
    pub fn of(tracker: &ExpectationTracker) -> Self {
        match tracker.has_met_expectation() {
            Ok(true) => Outcome::Met,
            Ok(false) if tracker.reached_deadline() => Outcome::Missed,
            Ok(false) => Outcome::Pending,
            Err(TrackerError::UnsupportedDirection(_)) => Outcome::Unsupported,
        }
    }

    /// Upper-case label for reports.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Met => "MET",
            Outcome::Pending => "PENDING",
            Outcome::Missed => "MISSED",
            Outcome::Unsupported => "UNSUPPORTED",
        }
    }
}

/// Status of one expectation at snapshot time.
#[derive(Debug, Clone, Serialize)]
pub struct ExpectationStatus {
    /// The tracked expectation
    pub expectation: Expectation,

    /// Readings retained within the window
    pub tracked_readings: usize,

    /// Latest relevant reading date
    pub last_viewed_reading_date: Option<Time>,

    /// Whether the deadline was passed by a reading
    pub reached_deadline: bool,

    /// Classified outcome
    pub outcome: Outcome,
}

/// Status of every tracker on a board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// One entry per tracker, in registration order
    pub statuses: Vec<ExpectationStatus>,
}

impl BoardSnapshot {
    /// Number of statuses with the given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.statuses.iter().filter(|s| s.outcome == outcome).count()
    }
}

/// Trackers for every expectation seen so far.
///
/// A tracker only sees batches delivered after its expectation was added.
#[derive(Debug, Clone, Default)]
pub struct TrackerBoard {
    trackers: Vec<ExpectationTracker>,
}

impl TrackerBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an expectation and return its tracker index.
    pub fn add(&mut self, expectation: Expectation) -> usize {
        debug!("Tracking expectation: {}", expectation);
        self.trackers.push(ExpectationTracker::new(expectation));
        self.trackers.len() - 1
    }

    /// Deliver one batch to every tracker.
    pub fn track(&mut self, readings: &[Reading]) {
        for tracker in &mut self.trackers {
            tracker.track(readings);
        }
    }

    /// All trackers, in registration order.
    pub fn trackers(&self) -> &[ExpectationTracker] {
        &self.trackers
    }

    /// Tracker at `index`.
    pub fn get(&self, index: usize) -> Option<&ExpectationTracker> {
        self.trackers.get(index)
    }

    /// Number of trackers.
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Whether no expectation was added.
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Take a status snapshot.
    pub fn snapshot(&self) -> BoardSnapshot {
        let statuses = self
            .trackers
            .iter()
            .map(|tracker| ExpectationStatus {
                expectation: tracker.expectation().clone(),
                tracked_readings: tracker.tracked_readings().len(),
                last_viewed_reading_date: tracker.last_viewed_reading_date(),
                reached_deadline: tracker.reached_deadline(),
                outcome: Outcome::of(tracker),
            })
            .collect();

        BoardSnapshot {
            timestamp: Utc::now(),
            statuses,
        }
    }
}
