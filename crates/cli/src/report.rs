//! Human-readable rendering of scan results.

use std::fmt::Write;
use metronome_scanner::ScannedCommit;
use metronome_tracker::{BoardSnapshot, Outcome};
use crate::pipeline::short;

/// Render a board snapshot as text.
pub fn render_snapshot(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Expectations ({})", snapshot.statuses.len());
    for status in &snapshot.statuses {
        let last = status
            .last_viewed_reading_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "never".to_string());
        let _ = writeln!(
            out,
            "  {:<11} {} | {} readings, last seen {}",
            status.outcome.label(),
            status.expectation,
            status.tracked_readings,
            last,
        );
    }
    let _ = writeln!(
        out,
        "Met: {}  Pending: {}  Missed: {}  Unsupported: {}",
        snapshot.count(Outcome::Met),
        snapshot.count(Outcome::Pending),
        snapshot.count(Outcome::Missed),
        snapshot.count(Outcome::Unsupported),
    );
    out
}

/// Render one scanned marker commit as a single line.
pub fn render_commit(commit: &ScannedCommit) -> String {
    match commit {
        ScannedCommit::Readings(c) => format!(
            "{} {} {} readings:{} {}",
            short(&c.sha),
            c.date.format("%Y-%m-%d %H:%M"),
            c.author,
            c.branch,
            c.path.as_deref().unwrap_or("-"),
        ),
        ScannedCommit::Expectations(c) => format!(
            "{} {} {} expect: {}",
            short(&c.sha),
            c.date.format("%Y-%m-%d %H:%M"),
            c.author,
            c.expectations.join(" | "),
        ),
    }
}
