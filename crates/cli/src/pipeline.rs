//! Scan history and feed every marker commit into a tracker board.

use anyhow::Result;
use metronome_scanner::{parse_expectation, scan_history_with, ScannedCommit};
use metronome_storage::parse_readings;
use metronome_tracker::TrackerBoard;
use tracing::{debug, warn};
use crate::config::ScanConfig;

/// Build a board from the repository's history.
///
/// Unparseable expectations and readings files are logged and skipped.
pub fn build_board(config: &ScanConfig) -> Result<TrackerBoard> {
    let mut board = TrackerBoard::new();

    scan_history_with(&config.repo, |commit| -> Result<()> {
        match commit {
            ScannedCommit::Expectations(c) => {
                for text in &c.expectations {
                    match parse_expectation(text, c.date) {
                        Ok(expectation) => {
                            board.add(expectation);
                        }
                        Err(e) => warn!("Skipping expectation in {}: {}", short(&c.sha), e),
                    }
                }
            }
            ScannedCommit::Readings(c) => {
                if config.branch.as_ref().is_some_and(|b| *b != c.branch) {
                    debug!("Ignoring readings for branch {} in {}", c.branch, short(&c.sha));
                    return Ok(());
                }
                let Some(content) = c.content.as_deref() else {
                    warn!("Readings commit {} changed no file", short(&c.sha));
                    return Ok(());
                };
                match parse_readings(content, c.date) {
                    Ok(readings) => board.track(&readings),
                    Err(e) => warn!("Skipping readings in {}: {}", short(&c.sha), e),
                }
            }
        }
        Ok(())
    })?;

    Ok(board)
}

/// First seven characters of a commit SHA.
pub fn short(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
