//! Chronological walk over commit history.

use std::path::Path;
use chrono::{TimeZone, Utc};
use git2::{Delta, ErrorCode, Repository, Sort};
use metronome_core::Time;
use serde::Serialize;
use tracing::{debug, info};
use crate::{marker, Result, ScanError};

/// A commit carrying a `[meter-readings:<branch>]` marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingsCommit {
    /// Full commit SHA
    pub sha: String,
    /// Author name
    pub author: String,
    /// Commit date
    pub date: Time,
    /// Branch the readings were taken on
    pub branch: String,
    /// First file added or modified by the commit
    pub path: Option<String>,
    /// Content of that file at this commit
    pub content: Option<String>,
}

/// A commit carrying one or more `[meter-expect:<text>]` markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectationsCommit {
    /// Full commit SHA
    pub sha: String,
    /// Author name
    pub author: String,
    /// Commit date
    pub date: Time,
    /// Marker texts in message order
    pub expectations: Vec<String>,
}

/// One marker kind found in a commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScannedCommit {
    /// Readings marker
    Readings(ReadingsCommit),
    /// Expectation markers
    Expectations(ExpectationsCommit),
}

impl ScannedCommit {
    /// SHA of the originating commit.
    pub fn sha(&self) -> &str {
        match self {
            ScannedCommit::Readings(c) => &c.sha,
            ScannedCommit::Expectations(c) => &c.sha,
        }
    }

    /// Date of the originating commit.
    pub fn date(&self) -> Time {
        match self {
            ScannedCommit::Readings(c) => c.date,
            ScannedCommit::Expectations(c) => c.date,
        }
    }
}

/// Scan the repository at `path` and collect every marker commit, oldest first.
pub fn scan_history(path: impl AsRef<Path>) -> Result<Vec<ScannedCommit>> {
    let mut found = Vec::new();
    scan_history_with(path, |commit| {
        found.push(commit);
        Ok::<(), ScanError>(())
    })?;
    Ok(found)
}

/// Scan the repository at `path`, calling `on_commit` for each marker commit
/// oldest first. Stops at the first error returned by the callback.
///
/// A commit with both marker kinds produces the expectations entry first.
pub fn scan_history_with<F, E>(path: impl AsRef<Path>, mut on_commit: F) -> std::result::Result<(), E>
where
    F: FnMut(ScannedCommit) -> std::result::Result<(), E>,
    E: From<ScanError>,
{
    let path = path.as_ref();
    let repo = Repository::open(path).map_err(ScanError::from)?;

    match repo.head() {
        Ok(_) => {}
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            debug!("Repository at {} has no commits", path.display());
            return Ok(());
        }
        Err(e) => return Err(ScanError::from(e).into()),
    }

    let mut walk = repo.revwalk().map_err(ScanError::from)?;
    walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)
        .map_err(ScanError::from)?;
    walk.push_head().map_err(ScanError::from)?;

    let mut visited = 0usize;
    let mut emitted = 0usize;
    for oid in walk {
        let oid = oid.map_err(ScanError::from)?;
        visited += 1;
        for scanned in parse_commit(&repo, oid)? {
            debug!("Found marker commit {}", scanned.sha());
            emitted += 1;
            on_commit(scanned)?;
        }
    }

    info!("Scanned {} commits, {} marker entries", visited, emitted);
    Ok(())
}

fn parse_commit(repo: &Repository, oid: git2::Oid) -> Result<Vec<ScannedCommit>> {
    let commit = repo.find_commit(oid)?;
    let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
    let expectations = marker::expectations(&message);
    let branch = marker::readings_branch(&message);
    if expectations.is_empty() && branch.is_none() {
        return Ok(Vec::new());
    }

    let sha = oid.to_string();
    let author = String::from_utf8_lossy(commit.author().name_bytes()).into_owned();
    let date = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_default();

    let mut out = Vec::new();
    if !expectations.is_empty() {
        out.push(ScannedCommit::Expectations(ExpectationsCommit {
            sha: sha.clone(),
            author: author.clone(),
            date,
            expectations,
        }));
    }
    if let Some(branch) = branch {
        let (path, content) = match changed_file(repo, &commit)? {
            Some((path, content)) => (Some(path), Some(content)),
            None => (None, None),
        };
        out.push(ScannedCommit::Readings(ReadingsCommit {
            sha,
            author,
            date,
            branch,
            path,
            content,
        }));
    }
    Ok(out)
}

// First file added or modified relative to the first parent.
fn changed_file(repo: &Repository, commit: &git2::Commit<'_>) -> Result<Option<(String, String)>> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parents().next() {
        Some(parent) => Some(parent.tree()?),
        None => None,
    };
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

    for delta in diff.deltas() {
        if !matches!(delta.status(), Delta::Added | Delta::Modified) {
            continue;
        }
        let file = delta.new_file();
        let Some(path) = file.path() else {
            continue;
        };
        let blob = repo.find_blob(file.id())?;
        let content = String::from_utf8_lossy(blob.content()).into_owned();
        return Ok(Some((path.to_string_lossy().into_owned(), content)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct TestRepo {
        dir: TempDir,
        repo: Repository,
        clock: i64,
    }

    impl TestRepo {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let repo = Repository::init(dir.path()).unwrap();
            Self {
                dir,
                repo,
                clock: 1_530_000_000,
            }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn commit(&mut self, message: &str) -> git2::Oid {
            self.commit_files(message, &[])
        }

        fn commit_files(&mut self, message: &str, files: &[(&str, &str)]) -> git2::Oid {
            let mut index = self.repo.index().unwrap();
            for (name, contents) in files {
                std::fs::write(self.dir.path().join(name), contents).unwrap();
                index.add_path(Path::new(name)).unwrap();
            }
            index.write().unwrap();
            let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();

            self.clock += 60;
            let sig = git2::Signature::new(
                "everzet",
                "everzet@example.com",
                &git2::Time::new(self.clock, 0),
            )
            .unwrap();
            let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
            let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
            self.repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
                .unwrap()
        }
    }

    fn expectations_of(commit: &ScannedCommit) -> &[String] {
        match commit {
            ScannedCommit::Expectations(c) => &c.expectations,
            other => panic!("expected expectations commit, got {:?}", other),
        }
    }

    fn readings_of(commit: &ScannedCommit) -> &ReadingsCommit {
        match commit {
            ScannedCommit::Readings(c) => c,
            other => panic!("expected readings commit, got {:?}", other),
        }
    }

    fn is_sha(s: &str) -> bool {
        s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn test_empty_repository_yields_nothing() {
        let repo = TestRepo::new();
        assert!(scan_history(repo.path()).unwrap().is_empty());
    }

    #[test]
    fn test_ignores_commits_without_markers() {
        let mut repo = TestRepo::new();
        repo.commit("first commit");
        repo.commit("second commit");
        assert!(scan_history(repo.path()).unwrap().is_empty());
    }

    #[test]
    fn test_readings_marker_in_subject() {
        let mut repo = TestRepo::new();
        repo.commit("metered commit [meter-readings:prod]");

        let found = scan_history(repo.path()).unwrap();
        assert_eq!(found.len(), 1);
        let readings = readings_of(&found[0]);
        assert_eq!(readings.branch, "prod");
        assert!(is_sha(&readings.sha));
        assert_eq!(readings.date.timestamp(), 1_530_000_060);
    }

    #[test]
    fn test_readings_marker_in_body() {
        let mut repo = TestRepo::new();
        repo.commit("metered commit\n\n[meter-readings:test]");

        let found = scan_history(repo.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(readings_of(&found[0]).branch, "test");
    }

    #[test]
    fn test_readings_commit_carries_file_path_and_content() {
        let mut repo = TestRepo::new();
        repo.commit_files("[meter-readings:prod]", &[("file", "file content")]);

        let found = scan_history(repo.path()).unwrap();
        let readings = readings_of(&found[0]);
        assert_eq!(readings.path.as_deref(), Some("file"));
        assert_eq!(readings.content.as_deref(), Some("file content"));
    }

    #[test]
    fn test_readings_commit_reads_modified_file_against_parent() {
        let mut repo = TestRepo::new();
        repo.commit_files("setup", &[("other", "x"), ("readings", "a = 1")]);
        repo.commit_files("[meter-readings:prod]", &[("readings", "a = 2")]);

        let found = scan_history(repo.path()).unwrap();
        let readings = readings_of(&found[0]);
        assert_eq!(readings.path.as_deref(), Some("readings"));
        assert_eq!(readings.content.as_deref(), Some("a = 2"));
    }

    #[test]
    fn test_readings_commit_without_file_changes() {
        let mut repo = TestRepo::new();
        repo.commit("[meter-readings:prod]");

        let found = scan_history(repo.path()).unwrap();
        let readings = readings_of(&found[0]);
        assert_eq!(readings.path, None);
        assert_eq!(readings.content, None);
    }

    #[test]
    fn test_expectation_marker_with_author() {
        let mut repo = TestRepo::new();
        repo.commit("commit [meter-expect: some assumption text]");

        let found = scan_history(repo.path()).unwrap();
        assert_eq!(found.len(), 1);
        match &found[0] {
            ScannedCommit::Expectations(c) => {
                assert!(is_sha(&c.sha));
                assert_eq!(c.author, "everzet");
                assert_eq!(c.expectations, vec!["some assumption text".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_multiple_expectations_in_one_commit() {
        let mut repo = TestRepo::new();
        repo.commit("commit\n\n[meter-expect:one]\n[meter-expect:two]");

        let found = scan_history(repo.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(expectations_of(&found[0]), &["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_commits_are_delivered_chronologically() {
        let mut repo = TestRepo::new();
        repo.commit("commit [meter-expect:one]");
        repo.commit("commit [meter-expect:two]");

        let found = scan_history(repo.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(expectations_of(&found[0]), &["one".to_string()]);
        assert_eq!(expectations_of(&found[1]), &["two".to_string()]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let mut repo = TestRepo::new();
        repo.commit("commit [meter-expect:  one ]");
        repo.commit("commit [meter-readings: prod  ]");

        let found = scan_history(repo.path()).unwrap();
        assert_eq!(expectations_of(&found[0]), &["one".to_string()]);
        assert_eq!(readings_of(&found[1]).branch, "prod");
    }

    #[test]
    fn test_both_markers_emit_expectations_first() {
        let mut repo = TestRepo::new();
        let oid = repo.commit("[meter-readings:prod] [meter-expect:one]");

        let found = scan_history(repo.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert!(matches!(found[0], ScannedCommit::Expectations(_)));
        assert!(matches!(found[1], ScannedCommit::Readings(_)));
        assert_eq!(found[0].sha(), oid.to_string());
        assert_eq!(found[0].date(), found[1].date());
    }

    #[test]
    fn test_callback_error_stops_the_scan() {
        let mut repo = TestRepo::new();
        repo.commit("commit [meter-expect:one]");
        repo.commit("commit [meter-expect:two]");

        let mut calls = 0;
        let result = scan_history_with(repo.path(), |_| {
            calls += 1;
            Err(ScanError::InvalidExpectation {
                text: "one".into(),
                reason: "stop".into(),
            })
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(scan_history(dir.path()), Err(ScanError::Git(_))));
    }
}
