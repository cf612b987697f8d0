//! Command configuration.

use std::path::PathBuf;
use anyhow::{bail, Result};
use metronome_core::ReadingValue;
use metronome_storage::{parse_value, CommitAuthor};

/// Default readings path template.
pub const DEFAULT_READINGS_PATH: &str = "meters/${repo-branch}.readings";

/// Configuration for a history scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Repository work tree
    pub repo: PathBuf,
    /// Only readings committed for this branch are tracked (None = any)
    pub branch: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            branch: None,
        }
    }
}

/// Configuration for recording readings.
#[derive(Debug, Clone)]
pub struct RecordConfig {
    /// Repository work tree
    pub repo: PathBuf,
    /// Branch the readings belong to
    pub branch: String,
    /// Readings path template, relative to the repository root
    pub readings_path: String,
    /// Commit identity (None = repository config)
    pub author: Option<CommitAuthor>,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            branch: "main".to_string(),
            readings_path: DEFAULT_READINGS_PATH.to_string(),
            author: None,
        }
    }
}

impl RecordConfig {
    /// Message used for readings commits; carries the readings marker.
    pub fn commit_message(&self) -> String {
        format!("Update meter readings [meter-readings:{}]", self.branch)
    }
}

/// Parse a `meter=value` argument. Unquoted words are taken as text.
pub fn parse_assignment(arg: &str) -> Result<(String, ReadingValue)> {
    let Some((name, value)) = arg.split_once('=') else {
        bail!("expected `meter=value`, got `{}`", arg);
    };
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() {
        bail!("missing meter name in `{}`", arg);
    }
    if value.is_empty() {
        bail!("missing value for meter `{}`", name);
    }
    let value = parse_value(value).unwrap_or_else(|| ReadingValue::Text(value.to_string()));
    Ok((name.to_string(), value))
}

/// Build a commit author from optional name and email flags.
pub fn author_from(name: Option<String>, email: Option<String>) -> Result<Option<CommitAuthor>> {
    match (name, email) {
        (Some(name), Some(email)) => Ok(Some(CommitAuthor::new(name, email))),
        (None, None) => Ok(None),
        _ => bail!("--author-name and --author-email must be given together"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment_value_types() {
        assert_eq!(parse_assignment("conversion=0.42").unwrap(), ("conversion".into(), ReadingValue::Number(0.42)));
        assert_eq!(parse_assignment("gdpr = true").unwrap(), ("gdpr".into(), ReadingValue::Boolean(true)));
        assert_eq!(parse_assignment("mood=happy").unwrap(), ("mood".into(), ReadingValue::Text("happy".into())));
        assert_eq!(
            parse_assignment(r#"mood="a b""#).unwrap(),
            ("mood".into(), ReadingValue::Text("a b".into()))
        );
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!(parse_assignment("conversion").is_err());
        assert!(parse_assignment("=1").is_err());
        assert!(parse_assignment("conversion=").is_err());
    }

    #[test]
    fn test_commit_message_carries_marker() {
        let config = RecordConfig {
            branch: "prod".into(),
            ..Default::default()
        };
        assert_eq!(config.commit_message(), "Update meter readings [meter-readings:prod]");
    }

    #[test]
    fn test_author_from_requires_both() {
        assert!(author_from(Some("a".into()), None).is_err());
        assert_eq!(author_from(None, None).unwrap(), None);
        assert_eq!(
            author_from(Some("a".into()), Some("a@b".into())).unwrap(),
            Some(CommitAuthor::new("a", "a@b"))
        );
    }
}
