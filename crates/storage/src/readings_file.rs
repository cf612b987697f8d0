//! A readings file tracked in a Git work tree.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use crate::Result;

/// Placeholder replaced with the branch name in readings path templates.
pub const BRANCH_PLACEHOLDER: &str = "${repo-branch}";

/// Identity used for readings commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
}

impl CommitAuthor {
    /// Create an author identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Readings file at a path relative to the root of a Git work tree.
///
/// The storage does not initialize the repository; it must already exist
/// when [`commit`](Self::commit) is called.
#[derive(Debug, Clone)]
pub struct ReadingsFile {
    root: PathBuf,
    relative: PathBuf,
}

impl ReadingsFile {
    /// Readings file at `relative` inside the work tree at `root`.
    pub fn new(root: impl AsRef<Path>, relative: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            relative: relative.as_ref().to_path_buf(),
        }
    }

    /// Readings file from a path template containing `${repo-branch}`.
    pub fn from_template(root: impl AsRef<Path>, template: &str, branch: &str) -> Self {
        Self::new(root, template.replace(BRANCH_PLACEHOLDER, branch))
    }

    /// Path relative to the work tree root.
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Absolute path on disk.
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.relative)
    }

    /// Whether the file currently holds exactly `content`.
    ///
    /// A missing file holds nothing.
    pub async fn contains(&self, content: &str) -> Result<bool> {
        match fs::read_to_string(self.path()).await {
            Ok(existing) => Ok(existing == content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `content`, creating parent directories.
    pub async fn write(&self, content: &str) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content.as_bytes()).await?;
        Ok(())
    }

    /// Stage only this file and commit it on `HEAD`. Returns the commit SHA.
    ///
    /// Without an explicit author the repository's configured signature is used.
    pub fn commit(&self, message: &str, author: Option<&CommitAuthor>) -> Result<String> {
        let repo = git2::Repository::open(&self.root)?;
        let mut index = repo.index()?;
        index.add_path(&self.relative)?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let sig = match author {
            Some(a) => git2::Signature::now(&a.name, &a.email)?,
            None => repo.signature()?,
        };
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());

        let oid = if let Some(parent) = &parent {
            repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[parent])?
        } else {
            repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[])?
        };

        debug!("Committed: {}", message);
        Ok(oid.to_string())
    }

    /// Write and commit `content` unless the file already holds it.
    ///
    /// Returns the new commit SHA, or `None` when nothing changed.
    pub async fn update(
        &self,
        content: &str,
        message: &str,
        author: Option<&CommitAuthor>,
    ) -> Result<Option<String>> {
        if self.contains(content).await? {
            info!("No change in readings, skipping commit");
            return Ok(None);
        }

        self.write(content).await?;
        let sha = self.commit(message, author)?;
        info!("Committed reading changes to \"{}\" via {}", self.relative.display(), sha);
        Ok(Some(sha))
    }
}
