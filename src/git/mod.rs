//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the read-only Git
//! operations version resolution needs, allowing for a real repository and a
//! mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Opening is abstracted by [RepositoryOpener] so the plugin lifecycle can be
//! driven against either implementation.
//!
//! ```rust
//! # use semver_git_tag::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> semver_git_tag::Result<()> {
//! let snapshot = repo.snapshot("v")?;
//! println!("{} tags, dirty: {}", snapshot.tags.len(), snapshot.is_dirty);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::{Git2Opener, Git2Repository};

use crate::domain::Tag;
use crate::error::Result;
use git2::Oid;
use std::path::Path;

/// Remote conventionally used for the canonical repository
pub const DEFAULT_REMOTE: &str = "origin";

/// State of a repository at the moment of resolution
#[derive(Debug, Clone, PartialEq)]
pub struct RepositorySnapshot {
    /// Tags with the configured version prefix attached
    pub tags: Vec<Tag>,
    /// Commit at the tip of the current branch
    pub head: Oid,
    /// Whether the working tree has uncommitted changes
    pub is_dirty: bool,
}

/// Read-only git operations used for version resolution
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map underlying
/// errors (like `git2::Error`) to the appropriate
/// [crate::error::SemverGitTagError] variants.
pub trait Repository {
    /// Get every tag paired with the commit it points at
    ///
    /// Annotated tags are peeled to their commit. Tags that do not resolve to a
    /// commit are left out.
    fn tag_targets(&self) -> Result<Vec<(String, Oid)>>;

    /// Get the most recent commit of the current branch
    fn head_commit(&self) -> Result<Oid>;

    /// Report whether the working tree has uncommitted changes
    ///
    /// Staged, modified, deleted, renamed and untracked (not ignored) entries
    /// all count.
    fn is_dirty(&self) -> Result<bool>;

    /// Textual diff of one file between two commits
    ///
    /// # Arguments
    /// * `from` - Old commit, or `None` to compare against an empty tree
    /// * `to` - New commit
    /// * `path` - File path relative to the repository root
    ///
    /// # Returns
    /// * `Ok(String)` - Patch text; empty when the file content is identical
    fn diff_file(&self, from: Option<Oid>, to: Oid, path: &Path) -> Result<String>;

    /// Get configured remotes as `(name, url)` pairs in configuration order
    fn remote_urls(&self) -> Result<Vec<(String, String)>>;

    /// Collect tags, head commit and dirty flag in one pass
    fn snapshot(&self, prefix: &str) -> Result<RepositorySnapshot> {
        let tags = self
            .tag_targets()?
            .into_iter()
            .map(|(name, commit)| Tag::with_prefix(name, commit, prefix))
            .collect();

        Ok(RepositorySnapshot {
            tags,
            head: self.head_commit()?,
            is_dirty: self.is_dirty()?,
        })
    }

    /// Human-readable repository name derived from the remotes
    ///
    /// Prefers the "origin" remote, falls back to the first configured one.
    fn repository_name(&self) -> Result<Option<String>> {
        let remotes = self.remote_urls()?;
        let url = remotes
            .iter()
            .find(|(name, _)| name == DEFAULT_REMOTE)
            .or_else(|| remotes.first())
            .map(|(_, url)| url.as_str());

        Ok(url.and_then(repository_name_from_url))
    }
}

/// Opens a repository at a path
pub trait RepositoryOpener {
    type Repo: Repository;

    fn open(&self, path: &Path) -> Result<Self::Repo>;
}

/// Extract the repository name from a remote URL
///
/// Takes the last path segment and strips a trailing `.git`. Handles
/// `https://host/owner/repo.git`, `git@host:owner/repo.git`, `git@host:repo`
/// and plain filesystem paths.
///
/// # Example
/// ```
/// # use semver_git_tag::git::repository_name_from_url;
/// assert_eq!(
///     repository_name_from_url("git@github.com:owner/my-lib.git").as_deref(),
///     Some("my-lib")
/// );
/// ```
pub fn repository_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let segment = trimmed.rsplit(['/', ':', '\\']).next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
