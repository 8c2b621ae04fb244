use crate::error::{Result, SemverGitTagError};
use crate::git::{Repository, RepositoryOpener};
use git2::Oid;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations
///
/// File contents are recorded per commit; [Repository::diff_file] reports a
/// change whenever the recorded contents differ.
#[derive(Debug, Clone)]
pub struct MockRepository {
    tags: Vec<(String, Oid)>,
    head: Oid,
    dirty: bool,
    files: HashMap<(Oid, PathBuf), String>,
    remotes: Vec<(String, String)>,
}

impl MockRepository {
    /// Create a new empty mock repository with a zero head commit
    pub fn new() -> Self {
        MockRepository {
            tags: Vec::new(),
            head: Oid::zero(),
            dirty: false,
            files: HashMap::new(),
            remotes: Vec::new(),
        }
    }

    /// Add a tag pointing to a commit; insertion order is kept
    pub fn add_tag(&mut self, name: impl Into<String>, commit: Oid) {
        self.tags.push((name.into(), commit));
    }

    pub fn set_head(&mut self, commit: Oid) {
        self.head = commit;
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Record the content of a file at a commit
    pub fn add_file(&mut self, commit: Oid, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert((commit, path.into()), content.into());
    }

    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.push((name.into(), url.into()));
    }

    fn file_at(&self, commit: Oid, path: &Path) -> Option<&str> {
        self.files
            .get(&(commit, path.to_path_buf()))
            .map(String::as_str)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn tag_targets(&self) -> Result<Vec<(String, Oid)>> {
        Ok(self.tags.clone())
    }

    fn head_commit(&self) -> Result<Oid> {
        Ok(self.head)
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn diff_file(&self, from: Option<Oid>, to: Oid, path: &Path) -> Result<String> {
        let old = from.and_then(|commit| self.file_at(commit, path));
        let new = self.file_at(to, path);

        if old == new {
            return Ok(String::new());
        }

        let mut patch = String::new();
        for line in old.unwrap_or_default().lines() {
            patch.push_str(&format!("-{}\n", line));
        }
        for line in new.unwrap_or_default().lines() {
            patch.push_str(&format!("+{}\n", line));
        }
        Ok(patch)
    }

    fn remote_urls(&self) -> Result<Vec<(String, String)>> {
        Ok(self.remotes.clone())
    }
}

/// Hands out clones of itself, standing in for a repository on disk
impl RepositoryOpener for MockRepository {
    type Repo = MockRepository;

    fn open(&self, path: &Path) -> Result<MockRepository> {
        if path.as_os_str().is_empty() {
            return Err(SemverGitTagError::RepositoryNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(self.clone())
    }
}
