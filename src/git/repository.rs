use crate::error::{Result, SemverGitTagError};
use crate::git::RepositoryOpener;
use git2::{DiffFormat, DiffOptions, ErrorCode, Oid, Repository as Git2Repo, Status, StatusOptions};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository whose root is `path`
    ///
    /// Parent directories are not searched: a subdirectory of a working tree is
    /// not a repository root.
    ///
    /// # Returns
    /// * `Ok(Git2Repository)` - Repository opened
    /// * `Err(RepositoryNotFound)` - If the path is missing or not a repository
    /// * `Err(Git)` - For any other git failure
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        match Git2Repo::open(path) {
            Ok(repo) => Ok(Git2Repository { repo }),
            Err(e) if e.code() == ErrorCode::NotFound || !path.exists() => {
                Err(SemverGitTagError::RepositoryNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl super::Repository for Git2Repository {
    fn tag_targets(&self) -> Result<Vec<(String, Oid)>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            // Tags on trees or blobs carry no version history
            if let Ok(commit) = reference.peel_to_commit() {
                tags.push((name.to_string(), commit.id()));
            }
        }

        Ok(tags)
    }

    fn head_commit(&self) -> Result<Oid> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id())
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(statuses
            .iter()
            .any(|entry| !entry.status().is_empty() && !entry.status().contains(Status::IGNORED)))
    }

    fn diff_file(&self, from: Option<Oid>, to: Oid, path: &Path) -> Result<String> {
        let old_tree = match from {
            Some(oid) => Some(self.repo.find_commit(oid)?.tree()?),
            None => None,
        };
        let new_tree = self.repo.find_commit(to)?.tree()?;

        let mut options = DiffOptions::new();
        options.pathspec(path).disable_pathspec_match(true);

        let diff =
            self.repo
                .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), Some(&mut options))?;

        let mut patch = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if matches!(line.origin(), '+' | '-' | ' ') {
                patch.push(line.origin());
            }
            patch.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        Ok(patch)
    }

    fn remote_urls(&self) -> Result<Vec<(String, String)>> {
        let names = self.repo.remotes()?;
        let mut remotes = Vec::new();

        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name)?;
            if let Some(url) = remote.url() {
                remotes.push((name.to_string(), url.to_string()));
            }
        }

        Ok(remotes)
    }
}

/// Opens repositories from disk with `git2`
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Opener;

impl RepositoryOpener for Git2Opener {
    type Repo = Git2Repository;

    fn open(&self, path: &Path) -> Result<Git2Repository> {
        Git2Repository::open(path)
    }
}
