//! Version computation from a repository snapshot
//!
//! A clean working tree whose head is the commit of the highest SemVer tag is
//! a release: the tag name is used verbatim. Anything else is a development
//! build: the tag's version is bumped by the configured part and suffixed with
//! [DEV_SUFFIX](crate::domain::DEV_SUFFIX).

use crate::config::Configuration;
use crate::domain::version::development_version;
use crate::domain::{select, IncrementPart, Tag};
use crate::error::{Result, SemverGitTagError};
use crate::git::{Repository, RepositorySnapshot};
use crate::logger::BuildLogger;
use std::path::Path;

/// Version picked for the current build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub value: String,
    pub is_release: bool,
}

impl ResolvedVersion {
    pub fn release(value: impl Into<String>) -> Self {
        ResolvedVersion {
            value: value.into(),
            is_release: true,
        }
    }

    pub fn development(value: impl Into<String>) -> Self {
        ResolvedVersion {
            value: value.into(),
            is_release: false,
        }
    }
}

/// Resolve the project version.
///
/// # Arguments
/// * `repo` - Repository used for changelog diffs
/// * `snapshot` - Tags, head commit and dirty flag taken from `repo`
/// * `config` - Effective configuration; the changelog path is relative to the repository root
/// * `logger` - Host logger
///
/// # Returns
/// * `Ok(Some(version))` - Release or development version
/// * `Ok(None)` - No SemVer tag exists; a warning has been logged
/// * `Err(InvalidConfiguration)` - Development build with an unknown increment part
/// * `Err(ChangelogNotUpdated)` - Release whose changelog did not change
pub fn resolve<R: Repository + ?Sized>(
    repo: &R,
    snapshot: &RepositorySnapshot,
    config: &Configuration,
    logger: &dyn BuildLogger,
) -> Result<Option<ResolvedVersion>> {
    let Some(latest) = select(&snapshot.tags, None) else {
        logger.warn(
            "No SemVer git tag found. Consider removing plugin semver-git-tag from the build.",
        );
        return Ok(None);
    };
    logger.info(&format!("Found SemVer tag: {}", latest.name));

    if snapshot.head == latest.commit && !snapshot.is_dirty {
        if let Some(changelog) = &config.changelog_path {
            verify_changelog(repo, changelog, latest, &snapshot.tags, logger)?;
        }
        return Ok(Some(ResolvedVersion::release(latest.name.clone())));
    }

    // Validated here only: a release never looks at the increment part
    let part: IncrementPart = config.increment_part.parse()?;
    let version = development_version(latest.short(), part)?;
    Ok(Some(ResolvedVersion::development(version)))
}

/// Check that `changelog` changed between the previous release and `release`.
///
/// The previous release is the highest SemVer tag other than `release`'s short
/// name. For a first release the file is compared against an empty tree, so it
/// has to exist and be non-empty.
pub fn verify_changelog<R: Repository + ?Sized>(
    repo: &R,
    changelog: &Path,
    release: &Tag,
    tags: &[Tag],
    logger: &dyn BuildLogger,
) -> Result<()> {
    let previous = select(tags, Some(release.short()));
    let previous_name = previous
        .map(|tag| tag.name.clone())
        .unwrap_or_else(|| "initial state".to_string());

    let diff = repo.diff_file(previous.map(|tag| tag.commit), release.commit, changelog)?;
    if diff.is_empty() {
        return Err(SemverGitTagError::ChangelogNotUpdated {
            path: changelog.to_path_buf(),
            previous: previous_name,
            release: release.name.clone(),
        });
    }

    logger.info(&format!(
        "Changelog {} updated between {} and {}",
        changelog.display(),
        previous_name,
        release.name
    ));
    Ok(())
}
