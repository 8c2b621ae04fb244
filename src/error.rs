use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for version resolution
#[derive(Error, Debug)]
pub enum SemverGitTagError {
    #[error("Directory `{}` isn't git repository root.", .path.display())]
    RepositoryNotFound { path: PathBuf },

    #[error(
        "Incorrect value for `increment_part` property. \
         Has to be in (`major`, `minor`, `patch`), but `{value}` passed."
    )]
    InvalidConfiguration { value: String },

    #[error(
        "Changelog `{}` was not updated between `{previous}` and `{release}`",
        .path.display()
    )]
    ChangelogNotUpdated {
        path: PathBuf,
        previous: String,
        release: String,
    },

    #[error("Version error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in semver-git-tag
pub type Result<T> = std::result::Result<T, SemverGitTagError>;

impl SemverGitTagError {
    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemverGitTagError::Version(msg.into())
    }

    pub fn invalid_increment_part(value: impl Into<String>) -> Self {
        SemverGitTagError::InvalidConfiguration {
            value: value.into(),
        }
    }
}

impl From<toml::de::Error> for SemverGitTagError {
    fn from(err: toml::de::Error) -> Self {
        SemverGitTagError::Config(err.to_string())
    }
}
