use crate::domain::version::parse_semver;
use git2::Oid;
use semver::Version;

/// Represents a git tag together with the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit: Oid,
    prefix: String,
}

impl Tag {
    /// Create a tag without a version prefix
    pub fn new(name: impl Into<String>, commit: Oid) -> Self {
        Tag::with_prefix(name, commit, "")
    }

    /// Create a tag whose version part follows `prefix` (e.g. "v")
    pub fn with_prefix(name: impl Into<String>, commit: Oid, prefix: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            commit,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Tag name with the prefix removed once from the start
    ///
    /// A tag that does not start with the configured prefix has an empty
    /// short name, which never matches as a version.
    pub fn short(&self) -> &str {
        if self.prefix.is_empty() {
            return &self.name;
        }
        self.name.strip_prefix(self.prefix.as_str()).unwrap_or("")
    }

    /// Parsed version of the short name, if it is SemVer
    pub fn semver(&self) -> Option<Version> {
        parse_semver(self.short())
    }
}
