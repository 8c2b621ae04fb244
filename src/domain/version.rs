//! Semantic version grammar, precedence and development bumps
//!
//! The grammar is the SemVer 2.0.0 BNF (https://semver.org/#backusnaur-form-grammar-for-valid-semver-versions)
//! written out as an anchored regular expression.

use crate::error::{Result, SemverGitTagError};
use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Marker appended to bumped versions built past the last release tag
pub const DEV_SUFFIX: &str = ".dev";

const SEMVER_GRAMMAR: &str = concat!(
    r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)",
    r"(?:-((?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)",
    r"(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?",
    r"(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
);

fn grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| Regex::new(SEMVER_GRAMMAR).expect("SemVer grammar must compile"))
}

/// Check whether the whole string is a SemVer 2.0.0 version
pub fn is_semver(text: &str) -> bool {
    grammar().is_match(text)
}

/// Parse a string that matches the SemVer grammar
///
/// Returns `None` for anything outside the grammar, and for numeric
/// components too large to represent.
pub fn parse_semver(text: &str) -> Option<Version> {
    if !is_semver(text) {
        return None;
    }
    Version::parse(text).ok()
}

/// Compare two versions by SemVer precedence
///
/// Major, minor and patch compare numerically, then pre-release identifiers,
/// where a version without pre-release ranks above one with it. Build metadata
/// does not take part in precedence.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Version component bumped for development builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncrementPart {
    Major,
    Minor,
    #[default]
    Patch,
}

impl IncrementPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncrementPart::Major => "major",
            IncrementPart::Minor => "minor",
            IncrementPart::Patch => "patch",
        }
    }
}

impl FromStr for IncrementPart {
    type Err = SemverGitTagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(IncrementPart::Major),
            "minor" => Ok(IncrementPart::Minor),
            "patch" => Ok(IncrementPart::Patch),
            other => Err(SemverGitTagError::invalid_increment_part(other)),
        }
    }
}

impl fmt::Display for IncrementPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bump a version by one component
///
/// The target component is incremented and every lower component reset to 0.
/// Pre-release and build metadata are dropped.
///
/// # Returns
/// * `Ok(Version)` - The bumped version
/// * `Err(Version)` - If the target component is already `u64::MAX`
pub fn bump(version: &Version, part: IncrementPart) -> Result<Version> {
    let next = |value: u64| {
        value.checked_add(1).ok_or_else(|| {
            SemverGitTagError::version(format!(
                "cannot increment {} part of '{}' without overflow",
                part, version
            ))
        })
    };

    Ok(match part {
        IncrementPart::Major => Version::new(next(version.major)?, 0, 0),
        IncrementPart::Minor => Version::new(version.major, next(version.minor)?, 0),
        IncrementPart::Patch => Version::new(version.major, version.minor, next(version.patch)?),
    })
}

/// Build the development version that follows `short`
///
/// # Example
/// ```
/// use semver_git_tag::domain::version::{development_version, IncrementPart};
/// assert_eq!(development_version("1.2.3", IncrementPart::Minor).unwrap(), "1.3.0.dev");
/// ```
pub fn development_version(short: &str, part: IncrementPart) -> Result<String> {
    let version = parse_semver(short).ok_or_else(|| {
        SemverGitTagError::version(format!("'{}' is not a semantic version", short))
    })?;
    Ok(add_dev(&bump(&version, part)?.to_string()))
}

pub fn add_dev(version: &str) -> String {
    format!("{}{}", version, DEV_SUFFIX)
}
