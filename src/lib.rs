//! Derives a project's version from SemVer git tags.
//!
//! A clean checkout of the highest SemVer tag builds that tag's version;
//! anything else builds the next version with a `.dev` suffix.

pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logger;
pub mod plugin;
pub mod project;
pub mod resolver;

pub use error::{Result, SemverGitTagError};
pub use plugin::SemverGitTag;
pub use project::Project;
pub use resolver::ResolvedVersion;
