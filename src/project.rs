//! Host project model: name, base directory, version and string properties

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Property holding the distribution directory, which embeds the version
pub const DISTRIBUTION_PROPERTY: &str = "dir_dist";

/// Property holding the build output directory
pub const TARGET_DIR_PROPERTY: &str = "dir_target";

/// Project state shared with the host build orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub basedir: PathBuf,
    version: Option<String>,
    properties: BTreeMap<String, String>,
}

impl Project {
    pub fn new(name: impl Into<String>, basedir: impl Into<PathBuf>) -> Self {
        Project {
            name: name.into(),
            basedir: basedir.into(),
            version: None,
            properties: BTreeMap::new(),
        }
    }

    /// Resolved version, `None` until a version has been set
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Set the version and recompute the distribution directory
    pub fn set_version(&mut self, version: impl Into<String>) {
        let version = version.into();
        let dist_dir = self.dist_dir_for(&version);
        self.set_property(DISTRIBUTION_PROPERTY, dist_dir.to_string_lossy());
        self.version = Some(version);
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Set a property only when the build script has not set it yet
    ///
    /// Returns `true` if the value was stored.
    pub fn set_property_if_unset(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let key = key.into();
        if self.has_property(&key) {
            return false;
        }
        self.properties.insert(key, value.into());
        true
    }

    /// Build output directory, `<basedir>/target` unless configured
    pub fn target_dir(&self) -> PathBuf {
        match self.get_property(TARGET_DIR_PROPERTY) {
            Some(dir) if !dir.is_empty() => self.resolve_path(Path::new(dir)),
            _ => self.basedir.join("target"),
        }
    }

    /// `<target>/dist/<name>-<version>`
    pub fn dist_dir_for(&self, version: &str) -> PathBuf {
        self.target_dir()
            .join("dist")
            .join(format!("{}-{}", self.name, version))
    }

    /// Interpret `path` relative to the project base directory
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.basedir.join(path)
        }
    }
}
