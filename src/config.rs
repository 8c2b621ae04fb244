use crate::error::Result;
use crate::project::Project;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the project directory and the user config directory
pub const SETTINGS_FILE: &str = "semver-git-tag.toml";

/// Increment part used when nothing else is configured
pub const DEFAULT_INCREMENT_PART: &str = "patch";

/// Configuration keys recognized by the plugin.
///
/// Each key is stored as a project property of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    IncrementPart,
    RepositoryDir,
    ChangelogPath,
    VersionPrefix,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::IncrementPart,
        ConfigKey::RepositoryDir,
        ConfigKey::ChangelogPath,
        ConfigKey::VersionPrefix,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::IncrementPart => "increment_part",
            ConfigKey::RepositoryDir => "repository_dir",
            ConfigKey::ChangelogPath => "changelog_path",
            ConfigKey::VersionPrefix => "version_prefix",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ConfigKey::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Value applied at initialization when nothing else set the key
    fn default_value(&self) -> Option<&'static str> {
        match self {
            ConfigKey::IncrementPart => Some(DEFAULT_INCREMENT_PART),
            ConfigKey::VersionPrefix => Some(""),
            ConfigKey::RepositoryDir | ConfigKey::ChangelogPath => None,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Effective plugin configuration, read from project properties.
///
/// `increment_part` stays raw text: an unknown value is only an error once a
/// development version has to be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub increment_part: String,
    pub repository_dir: Option<PathBuf>,
    pub changelog_path: Option<PathBuf>,
    pub version_prefix: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            increment_part: DEFAULT_INCREMENT_PART.to_string(),
            repository_dir: None,
            changelog_path: None,
            version_prefix: String::new(),
        }
    }
}

impl Configuration {
    /// Read the configuration from project properties
    ///
    /// Empty path properties count as unset.
    pub fn from_project(project: &Project) -> Self {
        let path = |key: ConfigKey| {
            project
                .get_property(key.name())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };

        Configuration {
            increment_part: project
                .get_property(ConfigKey::IncrementPart.name())
                .unwrap_or(DEFAULT_INCREMENT_PART)
                .to_string(),
            repository_dir: path(ConfigKey::RepositoryDir),
            changelog_path: path(ConfigKey::ChangelogPath),
            version_prefix: project
                .get_property(ConfigKey::VersionPrefix.name())
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Value of one key in property form, `None` when unset
    pub fn value(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::IncrementPart => Some(self.increment_part.clone()),
            ConfigKey::RepositoryDir => self
                .repository_dir
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            ConfigKey::ChangelogPath => self
                .changelog_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            ConfigKey::VersionPrefix => Some(self.version_prefix.clone()),
        }
    }

    /// Keys whose value differs from `previous`, in key order
    pub fn changes_from(&self, previous: &Configuration) -> Vec<ConfigChange> {
        ConfigKey::ALL
            .into_iter()
            .filter_map(|key| {
                let before = previous.value(key);
                let after = self.value(key);
                (before != after).then_some(ConfigChange {
                    key,
                    previous: before,
                    current: after,
                })
            })
            .collect()
    }

    /// Repository root: the configured directory, else the project base directory
    pub fn repository_root(&self, project: &Project) -> PathBuf {
        match &self.repository_dir {
            Some(dir) => project.resolve_path(dir),
            None => project.basedir.clone(),
        }
    }

    /// Copy of this configuration with the changelog path made relative to `root`
    ///
    /// Both paths are canonicalized when they exist, so `..` components and
    /// symlinks in either of them do not prevent the match. Absolute paths
    /// outside `root` are kept as they are.
    pub fn with_changelog_relative_to(&self, root: &Path) -> Configuration {
        let changelog_path = self.changelog_path.as_ref().map(|path| {
            if let Ok(relative) = path.strip_prefix(root) {
                return relative.to_path_buf();
            }
            if !path.is_absolute() {
                return path.clone();
            }
            canonical(path)
                .strip_prefix(canonical(root))
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone())
        });

        Configuration {
            changelog_path,
            ..self.clone()
        }
    }
}

/// Canonical form of `path`; a missing file is resolved through its parent
fn canonical(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// A configuration key that changed after the version was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    pub key: ConfigKey,
    pub previous: Option<String>,
    pub current: Option<String>,
}

impl fmt::Display for ConfigChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Property `{}` changed from `{}` to `{}` after the version was resolved",
            self.key,
            self.previous.as_deref().unwrap_or("<unset>"),
            self.current.as_deref().unwrap_or("<unset>")
        )
    }
}

/// Command-line style overrides supplied by the host's argument parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    values: BTreeMap<ConfigKey, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect overrides from `key=value` tokens
    ///
    /// Tokens without `=` or naming an unknown key are ignored. Later tokens
    /// win over earlier ones.
    ///
    /// # Example
    /// ```
    /// # use semver_git_tag::config::{ConfigKey, Overrides};
    /// let overrides = Overrides::from_tokens(["publish", "increment_part=minor"]);
    /// assert_eq!(overrides.get(ConfigKey::IncrementPart), Some("minor"));
    /// ```
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Overrides::new();
        for token in tokens {
            if let Some((name, value)) = token.as_ref().split_once('=') {
                if let Some(key) = ConfigKey::from_name(name.trim()) {
                    overrides.set(key, value);
                }
            }
        }
        overrides
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Write every override into the project, replacing existing values
    pub fn apply(&self, project: &mut Project) {
        for (key, value) in &self.values {
            project.set_property(key.name(), value.clone());
        }
    }
}

/// Values read from a `semver-git-tag.toml` settings file
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub increment_part: Option<String>,

    #[serde(default)]
    pub repository_dir: Option<PathBuf>,

    #[serde(default)]
    pub changelog_path: Option<PathBuf>,

    #[serde(default)]
    pub version_prefix: Option<String>,
}

impl Settings {
    fn value(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::IncrementPart => self.increment_part.clone(),
            ConfigKey::RepositoryDir => self
                .repository_dir
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            ConfigKey::ChangelogPath => self
                .changelog_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            ConfigKey::VersionPrefix => self.version_prefix.clone(),
        }
    }

    /// Fill in keys the project has not set yet
    pub fn apply(&self, project: &mut Project) {
        for key in ConfigKey::ALL {
            if let Some(value) = self.value(key) {
                project.set_property_if_unset(key.name(), value);
            }
        }
    }
}

/// Fill in default values for keys nobody has set
pub fn apply_defaults(project: &mut Project) {
    for key in ConfigKey::ALL {
        if let Some(value) = key.default_value() {
            project.set_property_if_unset(key.name(), value);
        }
    }
}

/// Loads plugin settings from file or returns empty settings.
///
/// Attempts to load settings in the following order:
/// 1. Custom path provided as parameter
/// 2. `semver-git-tag.toml` in the project base directory
/// 3. `semver-git-tag.toml` in the user config directory
/// 4. Empty settings if no file found
///
/// # Arguments
/// * `basedir` - Project base directory
/// * `settings_path` - Optional path to a custom settings file
///
/// # Returns
/// * `Ok(Settings)` - Loaded or empty settings
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_settings(basedir: &Path, settings_path: Option<&Path>) -> Result<Settings> {
    let local_path = basedir.join(SETTINGS_FILE);

    let content = if let Some(path) = settings_path {
        fs::read_to_string(path)?
    } else if local_path.exists() {
        fs::read_to_string(&local_path)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(SETTINGS_FILE);
        if user_path.exists() {
            fs::read_to_string(user_path)?
        } else {
            return Ok(Settings::default());
        }
    } else {
        return Ok(Settings::default());
    };

    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}
