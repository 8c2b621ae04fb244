//! Host lifecycle integration
//!
//! The host drives the plugin through two entry points:
//! - load: right after the build script is evaluated, resolves eagerly
//! - prepare: before the build starts, re-resolves if configuration changed

use crate::config::{self, ConfigChange, Configuration, Overrides};
use crate::error::Result;
use crate::git::{Git2Opener, Repository, RepositoryOpener};
use crate::logger::BuildLogger;
use crate::project::{Project, DISTRIBUTION_PROPERTY};
use crate::resolver::{self, ResolvedVersion};
use std::path::PathBuf;

/// Lifecycle points at which the host calls the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Load,
    Prepare,
}

impl LifecyclePhase {
    /// Get the phase name as a string
    pub fn name(&self) -> &'static str {
        match self {
            LifecyclePhase::Load => "load",
            LifecyclePhase::Prepare => "prepare",
        }
    }
}

/// Configuration as it was when the version was last resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPhases {
    imported: Option<Configuration>,
}

impl ConfigPhases {
    pub fn imported(&self) -> Option<&Configuration> {
        self.imported.as_ref()
    }

    pub fn record(&mut self, config: Configuration) {
        self.imported = Some(config);
    }

    /// Keys that differ between the imported and the current configuration
    ///
    /// Empty when nothing has been imported yet.
    pub fn changes(&self, current: &Configuration) -> Vec<ConfigChange> {
        self.imported
            .as_ref()
            .map(|imported| current.changes_from(imported))
            .unwrap_or_default()
    }
}

/// Plugin that sets the project version from SemVer git tags
#[derive(Debug)]
pub struct SemverGitTag<O: RepositoryOpener = Git2Opener> {
    opener: O,
    overrides: Overrides,
    settings_path: Option<PathBuf>,
    phases: ConfigPhases,
}

impl SemverGitTag<Git2Opener> {
    /// Create a plugin reading repositories from disk
    pub fn new(overrides: Overrides) -> Self {
        SemverGitTag::with_opener(Git2Opener, overrides)
    }
}

impl<O: RepositoryOpener> SemverGitTag<O> {
    pub fn with_opener(opener: O, overrides: Overrides) -> Self {
        SemverGitTag {
            opener,
            overrides,
            settings_path: None,
            phases: ConfigPhases::default(),
        }
    }

    /// Read settings from `path` instead of the default lookup locations
    pub fn settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn phases(&self) -> &ConfigPhases {
        &self.phases
    }

    /// Apply overrides, settings file values and defaults to the project
    ///
    /// Overrides replace values set by the build script; settings and
    /// defaults only fill keys that are still unset.
    pub fn initialize(&self, project: &mut Project) -> Result<()> {
        self.overrides.apply(project);
        let settings = config::load_settings(&project.basedir, self.settings_path.as_deref())?;
        settings.apply(project);
        config::apply_defaults(project);
        Ok(())
    }

    /// Eager entry point, called when the plugin is loaded
    ///
    /// # Returns
    /// * `Ok(Some(version))` - Version written to the project
    /// * `Ok(None)` - No SemVer tag; the project version is left untouched
    pub fn on_load(
        &mut self,
        project: &mut Project,
        logger: &dyn BuildLogger,
    ) -> Result<Option<ResolvedVersion>> {
        self.initialize(project)?;
        let config = Configuration::from_project(project);
        let resolved = self.resolve_project(project, &config, LifecyclePhase::Load, logger)?;
        self.phases.record(config);
        Ok(resolved)
    }

    /// Late entry point, called before the build is prepared
    ///
    /// Re-resolves only when configuration changed since the last resolution,
    /// logging a warning for every changed key.
    ///
    /// # Returns
    /// * `Ok(Some(version))` - Version was resolved again and written
    /// * `Ok(None)` - Nothing changed, or no SemVer tag was found
    pub fn before_prepare(
        &mut self,
        project: &mut Project,
        logger: &dyn BuildLogger,
    ) -> Result<Option<ResolvedVersion>> {
        if self.phases.imported().is_none() {
            self.initialize(project)?;
        } else {
            let current = Configuration::from_project(project);
            let changes = self.phases.changes(&current);
            if changes.is_empty() {
                return Ok(None);
            }
            for change in &changes {
                logger.warn(&change.to_string());
            }
        }

        let config = Configuration::from_project(project);
        let resolved = self.resolve_project(project, &config, LifecyclePhase::Prepare, logger)?;
        self.phases.record(config);
        Ok(resolved)
    }

    fn resolve_project(
        &self,
        project: &mut Project,
        config: &Configuration,
        phase: LifecyclePhase,
        logger: &dyn BuildLogger,
    ) -> Result<Option<ResolvedVersion>> {
        let root = config.repository_root(project);
        let repo = self.opener.open(&root)?;
        let snapshot = repo.snapshot(&config.version_prefix)?;

        if project.name.is_empty() {
            if let Some(name) = repo.repository_name()? {
                logger.info(&format!("Project name taken from git remote: {}", name));
                project.name = name;
            }
        }

        let config = config.with_changelog_relative_to(&root);
        let resolved = resolver::resolve(&repo, &snapshot, &config, logger)?;

        if let Some(version) = &resolved {
            project.set_version(version.value.clone());
            logger.info(&format!(
                "Project version was changed to: {} ({}), {}: {}",
                version.value,
                phase.name(),
                DISTRIBUTION_PROPERTY,
                project.get_property(DISTRIBUTION_PROPERTY).unwrap_or_default()
            ));
        }

        Ok(resolved)
    }
}
