//! Prune configuration: built-in defaults, optional autoprune.json, CLI overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::paths;
use crate::utils::{io, validation};

/// How an artifact line becomes the branch name handed to `git push -d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum NameMode {
    /// Remove every `/` from the line.
    #[default]
    StripSeparators,
    /// Drop the lister's leading `/`, or a leading `<remote>/`, and keep inner separators.
    RemotePrefix,
}

/// Everything both steps need, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    /// Remote that deletions are pushed to.
    pub remote: String,
    /// Branch list written by the lister and read by the pruner.
    pub artifact: String,
    /// Substring a remote branch must contain to be pruned.
    pub marker: String,
    pub name_mode: NameMode,
    /// Directory git runs in.
    pub repo_dir: String,
    /// Turn listing failures into errors and failed deletions into a non-zero exit.
    pub strict: bool,
    /// List and derive names without deleting anything.
    pub dry_run: bool,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            artifact: default_artifact(),
            marker: default_marker(),
            name_mode: NameMode::default(),
            repo_dir: default_repo_dir(),
            strict: false,
            dry_run: false,
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_artifact() -> String {
    "branch_list".to_string()
}

fn default_marker() -> String {
    "auto-patch".to_string()
}

fn default_repo_dir() -> String {
    ".".to_string()
}

/// Values given on the command line. `None` keeps the loaded value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub remote: Option<String>,
    pub artifact: Option<String>,
    pub marker: Option<String>,
    pub name_mode: Option<NameMode>,
    pub repo_dir: Option<String>,
    pub strict: Option<bool>,
    pub dry_run: Option<bool>,
}

impl PruneConfig {
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(remote) = overrides.remote {
            self.remote = remote;
        }
        if let Some(artifact) = overrides.artifact {
            self.artifact = artifact;
        }
        if let Some(marker) = overrides.marker {
            self.marker = marker;
        }
        if let Some(name_mode) = overrides.name_mode {
            self.name_mode = name_mode;
        }
        if let Some(repo_dir) = overrides.repo_dir {
            self.repo_dir = repo_dir;
        }
        if let Some(strict) = overrides.strict {
            self.strict = strict;
        }
        if let Some(dry_run) = overrides.dry_run {
            self.dry_run = dry_run;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let remote = validation::require_non_empty(&self.remote, "remote", "Remote cannot be empty")?;
        validation::require_no_whitespace(remote, "remote", "Remote name cannot contain whitespace")?;
        validation::require_non_empty(&self.marker, "marker", "Marker cannot be empty")?;
        validation::require_non_empty(&self.artifact, "artifact", "Artifact path cannot be empty")?;
        validation::require_non_empty(&self.repo_dir, "repo_dir", "Repository directory cannot be empty")?;
        Ok(())
    }

    /// Artifact location. Relative paths stay relative to the working directory.
    pub fn artifact_path(&self) -> PathBuf {
        expand_path(&self.artifact)
    }

    pub fn repo_path(&self) -> PathBuf {
        expand_path(&self.repo_dir)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

// =============================================================================
// Loading functions
// =============================================================================

/// Path of the config file that would be read.
pub fn config_path(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand_path(path)),
        None => paths::autoprune_json(),
    }
}

/// Load config from a file.
///
/// A missing explicit file is an error; a missing default file means built-in defaults.
pub fn load_config(explicit: Option<&str>) -> Result<PruneConfig> {
    let path = config_path(explicit)?;

    match load_config_from_file(&path)? {
        Some(config) => Ok(config),
        None if explicit.is_some() => Err(Error::config_not_found(path.display().to_string())),
        None => Ok(PruneConfig::default()),
    }
}

fn load_config_from_file(path: &Path) -> Result<Option<PruneConfig>> {
    let Some(content) = io::read_file_if_exists(path, &format!("read {}", path.display()))? else {
        return Ok(None);
    };

    let config: PruneConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    Ok(Some(config))
}

/// Load, apply overrides, validate.
pub fn resolve(explicit: Option<&str>, overrides: ConfigOverrides) -> Result<PruneConfig> {
    let config = load_config(explicit)?.apply(overrides);
    config.validate()?;
    Ok(config)
}
