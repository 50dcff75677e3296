//! dbt project root validation and the optional `.dbt-diff.yml` config.
//!
//! # Config file
//!
//! ```yaml
//! remote: origin
//! reference_branch: main
//! git: git
//! compiler: dbt
//! target: dev
//! vars: '{"start_date": "2024-01-01"}'
//! threads: 4
//! profiles_dir: ./profiles
//! ```
//!
//! Every key is optional. A missing file yields [`ProjectConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, StateError};
use crate::types::CompilerOptions;

/// File whose presence marks a dbt project root.
pub const PROJECT_MARKER: &str = "dbt_project.yml";

/// Per-project config file name.
pub const CONFIG_FILE: &str = ".dbt-diff.yml";

/// Fail with [`StateError::ProjectRootMissing`] unless `dir` holds `dbt_project.yml`.
pub fn validate_root(dir: &Path) -> Result<(), StateError> {
    if dir.join(PROJECT_MARKER).is_file() {
        Ok(())
    } else {
        Err(StateError::ProjectRootMissing {
            dir: dir.to_path_buf(),
        })
    }
}

/// `<dir>/.dbt-diff.yml`. Pure, no I/O.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Settings read from `.dbt-diff.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub remote: String,
    pub reference_branch: String,
    /// Version-control executable.
    pub git: String,
    /// Model-compiler executable.
    pub compiler: String,
    pub target: Option<String>,
    pub vars: Option<String>,
    pub threads: Option<u32>,
    pub profiles_dir: Option<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            reference_branch: "main".to_string(),
            git: "git".to_string(),
            compiler: "dbt".to_string(),
            target: None,
            vars: None,
            threads: None,
            profiles_dir: None,
        }
    }
}

impl ProjectConfig {
    /// Load `<dir>/.dbt-diff.yml`, or defaults when the file does not exist.
    pub fn load_at(dir: &Path) -> Result<Self, StateError> {
        let path = config_path(dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        // An empty file deserializes as YAML null.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ProjectConfig = serde_yaml::from_str(&contents)
            .map_err(|source| StateError::ConfigParse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), StateError> {
        if self.threads == Some(0) {
            return Err(StateError::InvalidConfig(
                "threads must be a positive integer".to_string(),
            ));
        }
        if self.remote.is_empty() || self.reference_branch.is_empty() {
            return Err(StateError::InvalidConfig(
                "remote and reference_branch must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Remote-tracking ref compared against, e.g. `origin/main`.
    pub fn reference_ref(&self) -> String {
        format!("{}/{}", self.remote, self.reference_branch)
    }

    /// Compiler defaults contributed by the config file.
    pub fn compiler_defaults(&self) -> CompilerOptions {
        CompilerOptions {
            target: self.target.clone(),
            vars: self.vars.clone(),
            threads: self.threads,
            profiles_dir: self.profiles_dir.clone(),
        }
    }
}
