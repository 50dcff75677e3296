//! Error types for dbtdiff-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from project validation, config loading and cache directory management.
#[derive(Debug, Error)]
pub enum StateError {
    /// Filesystem failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `dbt_project.yml` is missing: not run from a dbt project root.
    #[error("dbt_project.yml not found in {dir} - must run from dbt project root")]
    ProjectRootMissing { dir: PathBuf },

    /// `.dbt-diff.yml` exists but could not be parsed.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Config parsed but holds a value outside its allowed range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StateError {
    StateError::Io {
        path: path.into(),
        source,
    }
}
