//! Error types for dbtdiff-sync.

use std::path::PathBuf;

use thiserror::Error;

use dbtdiff_core::StateError;

/// Coarse failure class, used for exit reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Not run from a valid project root, or bad config.
    Config,
    /// A required external tool is not installed.
    Dependency,
    /// A subprocess exited non-zero or misbehaved.
    ExternalTool,
    /// Rebase could not complete; operator must resolve and re-run.
    Conflict,
    /// The compiler failed to produce artifacts.
    Compile,
}

/// All errors that can arise while synchronising compiled state.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Project validation, config or cache directory failure.
    #[error(transparent)]
    State(#[from] StateError),

    /// The executable could not be found.
    #[error("{tool} not found in PATH - please install {tool}")]
    ToolMissing { tool: String },

    /// A subprocess exited non-zero; `stderr` holds its own diagnostics when captured.
    #[error("`{command}` failed ({status}){}", stderr_suffix(.stderr))]
    ExternalTool {
        tool: String,
        command: String,
        status: String,
        stderr: String,
    },

    /// A subprocess succeeded but printed something we could not interpret.
    #[error("`{command}` returned unexpected output: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    /// Spawning a subprocess failed for a reason other than "not found".
    #[error("I/O error running {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// `git rebase` did not complete.
    #[error("rebase onto {onto} failed - please resolve conflicts and run again")]
    Conflict {
        onto: String,
        #[source]
        source: Box<SyncError>,
    },

    /// The compiler failed; the partial artifact directory has been discarded.
    #[error("compile into {} failed", .target_dir.display())]
    Compile {
        target_dir: PathBuf,
        #[source]
        source: Box<SyncError>,
    },

    /// No stash entry carries the expected name.
    #[error("no stash named '{stash}' exists")]
    StashMissing { stash: String },

    /// Popping the stash failed after the reference build; local changes are still stashed.
    #[error(
        "failed to apply stash '{stash}' - your changes are still stashed; \
         recover them with `git stash list` and `git stash pop`"
    )]
    StashRestore {
        stash: String,
        #[source]
        source: Box<SyncError>,
    },

    /// `show` needs a reference artifact that has not been compiled yet.
    #[error("reference manifest not found at {} - run 'dbt-diff markdown' or 'dbt-diff build' first", .path.display())]
    ReferenceNotCached { path: PathBuf },
}

impl SyncError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SyncError::State(_) | SyncError::ReferenceNotCached { .. } => ErrorClass::Config,
            SyncError::ToolMissing { .. } => ErrorClass::Dependency,
            SyncError::Conflict { .. } => ErrorClass::Conflict,
            SyncError::Compile { .. } => ErrorClass::Compile,
            SyncError::ExternalTool { .. }
            | SyncError::UnexpectedOutput { .. }
            | SyncError::Io { .. }
            | SyncError::StashMissing { .. }
            | SyncError::StashRestore { .. } => ErrorClass::ExternalTool,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
