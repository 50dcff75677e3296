//! Version-control adapter: branch, diff, stash and checkout primitives.
//!
//! [`VersionControl`] is the seam the orchestrator drives; [`GitCli`] is the
//! production implementation that shells out to `git` in the project root.
//!
//! ## Stash naming
//!
//! Stashes are named `dbt-diff/<branch>/<diff_hash>` and always located by
//! name in `git stash list`, never by position, so a stash the operator
//! created by hand is never popped by mistake.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use dbtdiff_core::ProjectConfig;

use crate::error::SyncError;
use crate::process;

/// Checkout target meaning "the previously checked-out ref".
pub const PREVIOUS_REF: &str = "-";

/// Length of the hex diff hash used in cache keys and stash names.
pub const DIFF_HASH_LEN: usize = 8;

/// Name of the stash that protects uncommitted work during a reference build.
pub fn stash_name(branch: &str, diff_hash: &str) -> String {
    format!("dbt-diff/{branch}/{diff_hash}")
}

/// Truncated SHA-256 hex digest of a diff.
pub fn hash_diff(diff: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(diff);
    let mut digest = hex::encode(h.finalize());
    digest.truncate(DIFF_HASH_LEN);
    digest
}

/// Handle to a stash created by [`VersionControl::create_stash`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashRecord {
    pub name: String,
    /// `false` when there was nothing to stash and no entry was made.
    pub created: bool,
}

/// Operations the orchestrator needs from the working copy.
pub trait VersionControl {
    /// Remote-tracking ref changes are compared against, e.g. `origin/main`.
    fn reference_ref(&self) -> String;

    /// Current branch name, or `HEAD` when detached.
    fn current_branch(&self) -> Result<String, SyncError>;

    /// Hash of the full diff between the working copy and the reference.
    fn diff_hash(&self) -> Result<String, SyncError>;

    /// Short commit id of the reference ref.
    fn reference_short_id(&self) -> Result<String, SyncError>;

    /// `true` iff the reference has commits the current branch lacks.
    fn is_behind_reference(&self) -> Result<bool, SyncError>;

    fn fetch_reference(&self) -> Result<(), SyncError>;

    fn create_stash(&self, name: &str) -> Result<StashRecord, SyncError>;

    /// Pop the named stash; fails when it does not exist.
    fn pop_stash(&self, stash: &StashRecord) -> Result<(), SyncError>;

    fn stash_exists(&self, name: &str) -> Result<bool, SyncError>;

    /// Switch to a branch, commit, or [`PREVIOUS_REF`].
    fn checkout(&self, git_ref: &str) -> Result<(), SyncError>;

    /// Rebase the current branch; no conflict resolution is attempted.
    fn rebase(&self, onto: &str) -> Result<(), SyncError>;
}

/// `git` subprocess implementation of [`VersionControl`].
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    dir: PathBuf,
    remote: String,
    branch: String,
}

impl GitCli {
    pub fn new(dir: &Path, config: &ProjectConfig) -> Self {
        Self {
            program: config.git.clone(),
            dir: dir.to_path_buf(),
            remote: config.remote.clone(),
            branch: config.reference_branch.clone(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, SyncError> {
        process::capture_trimmed(&self.program, args, &self.dir)
    }

    /// `stash@{n}` of the entry named `name`, if any.
    fn find_stash(&self, name: &str) -> Result<Option<String>, SyncError> {
        let listing = self.run(&["stash", "list"])?;
        Ok(find_stash_ref(&listing, name))
    }
}

/// Locate `name` in `git stash list` output.
///
/// Lines look like `stash@{0}: On feature: dbt-diff/feature/1a2b3c4d`; the
/// message must match exactly, not as a prefix.
pub fn find_stash_ref(listing: &str, name: &str) -> Option<String> {
    let suffix = format!(": {name}");
    listing
        .lines()
        .map(str::trim_end)
        .find(|line| line.ends_with(&suffix))
        .and_then(|line| line.split_once(':'))
        .map(|(stash_ref, _)| stash_ref.to_string())
}

impl VersionControl for GitCli {
    fn reference_ref(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    fn current_branch(&self) -> Result<String, SyncError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn diff_hash(&self) -> Result<String, SyncError> {
        let reference = self.reference_ref();
        let diff = process::capture_raw(&self.program, &["diff", reference.as_str()], &self.dir)?;
        Ok(hash_diff(&diff))
    }

    fn reference_short_id(&self) -> Result<String, SyncError> {
        let reference = self.reference_ref();
        self.run(&["rev-parse", "--short", reference.as_str()])
    }

    fn is_behind_reference(&self) -> Result<bool, SyncError> {
        let range = format!("HEAD..{}", self.reference_ref());
        let args = ["rev-list", "--count", range.as_str()];
        let count = self.run(&args)?;
        let count: u64 = count
            .parse()
            .map_err(|_| SyncError::UnexpectedOutput {
                command: process::command_line(&self.program, &args),
                output: count.clone(),
            })?;
        Ok(count > 0)
    }

    fn fetch_reference(&self) -> Result<(), SyncError> {
        self.run(&["fetch", self.remote.as_str(), self.branch.as_str()])
            .map(drop)
    }

    fn create_stash(&self, name: &str) -> Result<StashRecord, SyncError> {
        let before = self.run(&["stash", "list"])?.lines().count();
        self.run(&["stash", "push", "-m", name])?;
        // `git stash push` exits 0 without creating an entry on a clean tree,
        // and an older entry may already carry the same name.
        let after = self.run(&["stash", "list"])?;
        let created = after.lines().count() > before && find_stash_ref(&after, name).is_some();
        if !created {
            tracing::debug!("nothing to stash for {name}");
        }
        Ok(StashRecord {
            name: name.to_string(),
            created,
        })
    }

    fn pop_stash(&self, stash: &StashRecord) -> Result<(), SyncError> {
        let stash_ref = self
            .find_stash(&stash.name)?
            .ok_or_else(|| SyncError::StashMissing {
                stash: stash.name.clone(),
            })?;
        self.run(&["stash", "pop", stash_ref.as_str()]).map(drop)
    }

    fn stash_exists(&self, name: &str) -> Result<bool, SyncError> {
        Ok(self.find_stash(name)?.is_some())
    }

    fn checkout(&self, git_ref: &str) -> Result<(), SyncError> {
        self.run(&["checkout", git_ref]).map(drop)
    }

    fn rebase(&self, onto: &str) -> Result<(), SyncError> {
        self.run(&["rebase", onto]).map(drop)
    }
}
