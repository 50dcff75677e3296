//! Reference/local state synchronisation.
//!
//! ## Protocol
//!
//! 1. Validate the project root and compiler availability.
//! 2. Fetch the reference; offer a rebase when the branch is behind it.
//! 3. Reference artifacts, keyed by the reference short id. On a cache miss:
//!    stash → checkout reference → compile → checkout back → pop stash.
//! 4. Local artifacts, keyed by the diff hash. On a cache miss: compile.
//!
//! Any failure inside step 3 rolls back only the steps already completed
//! (checkout back, then pop the stash if it still exists). Rollback
//! failures are logged and never replace the original error. A failed pop
//! in the last step is not rolled back: the stash stays put and the error
//! tells the operator how to recover it.

use std::path::{Path, PathBuf};

use dbtdiff_core::{project, RunContext, StateCache, WorkflowIdentity};

use crate::compiler::ModelCompiler;
use crate::error::SyncError;
use crate::prompt::Confirm;
use crate::vcs::{stash_name, StashRecord, VersionControl, PREVIOUS_REF};

/// One side of the comparison after synchronisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactState {
    pub identity: WorkflowIdentity,
    pub path: PathBuf,
    /// `false` when the entry came from the cache.
    pub compiled: bool,
}

/// Both artifact directories, ready for state comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedState {
    pub reference: ArtifactState,
    pub local: ArtifactState,
}

/// Drives the adapters through one synchronisation run.
pub struct SyncOrchestrator<'a, V, C, P> {
    vcs: &'a V,
    compiler: &'a C,
    confirm: &'a P,
    cache: StateCache,
    ctx: RunContext,
}

impl<'a, V, C, P> SyncOrchestrator<'a, V, C, P>
where
    V: VersionControl,
    C: ModelCompiler,
    P: Confirm,
{
    pub fn new(vcs: &'a V, compiler: &'a C, confirm: &'a P, ctx: RunContext) -> Self {
        let cache = StateCache::new(ctx.working_dir());
        Self {
            vcs,
            compiler,
            confirm,
            cache,
            ctx,
        }
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Ensure reference and local artifacts exist, compiling what is missing.
    pub fn run(&self) -> Result<SyncedState, SyncError> {
        project::validate_root(self.ctx.working_dir())?;
        self.compiler.check_available(&self.ctx)?;

        tracing::info!("analyzing changes...");
        let reference_ref = self.vcs.reference_ref();

        tracing::info!("fetching {reference_ref}...");
        self.vcs.fetch_reference()?;
        self.offer_rebase(&reference_ref)?;

        let short_id = self.vcs.reference_short_id()?;
        let reference = WorkflowIdentity::reference(short_id, self.ctx.variant());
        let reference_path = self.cache.path_for(&reference);

        let compiled = if self.cache.exists(&reference_path) {
            tracing::info!(
                "using cached {reference_ref} manifest ({})",
                reference.reference_id
            );
            false
        } else {
            tracing::info!(
                "compiling {reference_ref} ({})...",
                reference.reference_id
            );
            self.build_reference(&reference_ref, &reference_path)?;
            tracing::info!("{reference_ref} manifest compiled");
            true
        };

        let local = self.build_local()?;
        Ok(SyncedState {
            reference: ArtifactState {
                identity: reference,
                path: reference_path,
                compiled,
            },
            local,
        })
    }

    fn offer_rebase(&self, reference_ref: &str) -> Result<(), SyncError> {
        if !self.vcs.is_behind_reference()? {
            return Ok(());
        }
        tracing::warn!("your branch is behind {reference_ref}");
        let question = format!("Would you like to rebase onto {reference_ref} before continuing?");
        if !self.confirm.confirm(&question) {
            return Ok(());
        }

        tracing::info!("rebasing onto {reference_ref}...");
        self.vcs
            .rebase(reference_ref)
            .map_err(|source| SyncError::Conflict {
                onto: reference_ref.to_string(),
                source: Box::new(source),
            })?;
        tracing::info!("rebase complete");
        Ok(())
    }

    /// Stash, check out the reference, compile it, and restore the working copy.
    fn build_reference(&self, reference_ref: &str, target_dir: &Path) -> Result<(), SyncError> {
        let branch = self.vcs.current_branch()?;
        let diff_hash = self.vcs.diff_hash()?;
        let return_to = if branch == "HEAD" {
            PREVIOUS_REF.to_string()
        } else {
            branch.clone()
        };

        tracing::info!("stashing current changes...");
        let stash = self.vcs.create_stash(&stash_name(&branch, &diff_hash))?;

        if let Err(err) = self.vcs.checkout(reference_ref) {
            self.rollback(&stash, None);
            return Err(err);
        }

        if let Err(err) = self.compile_into(target_dir) {
            self.rollback(&stash, Some(&return_to));
            return Err(err);
        }

        tracing::info!("returning to {branch}...");
        if let Err(err) = self.vcs.checkout(&return_to) {
            self.rollback(&stash, Some(&return_to));
            return Err(err);
        }

        if stash.created {
            tracing::info!("applying stashed changes...");
            self.vcs
                .pop_stash(&stash)
                .map_err(|source| SyncError::StashRestore {
                    stash: stash.name.clone(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    fn build_local(&self) -> Result<ArtifactState, SyncError> {
        let diff_hash = self.vcs.diff_hash()?;
        let identity = WorkflowIdentity::local(diff_hash, self.ctx.variant());
        let path = self.cache.path_for(&identity);

        let compiled = if self.cache.exists(&path) {
            tracing::info!("using cached local manifest ({})", identity.reference_id);
            false
        } else {
            tracing::info!("compiling local changes ({})...", identity.reference_id);
            self.compile_into(&path)?;
            tracing::info!("local manifest compiled");
            true
        };

        Ok(ArtifactState {
            identity,
            path,
            compiled,
        })
    }

    /// Compile into a fresh cache entry; discard the entry when compilation fails.
    fn compile_into(&self, target_dir: &Path) -> Result<(), SyncError> {
        self.cache.ensure_directory(target_dir)?;
        if let Err(err) = self.compiler.compile(&self.ctx, target_dir) {
            if let Err(discard) = self.cache.discard_partial(target_dir) {
                tracing::warn!("failed to discard {}: {discard}", target_dir.display());
            }
            return Err(err);
        }
        Ok(())
    }

    /// Best-effort inverse of the steps already taken. Never fails.
    fn rollback(&self, stash: &StashRecord, return_to: Option<&str>) {
        tracing::info!("cleaning up...");
        if let Some(git_ref) = return_to {
            if let Err(err) = self.vcs.checkout(git_ref) {
                tracing::warn!("cleanup: checkout {git_ref} failed: {err}");
            }
        }

        if !stash.created {
            return;
        }
        match self.vcs.stash_exists(&stash.name) {
            Ok(true) => {
                if let Err(err) = self.vcs.pop_stash(stash) {
                    tracing::warn!("cleanup: could not pop stash '{}': {err}", stash.name);
                }
            }
            Ok(false) => {}
            Err(err) => tracing::warn!("cleanup: could not list stashes: {err}"),
        }
    }
}

/// Cached reference artifacts for the current reference commit, without syncing.
pub fn locate_reference<V: VersionControl>(
    vcs: &V,
    ctx: &RunContext,
) -> Result<ArtifactState, SyncError> {
    project::validate_root(ctx.working_dir())?;
    let cache = StateCache::new(ctx.working_dir());
    let identity = WorkflowIdentity::reference(vcs.reference_short_id()?, ctx.variant());
    let path = cache.path_for(&identity);
    if !cache.exists(&path) {
        return Err(SyncError::ReferenceNotCached { path });
    }
    Ok(ArtifactState {
        identity,
        path,
        compiled: false,
    })
}
