//! # dbtdiff-sync
//!
//! Version-control and model-compiler adapters, and the orchestrator that
//! brings reference and local compiled state up to date.
//!
//! Build a [`SyncOrchestrator`] from a [`VersionControl`], a
//! [`ModelCompiler`] and a [`Confirm`] implementation, then call
//! [`SyncOrchestrator::run`] to get both artifact directories.

pub mod compiler;
pub mod error;
pub mod orchestrator;
mod process;
pub mod prompt;
pub mod vcs;

pub use compiler::{DbtCli, ModelCompiler};
pub use error::{ErrorClass, SyncError};
pub use orchestrator::{locate_reference, ArtifactState, SyncOrchestrator, SyncedState};
pub use prompt::{AutoConfirm, Confirm, StdinConfirm};
pub use vcs::{GitCli, StashRecord, VersionControl};
