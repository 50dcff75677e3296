//! dbt-diff core library: domain types, project config, compiled-state cache.
//!
//! - [`types`]: identities, resource records, run context
//! - [`project`]: project root validation and `.dbt-diff.yml`
//! - [`cache`]: on-disk artifact cache keyed by [`WorkflowIdentity`]
//! - [`error`]: [`StateError`]

pub mod cache;
pub mod error;
pub mod project;
pub mod types;

pub use cache::StateCache;
pub use error::StateError;
pub use project::{ProjectConfig, PROJECT_MARKER};
pub use types::{
    CompilerOptions, IdentityKind, ResourceRecord, RunContext, Variant, WorkflowIdentity,
};
