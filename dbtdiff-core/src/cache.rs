//! Compiled-state cache.
//!
//! # Storage layout
//!
//! ```text
//! <project>/target/
//!   main/<variant>/<short_id>/manifest.json     (reference artifacts)
//!   local/<variant>/<diff_hash>/manifest.json   (working-copy artifacts)
//! ```
//!
//! `manifest.json` is the only validity signal. Entries are never updated in
//! place and never expire; a directory is only removed after a failed compile
//! into it.

use std::path::{Path, PathBuf};

use crate::error::{io_err, StateError};
use crate::types::WorkflowIdentity;

/// Marker file written by the compiler into a finished artifact directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Artifact cache rooted at a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCache {
    root: PathBuf,
}

impl StateCache {
    /// Cache rooted at `<project_dir>/target`.
    pub fn new(project_dir: &Path) -> Self {
        Self {
            root: project_dir.join("target"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<main|local>/<variant>/<id>`. Pure, no I/O.
    pub fn path_for(&self, identity: &WorkflowIdentity) -> PathBuf {
        self.root
            .join(identity.kind.dir_name())
            .join(&identity.variant.0)
            .join(&identity.reference_id)
    }

    /// `true` iff `<path>/manifest.json` is present.
    pub fn exists(&self, path: &Path) -> bool {
        path.join(MANIFEST_FILE).is_file()
    }

    /// Create `path` and all ancestors. Idempotent.
    pub fn ensure_directory(&self, path: &Path) -> Result<(), StateError> {
        std::fs::create_dir_all(path).map_err(|e| io_err(path, e))
    }

    /// Remove an entry left behind by a failed compile, manifest included.
    ///
    /// Callers only pass directories that were not valid before the compile.
    pub fn discard_partial(&self, path: &Path) -> Result<(), StateError> {
        if !path.exists() {
            return Ok(());
        }
        tracing::debug!("discarding partial artifact dir {}", path.display());
        std::fs::remove_dir_all(path).map_err(|e| io_err(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variant;

    #[test]
    fn path_for_is_pure() {
        let cache = StateCache::new(Path::new("/nonexistent/project"));
        let id = WorkflowIdentity::reference("abc1234", Variant::default());
        assert_eq!(
            cache.path_for(&id),
            PathBuf::from("/nonexistent/project/target/main/default/abc1234")
        );
        assert!(!cache.exists(&cache.path_for(&id)));
    }
}
