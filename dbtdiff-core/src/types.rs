//! Domain types shared by the sync engine, renderer and CLI.
//!
//! All path fields use `PathBuf`; identities are immutable once computed.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Variant used when no compiler target is selected.
pub const DEFAULT_VARIANT: &str = "default";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Build-target label that partitions the artifact cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant(pub String);

impl Variant {
    /// Variant for an optional compiler target; empty or missing means default.
    pub fn from_target(target: Option<&str>) -> Self {
        match target {
            Some(t) if !t.is_empty() => Self(t.to_owned()),
            _ => Self::default(),
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self(DEFAULT_VARIANT.to_owned())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Variant {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Variant {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Workflow identity
// ---------------------------------------------------------------------------

/// Which side of the comparison an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    /// Compiled from the remote reference branch, keyed by short commit id.
    Reference,
    /// Compiled from the working copy, keyed by the diff content hash.
    Local,
}

impl IdentityKind {
    /// Directory name under `target/`. `main` is kept for cache compatibility.
    pub fn dir_name(self) -> &'static str {
        match self {
            IdentityKind::Reference => "main",
            IdentityKind::Local => "local",
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKind::Reference => write!(f, "reference"),
            IdentityKind::Local => write!(f, "local"),
        }
    }
}

/// Cache key for one compiled artifact state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkflowIdentity {
    pub kind: IdentityKind,
    /// Short commit id (reference) or diff hash (local).
    pub reference_id: String,
    pub variant: Variant,
}

impl WorkflowIdentity {
    pub fn reference(short_id: impl Into<String>, variant: Variant) -> Self {
        Self {
            kind: IdentityKind::Reference,
            reference_id: short_id.into(),
            variant,
        }
    }

    pub fn local(diff_hash: impl Into<String>, variant: Variant) -> Self {
        Self {
            kind: IdentityKind::Local,
            reference_id: diff_hash.into(),
            variant,
        }
    }
}

impl fmt::Display for WorkflowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.kind.dir_name(),
            self.variant,
            self.reference_id
        )
    }
}

// ---------------------------------------------------------------------------
// Resource records
// ---------------------------------------------------------------------------

/// One compiled model/test as reported by `dbt ls --output json`.
///
/// `name` and `resource_type` are required; a JSON line without them is not
/// a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    pub resource_type: String,
    #[serde(default)]
    pub package_name: String,
    #[serde(rename = "original_file_path", default)]
    pub original_path: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
}

// ---------------------------------------------------------------------------
// Run context
// ---------------------------------------------------------------------------

/// Optional compiler flags. `None` means the flag is omitted entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// `--target`: environment profile.
    pub target: Option<String>,
    /// `--vars`: JSON-encoded key/value overrides.
    pub vars: Option<String>,
    /// `--threads`: always >= 1 when set.
    pub threads: Option<u32>,
    /// `--profiles-dir`.
    pub profiles_dir: Option<PathBuf>,
}

impl CompilerOptions {
    /// Fill every unset field from `defaults`; fields already set win.
    pub fn or(self, defaults: CompilerOptions) -> Self {
        Self {
            target: self.target.or(defaults.target),
            vars: self.vars.or(defaults.vars),
            threads: self.threads.or(defaults.threads),
            profiles_dir: self.profiles_dir.or(defaults.profiles_dir),
        }
    }

    pub fn variant(&self) -> Variant {
        Variant::from_target(self.target.as_deref())
    }
}

/// Working directory plus compiler options, passed by value to every adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub working_dir: PathBuf,
    pub options: CompilerOptions,
}

impl RunContext {
    pub fn new(working_dir: impl Into<PathBuf>, options: CompilerOptions) -> Self {
        Self {
            working_dir: working_dir.into(),
            options,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn variant(&self) -> Variant {
        self.options.variant()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_defaults_when_target_missing_or_empty() {
        assert_eq!(Variant::from_target(None).to_string(), "default");
        assert_eq!(Variant::from_target(Some("")).to_string(), "default");
        assert_eq!(Variant::from_target(Some("prod")).to_string(), "prod");
    }

    #[test]
    fn identity_display_matches_cache_layout() {
        let id = WorkflowIdentity::reference("abc1234", Variant::default());
        assert_eq!(id.to_string(), "main/default/abc1234");
        let id = WorkflowIdentity::local("deadbeef", Variant::from("dev"));
        assert_eq!(id.to_string(), "local/dev/deadbeef");
    }

    #[test]
    fn cli_options_win_over_config_defaults() {
        let cli = CompilerOptions {
            target: Some("ci".into()),
            ..Default::default()
        };
        let config = CompilerOptions {
            target: Some("dev".into()),
            threads: Some(8),
            ..Default::default()
        };
        let merged = cli.or(config);
        assert_eq!(merged.target.as_deref(), Some("ci"));
        assert_eq!(merged.threads, Some(8));
        assert!(merged.vars.is_none());
        assert_eq!(merged.variant(), Variant::from("ci"));
    }

    #[test]
    fn resource_record_reads_compiler_field_names() {
        let line = r#"{"name":"orders","resource_type":"model","package_name":"shop",
            "original_file_path":"models/orders.sql","database":"analytics",
            "schema":"staging","alias":null}"#;
        let record: ResourceRecord = serde_json::from_str(line).expect("parse");
        assert_eq!(record.original_path, "models/orders.sql");
        assert_eq!(record.database.as_deref(), Some("analytics"));
        assert!(record.alias.is_none());
    }

    #[test]
    fn resource_record_requires_name() {
        let err = serde_json::from_str::<ResourceRecord>(r#"{"resource_type":"model"}"#);
        assert!(err.is_err());
    }
}
