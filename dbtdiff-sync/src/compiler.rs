//! Model-compiler adapter.
//!
//! [`ModelCompiler`] is the seam the orchestrator and CLI drive; [`DbtCli`]
//! invokes `dbt`. Unset [`CompilerOptions`] fields never reach the command
//! line.

use std::path::Path;

use dbtdiff_core::{CompilerOptions, ResourceRecord, RunContext};

use crate::error::SyncError;
use crate::process;

/// Selector that restricts run/test/ls to resources changed since a state.
const STATE_MODIFIED: &str = "state:modified";

pub trait ModelCompiler {
    /// Fail fast with [`SyncError::ToolMissing`] when the compiler is absent.
    ///
    /// Resolved from the project root, like every other invocation.
    fn check_available(&self, ctx: &RunContext) -> Result<(), SyncError>;

    /// Materialise artifacts under `target_dir`, streaming native output.
    fn compile(&self, ctx: &RunContext, target_dir: &Path) -> Result<(), SyncError>;

    /// Run resources that differ from the artifacts at `state`.
    fn run(&self, ctx: &RunContext, state: &Path) -> Result<(), SyncError>;

    /// Test resources that differ from the artifacts at `state`.
    fn test(&self, ctx: &RunContext, state: &Path) -> Result<(), SyncError>;

    /// Resources that differ from `state`, optionally restricted to one kind.
    fn list_modified(
        &self,
        ctx: &RunContext,
        state: &Path,
        resource_type: Option<&str>,
    ) -> Result<Vec<ResourceRecord>, SyncError>;
}

/// Append the set option flags, in a fixed order.
pub fn option_args(options: &CompilerOptions) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(target) = options.target.as_deref().filter(|t| !t.is_empty()) {
        args.extend(["--target".to_string(), target.to_string()]);
    }
    if let Some(vars) = options.vars.as_deref().filter(|v| !v.is_empty()) {
        args.extend(["--vars".to_string(), vars.to_string()]);
    }
    if let Some(threads) = options.threads.filter(|n| *n > 0) {
        args.extend(["--threads".to_string(), threads.to_string()]);
    }
    if let Some(dir) = options.profiles_dir.as_ref() {
        args.extend(["--profiles-dir".to_string(), dir.display().to_string()]);
    }
    args
}

/// Parse line-delimited JSON listing output.
///
/// Lines that are not resource records (log lines, blank lines, JSON log
/// events) are skipped without error.
pub fn parse_listing(output: &str) -> Vec<ResourceRecord> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .filter_map(|line| serde_json::from_str::<ResourceRecord>(line).ok())
        .collect()
}

/// `dbt` subprocess implementation of [`ModelCompiler`].
#[derive(Debug, Clone)]
pub struct DbtCli {
    program: String,
}

impl DbtCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn state_args(action: &str, state: &Path) -> Vec<String> {
        vec![
            action.to_string(),
            "--select".to_string(),
            STATE_MODIFIED.to_string(),
            "--state".to_string(),
            state.display().to_string(),
        ]
    }

    fn with_options(mut base: Vec<String>, ctx: &RunContext) -> Vec<String> {
        base.extend(option_args(&ctx.options));
        base
    }
}

impl ModelCompiler for DbtCli {
    fn check_available(&self, ctx: &RunContext) -> Result<(), SyncError> {
        process::capture(&self.program, &["--version"], ctx.working_dir())
            .map(drop)
            .map_err(|e| {
                tracing::debug!("{} --version failed: {e}", self.program);
                SyncError::ToolMissing {
                    tool: self.program.clone(),
                }
            })
    }

    fn compile(&self, ctx: &RunContext, target_dir: &Path) -> Result<(), SyncError> {
        let base = vec![
            "compile".to_string(),
            "--target-path".to_string(),
            target_dir.display().to_string(),
        ];
        let args = Self::with_options(base, ctx);
        process::stream(&self.program, &args, ctx.working_dir()).map_err(|source| {
            SyncError::Compile {
                target_dir: target_dir.to_path_buf(),
                source: Box::new(source),
            }
        })
    }

    fn run(&self, ctx: &RunContext, state: &Path) -> Result<(), SyncError> {
        let args = Self::with_options(Self::state_args("run", state), ctx);
        process::stream(&self.program, &args, ctx.working_dir())
    }

    fn test(&self, ctx: &RunContext, state: &Path) -> Result<(), SyncError> {
        let args = Self::with_options(Self::state_args("test", state), ctx);
        process::stream(&self.program, &args, ctx.working_dir())
    }

    fn list_modified(
        &self,
        ctx: &RunContext,
        state: &Path,
        resource_type: Option<&str>,
    ) -> Result<Vec<ResourceRecord>, SyncError> {
        let mut base = Self::state_args("ls", state);
        base.extend(["--output".to_string(), "json".to_string()]);
        if let Some(kind) = resource_type {
            base.extend(["--resource-type".to_string(), kind.to_string()]);
        }
        let args = Self::with_options(base, ctx);
        let output = process::capture(&self.program, &args, ctx.working_dir())?;
        Ok(parse_listing(&output))
    }
}
