//! Shared command wiring: project config, compiler flags, adapters, and one
//! orchestrator run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use dbtdiff_core::{project, CompilerOptions, ProjectConfig, RunContext};
use dbtdiff_renderer::Renderer;
use dbtdiff_sync::{
    AutoConfirm, Confirm, DbtCli, GitCli, StdinConfirm, SyncError, SyncOrchestrator, SyncedState,
};

/// Per-project template overrides, relative to the project root.
const TEMPLATE_DIR: &str = ".dbt-diff/templates";

/// Flags passed through to every dbt invocation. Unset flags are omitted.
#[derive(Args, Debug, Clone, Default)]
pub struct CompilerFlags {
    /// dbt target (environment profile); also selects the cache variant.
    #[arg(long)]
    pub target: Option<String>,

    /// JSON-encoded variable overrides.
    #[arg(long, value_name = "JSON")]
    pub vars: Option<String>,

    /// Number of dbt threads.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: Option<u32>,

    /// Directory holding profiles.yml.
    #[arg(long, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,
}

impl CompilerFlags {
    /// dbt runs inside the project root, so a relative `--profiles-dir` is
    /// anchored to the invoking directory here.
    fn options(&self) -> Result<CompilerOptions> {
        let profiles_dir = self.profiles_dir.as_deref().map(absolute).transpose()?;
        Ok(CompilerOptions {
            target: self.target.clone(),
            vars: self.vars.clone(),
            threads: self.threads,
            profiles_dir,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("could not resolve {}", path.display()))
}

/// Flags for commands that run the full sync.
#[derive(Args, Debug, Clone, Default)]
pub struct SyncFlags {
    #[command(flatten)]
    pub compiler: CompilerFlags,

    /// Rebase onto the reference branch without asking when behind it.
    #[arg(short, long)]
    pub yes: bool,
}

/// A dbt project plus the adapters that act on it.
pub struct Workspace {
    root: PathBuf,
    ctx: RunContext,
    pub vcs: GitCli,
    pub compiler: DbtCli,
}

impl Workspace {
    /// Load `.dbt-diff.yml` and merge CLI flags over it.
    pub fn open(project_dir: Option<&Path>, flags: &CompilerFlags) -> Result<Self> {
        // Cache paths are handed to dbt, which runs inside the root; they
        // must not be relative to the invoking directory.
        let root = match project_dir {
            Some(dir) => absolute(dir)?,
            None => std::env::current_dir().context("could not determine current directory")?,
        };
        let config = ProjectConfig::load_at(&root)
            .with_context(|| format!("could not load {}", project::config_path(&root).display()))?;

        let options = flags.options()?.or(config.compiler_defaults());
        tracing::debug!(
            "project {} against {} (variant {})",
            root.display(),
            config.reference_ref(),
            options.variant()
        );

        Ok(Self {
            vcs: GitCli::new(&root, &config),
            compiler: DbtCli::new(config.compiler.clone()),
            ctx: RunContext::new(root.clone(), options),
            root,
        })
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Run the sync protocol, answering the rebase prompt per `--yes`.
    pub fn sync(&self, yes: bool) -> Result<SyncedState> {
        let synced = if yes {
            self.sync_with(&AutoConfirm(true))
        } else {
            self.sync_with(&StdinConfirm)
        }?;
        Ok(synced)
    }

    fn sync_with<P: Confirm>(&self, confirm: &P) -> Result<SyncedState, SyncError> {
        SyncOrchestrator::new(&self.vcs, &self.compiler, confirm, self.ctx.clone()).run()
    }

    /// Renderer honouring `.dbt-diff/templates/` overrides.
    pub fn renderer(&self) -> Result<Renderer> {
        let dir = self.root.join(TEMPLATE_DIR);
        Renderer::with_user_templates(&dir)
            .with_context(|| format!("could not load templates from {}", dir.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cli_profiles_dir_is_anchored_to_invoking_directory() {
        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join("dbt_project.yml"), "name: shop\n").unwrap();
        let flags = CompilerFlags {
            profiles_dir: Some(PathBuf::from("profiles")),
            ..CompilerFlags::default()
        };

        let workspace = Workspace::open(Some(project.path()), &flags).unwrap();
        let profiles = workspace.context().options.profiles_dir.clone().unwrap();
        assert_eq!(profiles, std::env::current_dir().unwrap().join("profiles"));
        assert!(workspace.context().working_dir().is_absolute());
    }

    #[test]
    fn config_profiles_dir_is_left_to_dbt() {
        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join("dbt_project.yml"), "name: shop\n").unwrap();
        std::fs::write(project.path().join(".dbt-diff.yml"), "profiles_dir: ./profiles\n").unwrap();

        let workspace = Workspace::open(Some(project.path()), &CompilerFlags::default()).unwrap();
        assert_eq!(
            workspace.context().options.profiles_dir,
            Some(PathBuf::from("./profiles"))
        );
    }
}
