//! `dbt-diff show`: snippets against the cached reference manifest, no sync.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use dbtdiff_sync::{locate_reference, ModelCompiler};

use super::markdown::MODEL;
use super::workspace::{CompilerFlags, Workspace};

/// Arguments for `dbt-diff show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub compiler: CompilerFlags,
}

impl ShowArgs {
    pub fn run(self, project_dir: Option<&Path>) -> Result<()> {
        let workspace = Workspace::open(project_dir, &self.compiler)?;
        workspace.compiler.check_available(workspace.context())?;
        let reference = locate_reference(&workspace.vcs, workspace.context())?;
        tracing::debug!("using {} at {}", reference.identity, reference.path.display());

        let models = workspace
            .compiler
            .list_modified(workspace.context(), &reference.path, Some(MODEL))
            .context("could not list modified models")?;

        let markdown = workspace
            .renderer()?
            .render_markdown(&models)
            .context("could not render snippets")?;
        print!("{markdown}");
        Ok(())
    }
}
