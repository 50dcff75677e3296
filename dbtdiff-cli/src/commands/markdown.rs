//! `dbt-diff markdown`: sync manifests and print inspection snippets.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use dbtdiff_sync::ModelCompiler;

use super::workspace::{SyncFlags, Workspace};

/// Resource kind covered by inspection snippets.
pub(super) const MODEL: &str = "model";

/// Arguments for `dbt-diff markdown`.
#[derive(Args, Debug)]
pub struct MarkdownArgs {
    #[command(flatten)]
    pub flags: SyncFlags,
}

impl MarkdownArgs {
    pub fn run(self, project_dir: Option<&Path>) -> Result<()> {
        let workspace = Workspace::open(project_dir, &self.flags.compiler)?;
        let synced = workspace.sync(self.flags.yes)?;

        let models = workspace
            .compiler
            .list_modified(workspace.context(), &synced.reference.path, Some(MODEL))
            .context("could not list modified models")?;
        tracing::info!("{} modified model(s)", models.len());

        let markdown = workspace
            .renderer()?
            .render_markdown(&models)
            .context("could not render snippets")?;
        print!("{markdown}");
        Ok(())
    }
}
