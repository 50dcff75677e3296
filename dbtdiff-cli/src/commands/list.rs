//! `dbt-diff list`: sync manifests and list modified resources.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use dbtdiff_renderer::{render_json, render_table};
use dbtdiff_sync::ModelCompiler;

use super::workspace::{SyncFlags, Workspace};

/// Arguments for `dbt-diff list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub flags: SyncFlags,

    /// Only list resources of this kind (model, test, seed, ...).
    #[arg(long, value_name = "KIND")]
    pub resource_type: Option<String>,

    /// Emit machine-readable JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self, project_dir: Option<&Path>) -> Result<()> {
        let workspace = Workspace::open(project_dir, &self.flags.compiler)?;
        let synced = workspace.sync(self.flags.yes)?;

        let resources = workspace
            .compiler
            .list_modified(
                workspace.context(),
                &synced.reference.path,
                self.resource_type.as_deref(),
            )
            .context("could not list modified resources")?;

        if self.json {
            print!("{}", render_json(&resources)?);
        } else {
            print!("{}", render_table(&resources));
        }
        Ok(())
    }
}
