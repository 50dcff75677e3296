//! `dbt-diff build`: sync manifests, then run and test modified resources.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use dbtdiff_sync::ModelCompiler;

use super::workspace::{SyncFlags, Workspace};

/// Arguments for `dbt-diff build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub flags: SyncFlags,
}

impl BuildArgs {
    pub fn run(self, project_dir: Option<&Path>) -> Result<()> {
        let workspace = Workspace::open(project_dir, &self.flags.compiler)?;
        let synced = workspace.sync(self.flags.yes)?;
        let state = &synced.reference.path;

        println!("{} running modified resources...", "▶".cyan().bold());
        workspace
            .compiler
            .run(workspace.context(), state)
            .context("dbt run failed")?;

        println!("{} testing modified resources...", "▶".cyan().bold());
        workspace
            .compiler
            .test(workspace.context(), state)
            .context("dbt test failed")?;

        println!(
            "{} build complete against {} ({})",
            "✓".green().bold(),
            synced.reference.identity.reference_id,
            synced.local.identity.reference_id
        );
        Ok(())
    }
}
