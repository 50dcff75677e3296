//! dbt-diff: compile, run and inspect only the dbt models changed against a
//! reference branch.
//!
//! # Usage
//!
//! ```text
//! dbt-diff build    [--target T] [--vars JSON] [--threads N] [--profiles-dir P] [--yes]
//! dbt-diff markdown [same flags]
//! dbt-diff list     [same flags] [--resource-type KIND] [--json]
//! dbt-diff show     [--target T] [--vars JSON] [--threads N] [--profiles-dir P]
//! dbt-diff version
//! ```
//!
//! Every command accepts `-C <dir>` to run against another project root.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{build::BuildArgs, list::ListArgs, markdown::MarkdownArgs, show::ShowArgs};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "DBT_DIFF_LOG";

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "dbt-diff",
    version,
    about = "Build, test and inspect only the dbt models changed against a reference branch",
    long_about = None,
)]
struct Cli {
    /// dbt project root (defaults to the current directory).
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// Log at debug level, including every git and dbt invocation.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sync reference and local manifests, then run and test modified resources.
    Build(BuildArgs),

    /// Sync manifests and print SQL inspection snippets for modified models.
    Markdown(MarkdownArgs),

    /// Sync manifests and list modified resources.
    List(ListArgs),

    /// Print inspection snippets against the cached reference manifest, without syncing.
    Show(ShowArgs),

    /// Print the dbt-diff version.
    Version,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = cli.project_dir.as_deref();
    match cli.command {
        Commands::Build(args) => args.run(project_dir),
        Commands::Markdown(args) => args.run(project_dir),
        Commands::List(args) => args.run(project_dir),
        Commands::Show(args) => args.run(project_dir),
        Commands::Version => {
            println!("dbt-diff {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Log to stderr so snippet and listing output on stdout stays clean.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
