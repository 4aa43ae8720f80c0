//! Monoscope CLI entry point

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::Revisions;
use config::{OutputFormat, Settings};

#[derive(Parser)]
#[command(name = "monoscope")]
#[command(version, about = "Find the Go modules impacted by a range of git history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Repository root path (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Settings file (defaults to <root>/.monoscope.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct DiffArgs {
    /// Base revision; empty or the all-zero SHA diffs against nothing
    #[arg(long, default_value = "")]
    base: String,

    /// Head revision; empty means the checked-out HEAD
    #[arg(long, default_value = "")]
    head: String,

    /// Number of leading path segments a changed file is reduced to
    #[arg(long)]
    depth: Option<usize>,

    /// Regex a changed file's path must match
    #[arg(long)]
    pattern: Option<String>,
}

impl DiffArgs {
    fn revisions(&self) -> Revisions {
        Revisions {
            base: self.base.clone(),
            head: self.head.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List changed modules and every module depending on them
    Impacted {
        #[command(flatten)]
        diff: DiffArgs,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Only output module paths
        #[arg(long)]
        path_only: bool,

        /// Never treat the repository root as a module
        #[arg(long)]
        no_root_module: bool,
    },
    /// List directories changed between two revisions
    Changed {
        #[command(flatten)]
        diff: DiffArgs,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// List the modules depending on one module
    Dependents {
        /// Module directory, relative to the root
        #[arg(short, long)]
        module: PathBuf,

        /// Include the module itself in the output
        #[arg(long)]
        include_self: bool,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Only output module paths
        #[arg(long)]
        path_only: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the result.
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("monoscope={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Monoscope v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Repository root: {}", cli.root.display());

    let settings = Settings::load(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Impacted {
            diff,
            format,
            path_only,
            no_root_module,
        } => {
            let mut settings = settings.with_overrides(diff.depth, diff.pattern.clone(), format)?;
            if no_root_module {
                settings.include_root_module = false;
            }
            commands::impacted(&cli.root, &settings, &diff.revisions(), path_only)
        }
        Commands::Changed { diff, format } => {
            let settings = settings.with_overrides(diff.depth, diff.pattern.clone(), format)?;
            commands::changed(&cli.root, &settings, &diff.revisions())
        }
        Commands::Dependents {
            module,
            include_self,
            format,
            path_only,
        } => commands::dependents(
            &cli.root,
            &module,
            include_self,
            format.unwrap_or(settings.format),
            path_only,
        ),
    }
}
