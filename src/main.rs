//! nativelibs - native library tree assembler.
//!
//! Builds, per build unit and module:
//! - libs/ and assetLibs/ (merged per-ABI shared objects)
//! - metadata.txt (SHA-1 manifest for incremental installs)

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use nativelibs::config::Config;

#[derive(Parser)]
#[command(name = "nativelibs")]
#[command(about = "Native library tree assembler")]
#[command(
    after_help = "QUICK START:\n  nativelibs show plan --plan plan.json   Preview what a build will do\n  nativelibs build --plan plan.json       Assemble libs/, assetLibs/, metadata.txt\n  nativelibs verify --plan plan.json      Check the tree against metadata.txt"
)]
struct Cli {
    /// Directory holding .env (default: current directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the native library tree and its manifest
    Build {
        /// JSON plan describing the native inputs
        #[arg(long)]
        plan: PathBuf,
    },

    /// Re-hash a built tree and compare it with metadata.txt
    Verify {
        #[arg(long)]
        plan: PathBuf,
    },

    /// Remove the output tree of a plan
    Clean {
        #[arg(long)]
        plan: PathBuf,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Create or replace a symlink (ln -f -s)
    Link {
        /// Existing file the link points at
        existing: PathBuf,
        /// Path of the link to create
        desired: PathBuf,
        /// Root both paths are resolved against (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show the stages and operations a plan would run
    Plan {
        #[arg(long)]
        plan: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let config = Config::load(&base_dir)?;

    match cli.command {
        Commands::Build { plan } => commands::cmd_build(&plan, &config)?,
        Commands::Verify { plan } => commands::cmd_verify(&plan, &config)?,
        Commands::Clean { plan } => commands::cmd_clean(&plan, &config)?,
        Commands::Show { what } => {
            let target = match &what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Plan { plan } => commands::show::ShowTarget::Plan(plan),
            };
            commands::cmd_show(target, &config)?;
        }
        Commands::Link {
            existing,
            desired,
            root,
        } => {
            let root = match root {
                Some(root) => root,
                None => std::env::current_dir()?,
            };
            commands::cmd_link(&root, &existing, &desired)?;
        }
    }

    Ok(())
}
