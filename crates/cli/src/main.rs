//! Snapkeep CLI - snapkeep command

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use cli_lib::cmd::{self, backup::BackupArgs, TargetArgs};
use cli_lib::logging;
use std::path::PathBuf;
use std::process::ExitCode;

/// Snapkeep - database snapshots with tiered retention
///
/// Keeps every snapshot from the last week, the oldest snapshot of each
/// month for the last year, and the oldest snapshot of each year before that.
#[derive(Parser)]
#[command(name = "snapkeep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a new snapshot, then cull old ones
    Backup(BackupArgs),
    /// Cull existing snapshots without taking a new one
    Cull(TargetArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let _guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Backup(args) => cmd::backup::run(&args),
        Commands::Cull(args) => cmd::cull::run(&args),
    }
}
