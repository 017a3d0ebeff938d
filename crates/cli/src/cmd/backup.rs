//! Take a snapshot, then cull old ones

use super::TargetArgs;
use crate::output::{self, Run};
use crate::util;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use snapkeep_core::{BackupStore, FsStore};
use snapkeep_producer::SnapshotProducer;
use snapkeep_retention::{cull, error_chain, CullConfig};
use std::process::ExitCode;
use tracing::error;

#[derive(Args, Debug, Clone)]
pub struct BackupArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// System user to run the dump as
    #[arg(short, long, conflicts_with = "remote")]
    pub user: Option<String>,

    /// SSH host to run the dump on
    #[arg(short, long)]
    pub remote: Option<String>,
}

/// What happened to the new snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SnapshotOutcome {
    /// Dry run: named but not produced
    Planned { name: String },
    /// Produced and written
    Written {
        name: String,
        bytes: usize,
        dump_bytes: usize,
    },
    /// Dump or write failed; nothing was written
    Failed { name: String, error: String },
}

impl SnapshotOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SnapshotOutcome::Failed { .. })
    }
}

pub fn run(args: &BackupArgs) -> Result<ExitCode> {
    let target = &args.target;

    // 1. Resolve profile and reference time
    let profile = target.profile(args.user.clone(), args.remote.clone())?;
    let now = target.now();
    let store = FsStore::new(&target.backup_directory);

    if !target.json {
        output::print_dry_run_banner(target.dry_run);
    }

    // 2. The directory must exist before anything else happens
    if !target.dry_run {
        store
            .ensure()
            .context("Cannot back up without a backup directory")?;
    }

    // 3. Take the new snapshot
    let name = profile.template.format(now);
    if !target.json {
        println!("Backing up database to {} ...", store.path_of(&name).display());
    }
    let outcome = if target.dry_run {
        SnapshotOutcome::Planned { name }
    } else {
        take_snapshot(&store, &profile.producer, name)
    };

    if !target.json {
        output::print_snapshot(&outcome);
        println!();
        println!("Culling backups ...");
    }

    // 4. Cull, whether or not the snapshot made it
    let pending: Vec<&str> = match &outcome {
        SnapshotOutcome::Planned { name } => vec![name.as_str()],
        _ => Vec::new(),
    };
    let config = CullConfig {
        template: profile.template.clone(),
        now,
        dry_run: target.dry_run,
    };
    let report = cull(&store, &config, &pending).context("Failed to cull backups")?;

    // 5. Display results
    let run = Run {
        dry_run: target.dry_run,
        directory: store.root(),
        snapshot: Some(&outcome),
        report: &report,
    };
    output::emit(&run, target.json)?;

    Ok(run.exit_code())
}

/// Produce a snapshot and write it under `name`
///
/// Failures are captured in the outcome rather than returned, so culling
/// still runs after a failed dump.
pub fn take_snapshot<S, P>(store: &S, producer: &P, name: String) -> SnapshotOutcome
where
    S: BackupStore + ?Sized,
    P: SnapshotProducer + ?Sized,
{
    let snapshot = match producer.produce() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("dump failed, skipping write of {}: {}", name, e);
            return SnapshotOutcome::Failed {
                name,
                error: error_chain(&e),
            };
        }
    };

    match store.write(&name, &snapshot.bytes) {
        Ok(()) => {
            tracing::info!(
                "wrote snapshot {} ({})",
                name,
                util::format_size(snapshot.bytes.len() as u64)
            );
            SnapshotOutcome::Written {
                name,
                bytes: snapshot.bytes.len(),
                dump_bytes: snapshot.dump_len,
            }
        }
        Err(e) => {
            error!("failed to write snapshot {}: {}", name, e);
            SnapshotOutcome::Failed {
                name,
                error: error_chain(&e),
            }
        }
    }
}
