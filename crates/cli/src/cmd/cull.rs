//! Cull existing snapshots without taking a new one

use super::TargetArgs;
use crate::output::{self, Run};
use anyhow::{Context, Result};
use snapkeep_core::FsStore;
use snapkeep_retention::{cull, CullConfig};
use std::process::ExitCode;

pub fn run(args: &TargetArgs) -> Result<ExitCode> {
    // 1. Resolve the filename template
    let template = args.template()?;
    let store = FsStore::new(&args.backup_directory);

    if !args.json {
        output::print_dry_run_banner(args.dry_run);
        println!("Culling backups in {} ...", store.root().display());
    }

    // 2. Classify and delete
    let config = CullConfig {
        template,
        now: args.now(),
        dry_run: args.dry_run,
    };
    let report = cull(&store, &config, &[]).context("Failed to cull backups")?;

    // 3. Display results
    let run = Run {
        dry_run: args.dry_run,
        directory: store.root(),
        snapshot: None,
        report: &report,
    };
    output::emit(&run, args.json)?;

    Ok(run.exit_code())
}
