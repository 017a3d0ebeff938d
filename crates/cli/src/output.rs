//! Rendering run results for people and for scripts

use crate::cmd::backup::SnapshotOutcome;
use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;
use snapkeep_retention::{Classified, Decision, Report};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

/// Result of one invocation
#[derive(Debug, Serialize)]
pub struct Run<'a> {
    pub dry_run: bool,
    pub directory: &'a Path,
    pub snapshot: Option<&'a SnapshotOutcome>,
    pub report: &'a Report,
}

impl Run<'_> {
    /// True when the snapshot or any deletion failed
    pub fn failed(&self) -> bool {
        self.snapshot.is_some_and(SnapshotOutcome::is_failure) || !self.report.failures.is_empty()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failed() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Print the run as JSON or as text
pub fn emit(run: &Run<'_>, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(run).context("Failed to serialize report")?;
        println!("{}", text);
    } else {
        print_report(run.report);
        print_dry_run_footer(run.dry_run);
    }
    Ok(())
}

pub fn print_dry_run_banner(dry_run: bool) {
    if dry_run {
        println!(
            "{}",
            paint(
                "THIS IS A DRY RUN; NO ACTUAL FILES WILL BE CREATED OR DELETED",
                warning()
            )
        );
        println!();
    }
}

fn print_dry_run_footer(dry_run: bool) {
    if dry_run {
        println!();
        println!(
            "{}",
            paint(
                "THIS WAS A DRY RUN; NO ACTUAL FILES WERE CREATED OR DELETED",
                warning()
            )
        );
    }
}

/// Status line for the new snapshot
///
/// Snapshot status line; sizes go to the log and the JSON output
pub fn print_snapshot(outcome: &SnapshotOutcome) {
    match outcome {
        SnapshotOutcome::Planned { .. } | SnapshotOutcome::Written { .. } => {
            println!("{}", paint("Backup successful!", Style::new().green()))
        }
        SnapshotOutcome::Failed { error, .. } => {
            println!("{} {}", paint("Backup failed:", Style::new().red().bold()), error)
        }
    }
}

/// Classification lines, then failures, then totals
///
/// Piped output is exactly the report's plain text.
pub fn print_report(report: &Report) {
    if use_color() {
        for line in &report.lines {
            println!("{}", styled(line));
        }
    } else {
        print!("{}", report);
    }

    if !report.failures.is_empty() {
        println!();
        for failure in &report.failures {
            println!("{}", paint(&failure.to_string(), Style::new().red()));
        }
    }

    println!();
    println!("{}", summary(report));
}

/// Totals line; `deleted` counts only removals that succeeded
pub fn summary(report: &Report) -> String {
    let mut line = format!(
        "{} kept, {} deleted, {} ignored",
        report.kept(),
        report.removed(),
        report.ignored()
    );
    if !report.failures.is_empty() {
        line.push_str(&format!(", {} failed", report.failures.len()));
    }
    line
}

fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

fn warning() -> Style {
    Style::new().yellow().bold()
}

/// Style `text` when stdout is a terminal
fn paint(text: &str, style: Style) -> String {
    if use_color() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

fn styled(line: &Classified) -> String {
    match line.decision {
        Decision::Delete => format!(
            "{} {} {}",
            "Deleting backup".red(),
            line.name.yellow(),
            format!("({})", line.reason).dimmed()
        ),
        Decision::Ignore => format!(
            "{} {} {}",
            "Ignoring".dimmed(),
            line.name,
            format!("({})", line.reason).dimmed()
        ),
        _ => format!(
            "{} {} {}",
            "Keeping".green(),
            line.name.cyan(),
            format!("({})", line.reason).dimmed()
        ),
    }
}
