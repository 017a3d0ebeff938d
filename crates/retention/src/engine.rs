//! The culling pass
//!
//! [`classify`] is a pure function of a sorted listing and a reference time.
//! [`cull`] takes the listing from a store, classifies it and removes what
//! was classified [`Decision::Delete`].

use crate::decision::{Classified, Decision, Reason};
use crate::policy::Tier;
use crate::report::{DeletionFailure, Report};
use chrono::NaiveDateTime;
use snapkeep_core::{BackupStore, FilenameTemplate, ListedName, Listing, StoreError};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Everything a culling pass depends on
#[derive(Debug, Clone)]
pub struct CullConfig {
    /// Template naming the snapshots in the directory
    pub template: FilenameTemplate,
    /// Reference time that ages are measured against
    pub now: NaiveDateTime,
    /// Report deletions without performing them
    pub dry_run: bool,
}

/// Decide what happens to every name in `listing`
///
/// Unrecognized names come first and are always ignored. Backups follow
/// oldest first, so the first backup seen for a month or year is the oldest
/// one and claims that anchor slot.
pub fn classify(listing: &Listing, now: NaiveDateTime) -> Vec<Classified> {
    let mut seen_months: HashSet<(i32, u32)> = HashSet::new();
    let mut seen_years: HashSet<i32> = HashSet::new();
    let mut lines = Vec::with_capacity(listing.len());

    // Unrecognized names go first in name order, not interleaved with the
    // backups by filename, so every backup line reads in timestamp order
    for (name, why) in listing.unrecognized() {
        lines.push(Classified {
            name: name.clone(),
            decision: Decision::Ignore,
            reason: Reason::Unrecognized(*why),
        });
    }

    for entry in listing.entries() {
        let (decision, reason) = match Tier::for_age(entry.age(now)) {
            Tier::Future => (Decision::KeepFuture, Reason::FromTheFuture),
            Tier::Recent => (Decision::KeepRecent, Reason::WithinLastWeek),
            Tier::Monthly => {
                let (year, month) = (entry.year(), entry.month());
                if seen_months.insert((year, month)) {
                    (Decision::KeepMonthlyAnchor, Reason::OldestForMonth { year, month })
                } else {
                    (Decision::Delete, Reason::SupersededInMonth { year, month })
                }
            }
            Tier::Yearly => {
                let year = entry.year();
                if seen_years.insert(year) {
                    (Decision::KeepYearlyAnchor, Reason::OldestForYear { year })
                } else {
                    (Decision::Delete, Reason::SupersededInYear { year })
                }
            }
        };

        lines.push(Classified {
            name: entry.raw_name.clone(),
            decision,
            reason,
        });
    }

    lines
}

/// Run one culling pass over `store`
///
/// The store is listed exactly once. `pending` names a snapshot that is
/// about to exist but is not on disk (a dry run's planned snapshot); it is
/// classified like any other name but never removed.
///
/// A failed removal is recorded in [`Report::failures`] and the pass moves on
/// to the next entry. Only a failure to list the store aborts the pass.
pub fn cull<S>(store: &S, config: &CullConfig, pending: &[&str]) -> Result<Report, StoreError>
where
    S: BackupStore + ?Sized,
{
    let mut names = store.list()?;
    for &name in pending {
        if !names.iter().any(|listed| listed.name == name) {
            names.push(ListedName::file(name));
        }
    }

    let listing = Listing::from_names(names, &config.template);
    let lines = classify(&listing, config.now);
    let mut failures = Vec::new();

    for line in &lines {
        match line.decision {
            Decision::Ignore => debug!("ignoring {} ({})", line.name, line.reason),
            Decision::Delete if config.dry_run || pending.contains(&line.name.as_str()) => {
                info!("would delete {} ({})", line.name, line.reason);
            }
            Decision::Delete => match store.remove(&line.name) {
                Ok(()) => info!("deleted {} ({})", line.name, line.reason),
                Err(e) => {
                    warn!("failed to delete {}: {}", line.name, e);
                    failures.push(DeletionFailure::new(line.name.clone(), &e));
                }
            },
            _ => debug!("keeping {} ({})", line.name, line.reason),
        }
    }

    Ok(Report { lines, failures })
}
