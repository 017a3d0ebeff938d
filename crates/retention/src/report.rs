//! Culling reports

use crate::decision::{Classified, Decision};
use serde::Serialize;
use std::error::Error;
use std::fmt;

/// A removal that failed; the pass carried on without it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub name: String,
    pub error: String,
}

impl DeletionFailure {
    pub fn new(name: impl Into<String>, error: &(dyn Error + 'static)) -> Self {
        Self {
            name: name.into(),
            error: error_chain(error),
        }
    }
}

impl fmt::Display for DeletionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not delete {}: {}", self.name, self.error)
    }
}

/// Outcome of one culling pass
///
/// `lines` holds one entry per directory entry, in processing order. The
/// text rendering only covers `lines`, so a dry run and a real run over the
/// same listing render identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub lines: Vec<Classified>,
    pub failures: Vec<DeletionFailure>,
}

impl Report {
    /// Number of entries kept
    pub fn kept(&self) -> usize {
        self.lines.iter().filter(|l| l.decision.is_keep()).count()
    }

    /// Number of entries selected for deletion
    pub fn deleted(&self) -> usize {
        self.count(Decision::Delete)
    }

    /// Number of entries left alone because they are not backups
    pub fn ignored(&self) -> usize {
        self.count(Decision::Ignore)
    }

    /// Decision taken for `name`, if it was part of the pass
    pub fn decision_for(&self, name: &str) -> Option<Decision> {
        self.lines
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.decision)
    }

    /// Number of deletions that actually happened (or would, in a dry run)
    pub fn removed(&self) -> usize {
        self.deleted().saturating_sub(self.failures.len())
    }

    fn count(&self, decision: Decision) -> usize {
        self.lines.iter().filter(|l| l.decision == decision).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Render an error and its sources as `outer: inner: root`
pub fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
