//! Per-entry retention decisions

use serde::{Serialize, Serializer};
use snapkeep_core::Unrecognized;
use std::fmt;

/// What a culling pass does with one directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    KeepFuture,
    KeepRecent,
    KeepMonthlyAnchor,
    KeepYearlyAnchor,
    Delete,
    Ignore,
}

impl Decision {
    pub fn is_keep(self) -> bool {
        matches!(
            self,
            Decision::KeepFuture
                | Decision::KeepRecent
                | Decision::KeepMonthlyAnchor
                | Decision::KeepYearlyAnchor
        )
    }
}

/// Human-readable reason behind a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    FromTheFuture,
    WithinLastWeek,
    OldestForMonth { year: i32, month: u32 },
    OldestForYear { year: i32 },
    SupersededInMonth { year: i32, month: u32 },
    SupersededInYear { year: i32 },
    Unrecognized(Unrecognized),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::FromTheFuture => f.write_str("from the future"),
            Reason::WithinLastWeek => f.write_str("within the last week"),
            Reason::OldestForMonth { year, month } => {
                write!(f, "oldest backup for {:04}-{:02}", year, month)
            }
            Reason::OldestForYear { year } => write!(f, "oldest backup for {:04}", year),
            Reason::SupersededInMonth { year, month } => {
                write!(f, "superseded by older backup for {:04}-{:02}", year, month)
            }
            Reason::SupersededInYear { year } => {
                write!(f, "superseded by older backup for {:04}", year)
            }
            Reason::Unrecognized(why) => write!(f, "{}", why),
        }
    }
}

impl Serialize for Reason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One line of a culling report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classified {
    pub name: String,
    pub decision: Decision,
    pub reason: Reason,
}

impl fmt::Display for Classified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decision {
            Decision::Delete => write!(f, "Deleting backup {} ({})", self.name, self.reason),
            Decision::Ignore => write!(f, "Ignoring {} ({})", self.name, self.reason),
            _ => write!(f, "Keeping {} ({})", self.name, self.reason),
        }
    }
}
