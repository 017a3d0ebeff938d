//! Backup entries derived from a single directory listing

use crate::template::FilenameTemplate;
use chrono::{Datelike, Duration, NaiveDateTime};
use std::fmt;

/// Kind of a directory entry, as seen when the listing was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory, symlink, socket, ...
    Other,
    /// Name is not valid UTF-8 and can never match a template
    InvalidName,
}

/// One name captured from a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListedName {
    pub name: String,
    pub kind: EntryKind,
}

impl ListedName {
    /// A regular file
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }
}

/// A recognized backup snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// Literal directory entry name
    pub raw_name: String,
    /// Timestamp parsed from `raw_name`
    pub timestamp: NaiveDateTime,
}

impl BackupEntry {
    /// Age relative to `now`; negative for snapshots from the future
    pub fn age(&self, now: NaiveDateTime) -> Duration {
        now - self.timestamp
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }
}

/// Why a listed name is not a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unrecognized {
    /// Name does not match the filename template
    UnknownName,
    /// Name matches but the entry is not a regular file
    NotAFile,
}

impl fmt::Display for Unrecognized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unrecognized::UnknownName => f.write_str("unrecognized filename"),
            Unrecognized::NotAFile => f.write_str("not a regular file"),
        }
    }
}

/// A directory listing split into backups and everything else
///
/// Backups are ordered oldest first (ties broken by name), which is the
/// order the retention pass depends on. Unrecognized names are ordered by
/// name.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    entries: Vec<BackupEntry>,
    unrecognized: Vec<(String, Unrecognized)>,
}

impl Listing {
    /// Classify names against `template` and sort them
    pub fn from_names<I>(names: I, template: &FilenameTemplate) -> Self
    where
        I: IntoIterator<Item = ListedName>,
    {
        let mut entries = Vec::new();
        let mut unrecognized = Vec::new();

        for listed in names {
            let timestamp = match listed.kind {
                EntryKind::InvalidName => None,
                _ => template.parse(&listed.name),
            };

            match (timestamp, listed.kind) {
                (Some(timestamp), EntryKind::File) => entries.push(BackupEntry {
                    raw_name: listed.name,
                    timestamp,
                }),
                (Some(_), _) => unrecognized.push((listed.name, Unrecognized::NotAFile)),
                (None, _) => unrecognized.push((listed.name, Unrecognized::UnknownName)),
            }
        }

        entries.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.raw_name.cmp(&b.raw_name))
        });
        entries.dedup_by(|a, b| a.raw_name == b.raw_name);
        unrecognized.sort();
        unrecognized.dedup();

        Self {
            entries,
            unrecognized,
        }
    }

    /// Recognized backups, oldest first
    pub fn entries(&self) -> &[BackupEntry] {
        &self.entries
    }

    /// Names that will never be touched
    pub fn unrecognized(&self) -> &[(String, Unrecognized)] {
        &self.unrecognized
    }

    /// Total number of names in the listing
    pub fn len(&self) -> usize {
        self.entries.len() + self.unrecognized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
