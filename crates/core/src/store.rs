//! Backup directory storage
//!
//! Everything the retention pass and the snapshot writer need from the
//! filesystem goes through [`BackupStore`]: one listing, atomic writes and
//! single-file removal.

use crate::entry::{EntryKind, ListedName};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a backup store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create backup directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list backup directory {}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to overwrite existing backup {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("failed to remove {}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{0}' is not a plain file name")]
    InvalidName(String),
}

/// Storage for a directory of snapshots
pub trait BackupStore {
    /// Make sure the directory exists
    fn ensure(&self) -> Result<(), StoreError>;

    /// List every entry in the directory once
    fn list(&self) -> Result<Vec<ListedName>, StoreError>;

    /// Write a new snapshot; never overwrites an existing one
    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Remove a single snapshot
    fn remove(&self, name: &str) -> Result<(), StoreError>;
}

/// Backup store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the snapshots
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a snapshot in this store
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn checked_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.path_of(name))
    }
}

impl BackupStore for FsStore {
    fn ensure(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::CreateDir {
            path: self.root.clone(),
            source,
        })
    }

    /// A directory that does not exist yet lists as empty
    fn list(&self) -> Result<Vec<ListedName>, StoreError> {
        let list_err = |source| StoreError::List {
            path: self.root.clone(),
            source,
        };

        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(list_err(e)),
        };

        let mut names = Vec::new();
        for entry in dir {
            let entry = entry.map_err(list_err)?;
            let file_type = entry.file_type().map_err(list_err)?;

            let listed = match entry.file_name().into_string() {
                Ok(name) => ListedName {
                    name,
                    kind: if file_type.is_file() {
                        EntryKind::File
                    } else {
                        EntryKind::Other
                    },
                },
                Err(raw) => ListedName {
                    name: raw.to_string_lossy().into_owned(),
                    kind: EntryKind::InvalidName,
                },
            };
            names.push(listed);
        }

        Ok(names)
    }

    /// Atomic write
    ///
    /// Writes to a temporary file in the same directory, fsyncs it, then
    /// links it into place under `name`. Fails with
    /// [`StoreError::AlreadyExists`] if `name` is taken.
    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let target = self.checked_path(name)?;
        let write_err = |source| StoreError::Write {
            path: target.clone(),
            source,
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".snapkeep-")
            .suffix(".partial")
            .tempfile_in(&self.root)
            .map_err(write_err)?;
        tmp.write_all(data).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        tmp.persist_noclobber(&target).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                StoreError::AlreadyExists {
                    path: target.clone(),
                }
            } else {
                write_err(e.error)
            }
        })?;

        sync_dir(&self.root).map_err(write_err)?;
        tracing::debug!("wrote {} ({} bytes)", target.display(), data.len());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.checked_path(name)?;
        fs::remove_file(&path).map_err(|source| StoreError::Remove { path, source })
    }
}

/// Reject anything that is not a single path component
fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
