//! Core types for snapkeep
//!
//! This crate provides:
//! - Strict, reversible filename templates
//! - Backup entries derived from one directory listing
//! - The backup directory store (listing, atomic writes, removal)

pub mod entry;
pub mod store;
pub mod template;

// Re-exports
pub use entry::{BackupEntry, EntryKind, ListedName, Listing, Unrecognized};
pub use store::{BackupStore, FsStore, StoreError};
pub use template::{FilenameTemplate, TemplateError, TIMESTAMP_FORMAT};
