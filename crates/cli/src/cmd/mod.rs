//! CLI command implementations

pub mod backup;
pub mod cull;

use crate::config::{self, FileConfig, Overrides, Profile};
use crate::util;
use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;
use snapkeep_core::FilenameTemplate;
use std::path::PathBuf;

/// Arguments shared by every command that works on a backup directory
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Directory holding the snapshots
    pub backup_directory: PathBuf,

    /// Do not create or delete any files; print what would happen
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Back up a single database (custom format, name-prefixed files)
    #[arg(long)]
    pub database: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reference time for snapshot ages (default: now, local time)
    #[arg(long, value_parser = util::parse_timestamp)]
    pub now: Option<NaiveDateTime>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl TargetArgs {
    /// Load the config file (if any) and resolve the dump profile
    pub fn profile(&self, user: Option<String>, remote: Option<String>) -> Result<Profile> {
        config::resolve(
            self.file_config()?,
            Overrides {
                database: self.database.clone(),
                user,
                remote,
            },
        )
    }

    /// Resolve only the filename template
    pub fn template(&self) -> Result<FilenameTemplate> {
        let file = self.file_config()?;
        let database = self.database.as_deref().or(file.database.as_deref());
        config::resolve_template(&file, database)
    }

    fn file_config(&self) -> Result<FileConfig> {
        match &self.config {
            Some(path) => config::load(path),
            None => Ok(FileConfig::default()),
        }
    }

    /// Reference time for this run
    pub fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(util::local_now)
    }
}
