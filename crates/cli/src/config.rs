//! Configuration file and dump profile resolution
//!
//! A run is described by a [`Profile`]: the filename template for the
//! backup directory and the producer that makes new snapshots. Profiles
//! start from one of two presets (whole cluster, or a single database),
//! then the optional TOML file and command-line flags override them.
//!
//! ```toml
//! database = "leaderboards"
//! remote = "db.example.com"
//! filename_format = "leaderboards.%Y-%m-%d.%H-%M-%S.dump"
//!
//! [dump]
//! program = "pg_dump"
//! args = ["--format=custom", "leaderboards"]
//! compression = "none"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use snapkeep_core::FilenameTemplate;
use snapkeep_producer::{Compression, DumpCommand, DumpProducer, Transport};
use std::path::Path;
use tracing::warn;

/// Contents of a configuration file
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Back up a single database instead of the whole cluster
    pub database: Option<String>,
    /// System user to run the dump as
    pub user: Option<String>,
    /// SSH host to run the dump on
    pub remote: Option<String>,
    /// strftime template for snapshot names
    pub filename_format: Option<String>,
    #[serde(default)]
    pub dump: DumpSection,
}

/// `[dump]` section
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DumpSection {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
    pub compression: Option<Compression>,
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub database: Option<String>,
    pub user: Option<String>,
    pub remote: Option<String>,
}

/// Everything needed to name, produce and recognize snapshots
#[derive(Debug, Clone)]
pub struct Profile {
    pub template: FilenameTemplate,
    pub producer: DumpProducer,
}

/// Load a configuration file
pub fn load(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Parse configuration from TOML text
pub fn parse(text: &str) -> Result<FileConfig> {
    Ok(toml::from_str(text)?)
}

/// Combine presets, file configuration and command-line overrides
///
/// A `[dump] program` replaces the preset command entirely, so with a
/// database set the name only selects the filename template and the
/// default compression. It must also be passed in `[dump] args`.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Profile> {
    let database = overrides.database.clone().or(file.database.clone());
    let template = resolve_template(&file, database.as_deref())?;

    // Flags replace the file's transport entirely
    let (user, remote) = if overrides.user.is_some() || overrides.remote.is_some() {
        (overrides.user, overrides.remote)
    } else {
        (file.user, file.remote)
    };

    let transport = match (user, remote) {
        (Some(_), Some(_)) => anyhow::bail!("A dump cannot run both as another user and on a remote host"),
        (Some(user), None) => Transport::AsUser(user),
        (None, Some(host)) => Transport::Ssh(host),
        (None, None) => Transport::Local,
    };

    let (preset, compression) = preset_for(database.as_deref());
    let compression = file.dump.compression.unwrap_or(compression);

    let command = match (file.dump.program, file.dump.args) {
        (Some(program), args) => {
            let args = args.unwrap_or_default();
            if let Some(name) = database.as_deref().filter(|name| !args.iter().any(|a| a == name)) {
                warn!(
                    "dump program '{}' does not mention database '{}'; the name is only used for snapshot filenames",
                    program, name
                );
            }
            DumpCommand::new(program, args)
        }
        (None, Some(args)) => DumpCommand::new(preset.program(), args),
        (None, None) => preset,
    };

    Ok(Profile {
        template,
        producer: DumpProducer::new(command, transport, compression),
    })
}

/// Filename template only, for commands that never run a dump
pub fn resolve_template(file: &FileConfig, database: Option<&str>) -> Result<FilenameTemplate> {
    let (_, compression) = preset_for(database);
    let compression = file.dump.compression.unwrap_or(compression);

    match &file.filename_format {
        Some(format) => FilenameTemplate::new(format.as_str()),
        None => FilenameTemplate::with_prefix(database, compression.extension()),
    }
    .context("Invalid snapshot filename template")
}

fn preset_for(database: Option<&str>) -> (DumpCommand, Compression) {
    match database {
        Some(name) => (DumpCommand::dump_database(name), Compression::None),
        None => (DumpCommand::dump_all(), Compression::Gzip),
    }
}
