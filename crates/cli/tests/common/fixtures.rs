//! Backup directory fixtures
//!
//! Every fixture shares one fixed reference time so snapshot ages are exact.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use snapkeep_core::FilenameTemplate;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch workspace holding a `backups/` directory
pub struct BackupFixture {
    root: TempDir,
    now: NaiveDateTime,
    template: FilenameTemplate,
}

impl BackupFixture {
    /// Fixture using the whole-cluster template (`%Y-%m-%d.%H-%M-%S.gz`)
    pub fn new() -> Result<Self> {
        Self::with_template(FilenameTemplate::with_prefix(None, "gz")?)
    }

    pub fn with_template(template: FilenameTemplate) -> Result<Self> {
        let root = TempDir::new().context("Failed to create temp dir")?;
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .context("invalid reference time")?;

        fs::create_dir(root.path().join("backups"))?;
        Ok(Self {
            root,
            now,
            template,
        })
    }

    /// Workspace root (working directory for commands)
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Backup directory, as passed on the command line
    pub fn dir(&self) -> PathBuf {
        self.root.path().join("backups")
    }

    pub fn dir_arg(&self) -> String {
        self.dir().display().to_string()
    }

    /// `--now` value for the fixed reference time
    pub fn now_arg(&self) -> String {
        self.now.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    /// Snapshot name the template produces for the reference time
    pub fn name_now(&self) -> String {
        self.template.format(self.now)
    }

    /// Create a snapshot `age` older than the reference time
    pub fn add_aged(&self, age: Duration) -> Result<String> {
        let name = self.template.format(self.now - age);
        self.add_named(&name)?;
        Ok(name)
    }

    pub fn add_days(&self, days: i64) -> Result<String> {
        self.add_aged(Duration::days(days))
    }

    /// Create an arbitrary file in the backup directory
    pub fn add_named(&self, name: &str) -> Result<()> {
        fs::write(self.dir().join(name), format!("snapshot {}", name))
            .with_context(|| format!("Failed to create {}", name))
    }

    /// Names currently in the backup directory, sorted
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.dir())? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.dir().join(name).exists()
    }

    /// Write a config file into the workspace root
    pub fn write_config(&self, toml: &str) -> Result<String> {
        let path = self.root.path().join("snapkeep.toml");
        fs::write(&path, toml)?;
        Ok(path.display().to_string())
    }
}
