//! Filename templates for timestamped snapshots
//!
//! A template is a strftime format string that names every snapshot in a
//! backup directory, e.g. `%Y-%m-%d.%H-%M-%S.gz` or
//! `leaderboards.%Y-%m-%d.%H-%M-%S.dump`. The same template is used to name
//! new snapshots and to recognize existing ones.

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::{self, Write};
use thiserror::Error;

/// Timestamp part shared by all built-in templates
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d.%H-%M-%S";

/// Errors raised while building a template
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("invalid filename template '{0}'")]
    Invalid(String),

    #[error("filename template '{0}' must name a single file, not a path")]
    PathSeparator(String),

    #[error("filename template '{0}' does not capture a full date and time")]
    NotReversible(String),

    #[error("'{0}' cannot be used as a filename prefix or extension")]
    InvalidSegment(String),
}

/// Strict, reversible filename template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    format: String,
}

impl FilenameTemplate {
    /// Build a template from a raw strftime format string
    ///
    /// The format must be valid, must not contain a path separator, and must
    /// round-trip a timestamp down to the second. Formats that drop a field
    /// (no seconds, two-digit year outside the sample, ...) are rejected so
    /// that two different snapshots can never share a name.
    pub fn new(format: impl Into<String>) -> Result<Self, TemplateError> {
        let format = format.into();

        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(TemplateError::Invalid(format));
        }
        if format.contains('/') || format.contains('\0') {
            return Err(TemplateError::PathSeparator(format));
        }

        let template = Self { format };
        for sample in sample_timestamps() {
            // Time zone fields cannot be rendered from a naive timestamp
            let Some(name) = template.try_format(sample) else {
                return Err(TemplateError::Invalid(template.format));
            };
            match NaiveDateTime::parse_from_str(&name, &template.format) {
                Ok(parsed) if parsed == sample => {}
                _ => return Err(TemplateError::NotReversible(template.format)),
            }
        }

        Ok(template)
    }

    /// Build `[prefix.]%Y-%m-%d.%H-%M-%S.<extension>`
    pub fn with_prefix(prefix: Option<&str>, extension: &str) -> Result<Self, TemplateError> {
        validate_segment(extension)?;

        let mut format = String::new();
        if let Some(prefix) = prefix {
            validate_segment(prefix)?;
            format.push_str(&escape_literal(prefix));
            format.push('.');
        }
        format.push_str(TIMESTAMP_FORMAT);
        format.push('.');
        format.push_str(&escape_literal(extension));

        Self::new(format)
    }

    /// Parse the timestamp out of a directory entry name
    ///
    /// Returns `None` unless the name is exactly what [`format`](Self::format)
    /// would produce for the parsed timestamp. Zero-padding variants and
    /// trailing text are therefore never recognized.
    pub fn parse(&self, raw_name: &str) -> Option<NaiveDateTime> {
        let timestamp = NaiveDateTime::parse_from_str(raw_name, &self.format).ok()?;
        (self.format(timestamp) == raw_name).then_some(timestamp)
    }

    /// Name a snapshot taken at `timestamp`
    pub fn format(&self, timestamp: NaiveDateTime) -> String {
        timestamp.format(&self.format).to_string()
    }

    fn try_format(&self, timestamp: NaiveDateTime) -> Option<String> {
        let mut name = String::new();
        write!(name, "{}", timestamp.format(&self.format)).ok()?;
        Some(name)
    }

    /// The underlying strftime format string
    pub fn as_str(&self) -> &str {
        &self.format
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format)
    }
}

fn validate_segment(segment: &str) -> Result<(), TemplateError> {
    let bad = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\0');
    if bad {
        return Err(TemplateError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

fn escape_literal(literal: &str) -> String {
    literal.replace('%', "%%")
}

/// Timestamps used to prove a template is reversible
///
/// Every field differs from its neighbours and from zero so that a dropped
/// or swapped field shows up as a mismatch.
fn sample_timestamps() -> impl Iterator<Item = NaiveDateTime> {
    [(2001, 2, 3, 4, 5, 6), (2037, 11, 28, 21, 58, 59)]
        .into_iter()
        .filter_map(|(y, mo, d, h, mi, s)| {
            NaiveDate::from_ymd_opt(y, mo, d).and_then(|date| date.and_hms_opt(h, mi, s))
        })
}
