//! Shared utilities for CLI commands

use chrono::{DateTime, Local, NaiveDateTime};

/// Current wall-clock time, in the same naive local form snapshot names use
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse a `--now` value
///
/// Accepts RFC 3339 (converted to local time) or a naive local
/// `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Local).naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            format!(
                "invalid timestamp '{}' (expected RFC 3339 or YYYY-MM-DDTHH:MM:SS)",
                value
            )
        })
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
