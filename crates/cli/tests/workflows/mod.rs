//! Workflow integration tests
//!
//! Tests for complete runs that exercise the CLI, the retention pass and
//! the snapshot producer together.

pub mod backup_run;
