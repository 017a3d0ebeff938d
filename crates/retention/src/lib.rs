//! Tiered retention for directories of timestamped snapshots
//!
//! This crate provides:
//! - The fixed retention windows (dense week, monthly year, yearly forever)
//! - Per-entry decisions with human-readable reasons
//! - The culling pass over a backup store, with dry-run support
//! - Culling reports

pub mod decision;
pub mod engine;
pub mod policy;
pub mod report;

// Re-exports
pub use decision::{Classified, Decision, Reason};
pub use engine::{classify, cull, CullConfig};
pub use policy::{Tier, DENSE_WINDOW_DAYS, MONTHLY_WINDOW_DAYS};
pub use report::{error_chain, DeletionFailure, Report};
