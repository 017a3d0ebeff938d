//! Fixed retention windows
//!
//! Backups younger than a week are all kept. Up to a year, one backup per
//! calendar month is kept. Beyond that, one per calendar year. The windows
//! are part of the policy and cannot be configured.

use chrono::Duration;

/// Everything younger than this is kept
pub const DENSE_WINDOW_DAYS: i64 = 7;

/// One backup per calendar month is kept up to this age
pub const MONTHLY_WINDOW_DAYS: i64 = 365;

/// Retention tier an age falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Timestamp is after the reference time
    Future,
    /// Inside the dense window
    Recent,
    /// One anchor per (year, month)
    Monthly,
    /// One anchor per year
    Yearly,
}

impl Tier {
    /// Tier for a backup of the given age
    pub fn for_age(age: Duration) -> Self {
        if age < Duration::zero() {
            Tier::Future
        } else if age < Duration::days(DENSE_WINDOW_DAYS) {
            Tier::Recent
        } else if age < Duration::days(MONTHLY_WINDOW_DAYS) {
            Tier::Monthly
        } else {
            Tier::Yearly
        }
    }
}
