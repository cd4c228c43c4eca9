//! Records that landed in a bucket.

use serde::Serialize;

/// A classified record together with how far along it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flagged<T> {
    /// The record itself.
    #[serde(flatten)]
    pub record: T,

    /// Whole hours since last activity.
    pub age_hours: i64,

    /// Whole days until the record crosses the stale cutoff; 0 when stale.
    pub days_until_stale: u32,
}

impl<T> Flagged<T> {
    /// Wraps a record.
    pub fn new(record: T, age_hours: i64, days_until_stale: u32) -> Self {
        Self {
            record,
            age_hours,
            days_until_stale,
        }
    }
}
