//! Review history.

use chrono::{DateTime, Utc};
use review_core::{MemoryStore, ReviewState, ReviewStore};
use serde::{Deserialize, Serialize};

/// One grading event, with the state on both sides of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLogEntry {
    pub item_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub reviewed_at: DateTime<Utc>,
    pub quality: u8,
    pub interval_before: u32,
    pub interval_after: u32,
    pub ease_before: f64,
    pub ease_after: f64,
    pub algorithm: String,
}

impl ReviewLogEntry {
    pub fn new(
        before: &ReviewState,
        after: &ReviewState,
        quality: u8,
        algorithm: &str,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id: after.item_id.clone(),
            reviewed_at,
            quality,
            interval_before: before.interval_days,
            interval_after: after.interval_days,
            ease_before: before.ease,
            ease_after: after.ease,
            algorithm: algorithm.to_string(),
        }
    }
}

/// Stores that can persist a grading together with its log entry.
///
/// The default keeps no history and only saves the new state.
pub trait RecordReviews: ReviewStore {
    fn record_review(&self, after: &ReviewState, _entry: &ReviewLogEntry) -> Result<(), Self::Error> {
        self.save(after)
    }

    /// Logged gradings of one item, oldest first.
    fn history(&self, _item_id: &str) -> Result<Vec<ReviewLogEntry>, Self::Error> {
        Ok(Vec::new())
    }

    /// Number of gradings logged at or after `since`.
    fn count_reviews_since(&self, _since: DateTime<Utc>) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl RecordReviews for MemoryStore {}
