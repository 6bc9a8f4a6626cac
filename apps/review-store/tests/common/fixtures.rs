//! Test fixtures and factory functions for creating test data.

use chrono::{DateTime, Duration, Utc};
use review_core::ReviewState;

/// Vocabulary ids used across tests.
pub const VOCABULARY: [&str; 4] = ["neko", "inu", "gakusei", "sensei"];

/// A state due `offset_ms` milliseconds from `now` (negative means overdue).
pub fn state_due_in(item_id: &str, now: DateTime<Utc>, offset_ms: i64) -> ReviewState {
    ReviewState {
        next_review_at: now + Duration::milliseconds(offset_ms),
        ..ReviewState::new(item_id, now)
    }
}

/// A state in the middle of a streak.
pub fn state_with_streak(
    item_id: &str,
    now: DateTime<Utc>,
    repetitions: u32,
    interval_days: u32,
    ease: f64,
) -> ReviewState {
    ReviewState {
        repetitions,
        interval_days,
        ease,
        ..ReviewState::new(item_id, now)
    }
}
