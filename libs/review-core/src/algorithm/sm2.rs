//! SM-2 spaced repetition algorithm.
//!
//! Simplified SuperMemo 2: a passing grade grows the interval 1 -> 6 ->
//! `interval * ease`, a failing grade resets the streak, and the ease factor
//! moves with every grade but never below its floor. Intervals are capped at
//! `maximum_interval` days.

use super::ReviewAlgorithm;
use crate::types::{ItemId, Quality, ReviewState, INITIAL_EASE, MINIMUM_EASE};
use chrono::{DateTime, Duration, Utc};

/// Longest interval the default parameters produce: one hundred years.
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36_500;

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    pub failed_interval: u32,
    /// Upper bound for every interval, in days.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE,
            minimum_ease: MINIMUM_EASE,
            first_interval: 1,
            second_interval: 6,
            failed_interval: 1,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
        }
    }
}

impl ReviewAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, item_id: ItemId, now: DateTime<Utc>) -> ReviewState {
        ReviewState {
            ease: self.initial_ease,
            ..ReviewState::new(item_id, now)
        }
    }

    fn schedule(&self, state: &ReviewState, quality: Quality, now: DateTime<Utc>) -> ReviewState {
        let (interval_days, repetitions) = if quality.is_passing() {
            let interval = match state.repetitions {
                0 => self.first_interval,
                1 => self.second_interval,
                _ => self.grow(state.interval_days, state.ease),
            };
            (interval, state.repetitions.saturating_add(1))
        } else {
            (self.failed_interval, 0)
        };
        let interval_days = interval_days.min(self.maximum_interval);

        let ease = self.next_ease(state.ease, quality);
        let next_review_at = now
            .checked_add_signed(Duration::days(i64::from(interval_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        tracing::debug!(
            item_id = %state.item_id,
            quality = quality.value(),
            interval_days,
            ease,
            repetitions,
            "graded item"
        );

        ReviewState {
            item_id: state.item_id.clone(),
            next_review_at,
            interval_days,
            ease,
            repetitions,
        }
    }
}

impl Sm2 {
    fn grow(&self, interval_days: u32, ease: f64) -> u32 {
        // Round, not truncate: truncation would shrink every interval.
        let grown = (f64::from(interval_days) * ease).round();
        grown.min(f64::from(self.maximum_interval)) as u32
    }

    fn next_ease(&self, ease: f64, quality: Quality) -> f64 {
        let miss = f64::from(Quality::MAX - quality.value());
        let adjusted = ease + (0.1 - miss * (0.08 + miss * 0.02));
        adjusted.max(self.minimum_ease)
    }
}
