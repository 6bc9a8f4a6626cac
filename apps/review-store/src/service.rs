//! Review session service.
//!
//! Wires a store, a clock and the scheduling algorithm together. Every
//! grading is one read-modify-persist done while holding the store lock, so
//! two reviews of the same item never overwrite each other.

use crate::journal::{RecordReviews, ReviewLogEntry};
use chrono::{DateTime, NaiveTime, Utc};
use review_core::{
    compare, hydrate_states, require_algorithm, select_due_items, Clock, ComparisonResult,
    DueSelection, EffectiveSettings, ModeSettings, PracticeMode, PracticeSettings, Quality,
    ReviewAlgorithm, ReviewState, ValidationError,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("store lock poisoned")]
    LockPoisoned,
}

impl ServiceError {
    fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        Self::Store(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Outcome of grading one item.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub previous: ReviewState,
    pub state: ReviewState,
}

/// Answer check as shown to the learner: the comparison plus the score of
/// its tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerReport {
    #[serde(flatten)]
    pub result: ComparisonResult,
    pub score: u8,
}

impl From<ComparisonResult> for AnswerReport {
    fn from(result: ComparisonResult) -> Self {
        let score = result.tier.display_score();
        Self { result, score }
    }
}

/// Aggregate numbers over all stored states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewStats {
    pub total_items: usize,
    pub due_now: usize,
    /// Items whose last grade was a failure or that never passed.
    pub learning: usize,
    /// Items with an interval of three weeks or more.
    pub mature: usize,
    pub average_ease: f64,
    pub average_interval: f64,
    /// Gradings logged since midnight UTC.
    pub reviews_today: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
}

/// Interval (days) from which an item counts as mature.
const MATURE_INTERVAL_DAYS: u32 = 21;

impl ReviewStats {
    pub fn from_states<'a, I>(states: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a ReviewState>,
    {
        let mut stats = Self {
            total_items: 0,
            due_now: 0,
            learning: 0,
            mature: 0,
            average_ease: 0.0,
            average_interval: 0.0,
            reviews_today: 0,
            next_review_at: None,
        };
        let mut ease_sum = 0.0;
        let mut interval_sum = 0.0;

        for state in states {
            stats.total_items += 1;
            ease_sum += state.ease;
            interval_sum += f64::from(state.interval_days);
            if state.is_due(now) {
                stats.due_now += 1;
            } else if stats.next_review_at.map_or(true, |t| state.next_review_at < t) {
                stats.next_review_at = Some(state.next_review_at);
            }
            if state.repetitions == 0 {
                stats.learning += 1;
            }
            if state.interval_days >= MATURE_INTERVAL_DAYS {
                stats.mature += 1;
            }
        }

        if stats.total_items > 0 {
            stats.average_ease = ease_sum / stats.total_items as f64;
            stats.average_interval = interval_sum / stats.total_items as f64;
        }
        stats
    }
}

pub struct ReviewService<S> {
    store: Arc<Mutex<S>>,
    algorithm: Box<dyn ReviewAlgorithm>,
    clock: Arc<dyn Clock>,
    settings: PracticeSettings,
    mode_overrides: HashMap<PracticeMode, ModeSettings>,
}

impl<S: RecordReviews> ReviewService<S> {
    pub fn new(store: S, settings: PracticeSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        let algorithm = require_algorithm(&settings.algorithm)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            algorithm,
            clock,
            settings,
            mode_overrides: HashMap::new(),
        })
    }

    pub fn with_mode_settings(mut self, overrides: ModeSettings) -> Self {
        self.mode_overrides.insert(overrides.mode, overrides);
        self
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, S>> {
        self.store.lock().map_err(|_| ServiceError::LockPoisoned)
    }

    /// Items to review now out of `item_ids`, or the upcoming ones if none is due.
    pub fn review_queue(&self, item_ids: &[&str]) -> Result<DueSelection> {
        let now = self.clock.now();
        let saved = self.lock()?.load_all().map_err(ServiceError::store)?;
        let states = hydrate_states(item_ids.iter().copied(), &saved, now);
        let selection = select_due_items(states, now);

        tracing::info!(
            requested = item_ids.len(),
            returned = selection.items().len(),
            due = selection.is_due(),
            "built review queue"
        );
        Ok(selection)
    }

    /// Grade one item and persist the new state.
    ///
    /// An invalid quality is rejected before the store is touched.
    pub fn submit_review(&self, item_id: &str, quality: u8) -> Result<ReviewOutcome> {
        let quality = Quality::new(quality)?;

        let store = self.lock()?;
        let now = self.clock.now();
        let previous = store
            .get(item_id)
            .map_err(ServiceError::store)?
            .unwrap_or_else(|| self.algorithm.initial_state(item_id.to_string(), now));

        let state = self.algorithm.schedule(&previous, quality, now);
        let entry = ReviewLogEntry::new(&previous, &state, quality.value(), self.algorithm.name(), now);
        store.record_review(&state, &entry).map_err(ServiceError::store)?;

        tracing::info!(
            item_id,
            quality = quality.value(),
            interval_days = state.interval_days,
            next_review_at = %state.next_review_at,
            "review recorded"
        );
        Ok(ReviewOutcome { previous, state })
    }

    pub fn state(&self, item_id: &str) -> Result<Option<ReviewState>> {
        self.lock()?.get(item_id).map_err(ServiceError::store)
    }

    pub fn history(&self, item_id: &str) -> Result<Vec<ReviewLogEntry>> {
        self.lock()?.history(item_id).map_err(ServiceError::store)
    }

    pub fn stats(&self) -> Result<ReviewStats> {
        let now = self.clock.now();
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        let store = self.lock()?;
        let states = store.load_all().map_err(ServiceError::store)?;
        let mut stats = ReviewStats::from_states(states.values(), now);
        stats.reviews_today = store
            .count_reviews_since(midnight)
            .map_err(ServiceError::store)?;
        Ok(stats)
    }

    /// Clear all progress.
    pub fn reset_progress(&self) -> Result<usize> {
        let removed = self.lock()?.clear().map_err(ServiceError::store)?;
        tracing::warn!(removed, "cleared all review progress");
        Ok(removed)
    }

    pub fn effective_settings(&self, mode: PracticeMode) -> EffectiveSettings {
        EffectiveSettings::merge(&self.settings, mode, self.mode_overrides.get(&mode))
    }

    /// Score an answer with the settings of `mode`.
    pub fn check_answer<T: AsRef<str>>(
        &self,
        candidates: &[T],
        actual: &str,
        mode: PracticeMode,
    ) -> Result<ComparisonResult> {
        self.check_answer_with(candidates, actual, mode, None)
    }

    /// Like [`Self::check_answer`], optionally with a one-off acceptance
    /// threshold in place of the configured one.
    pub fn check_answer_with<T: AsRef<str>>(
        &self,
        candidates: &[T],
        actual: &str,
        mode: PracticeMode,
        threshold: Option<f64>,
    ) -> Result<ComparisonResult> {
        let mut options = self.effective_settings(mode).compare_options();
        if let Some(threshold) = threshold {
            options.acceptance_threshold = threshold;
        }
        let result = compare(candidates, actual, &options)?;

        tracing::debug!(
            mode = mode.as_str(),
            threshold = options.acceptance_threshold,
            similarity = result.similarity_percent,
            tier = result.tier.as_str(),
            matched = result.is_match,
            "checked answer"
        );
        Ok(result)
    }
}
