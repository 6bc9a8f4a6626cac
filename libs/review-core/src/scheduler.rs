//! Due-item selection.

use crate::types::{ItemId, ReviewState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Items to show in a review session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum DueSelection {
    /// Items eligible for review now, in input order.
    Due(Vec<ReviewState>),
    /// Nothing is due; upcoming items, earliest first.
    Upcoming(Vec<ReviewState>),
}

impl DueSelection {
    pub fn is_due(&self) -> bool {
        matches!(self, Self::Due(_))
    }

    pub fn items(&self) -> &[ReviewState] {
        match self {
            Self::Due(items) | Self::Upcoming(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<ReviewState> {
        match self {
            Self::Due(items) | Self::Upcoming(items) => items,
        }
    }

    /// Earliest upcoming review, when nothing is due.
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Due(_) => None,
            Self::Upcoming(items) => items.first().map(|s| s.next_review_at),
        }
    }
}

/// Pick the items due at `now`.
///
/// When nothing is due the not-yet-due items are returned instead, sorted by
/// `next_review_at`, so a caller can report when the next review happens.
pub fn select_due_items<I>(states: I, now: DateTime<Utc>) -> DueSelection
where
    I: IntoIterator<Item = ReviewState>,
{
    let (due, mut upcoming): (Vec<_>, Vec<_>) =
        states.into_iter().partition(|state| state.is_due(now));

    if !due.is_empty() {
        return DueSelection::Due(due);
    }

    upcoming.sort_by_key(|state| state.next_review_at);
    DueSelection::Upcoming(upcoming)
}

/// Build the state list for a set of known items.
///
/// Saved states are used as-is; items without one get a fresh state that is
/// due at `now`.
pub fn hydrate_states<'a, I>(
    item_ids: I,
    saved: &HashMap<ItemId, ReviewState>,
    now: DateTime<Utc>,
) -> Vec<ReviewState>
where
    I: IntoIterator<Item = &'a str>,
{
    item_ids
        .into_iter()
        .map(|id| {
            saved
                .get(id)
                .cloned()
                .unwrap_or_else(|| ReviewState::new(id, now))
        })
        .collect()
}
