//! Persistence contract for review states.

use crate::types::{ItemId, ReviewState};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::RwLock;

/// Key-value storage of review states, keyed by item id.
///
/// Implementations must make `save` durable before returning; the review
/// flow relies on it to persist each grading exactly once.
pub trait ReviewStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_all(&self) -> Result<HashMap<ItemId, ReviewState>, Self::Error>;
    fn get(&self, item_id: &str) -> Result<Option<ReviewState>, Self::Error>;
    fn save(&self, state: &ReviewState) -> Result<(), Self::Error>;

    fn save_all(&self, states: &[ReviewState]) -> Result<(), Self::Error> {
        for state in states {
            self.save(state)?;
        }
        Ok(())
    }

    /// Remove every stored state. Returns how many were removed.
    fn clear(&self) -> Result<usize, Self::Error>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    states: RwLock<HashMap<ItemId, ReviewState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states(states: impl IntoIterator<Item = ReviewState>) -> Self {
        let states = states
            .into_iter()
            .map(|s| (s.item_id.clone(), s))
            .collect();
        Self {
            states: RwLock::new(states),
        }
    }

    pub fn len(&self) -> usize {
        self.states.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReviewStore for MemoryStore {
    type Error = Infallible;

    fn load_all(&self) -> Result<HashMap<ItemId, ReviewState>, Self::Error> {
        Ok(self.states.read().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn get(&self, item_id: &str) -> Result<Option<ReviewState>, Self::Error> {
        Ok(self
            .states
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(item_id)
            .cloned())
    }

    fn save(&self, state: &ReviewState) -> Result<(), Self::Error> {
        self.states
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(state.item_id.clone(), state.clone());
        Ok(())
    }

    fn clear(&self) -> Result<usize, Self::Error> {
        let mut states = self.states.write().unwrap_or_else(|e| e.into_inner());
        let removed = states.len();
        states.clear();
        Ok(removed)
    }
}
