//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::error::{Result, ValidationError};
use crate::types::{ItemId, Quality, ReviewState};
use chrono::{DateTime, Utc};

/// Trait for spaced repetition algorithms.
pub trait ReviewAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// State of an item that has never been reviewed.
    fn initial_state(&self, item_id: ItemId, now: DateTime<Utc>) -> ReviewState;

    /// Calculate the next review state after grading with `quality`.
    ///
    /// Must not mutate `state`.
    fn schedule(&self, state: &ReviewState, quality: Quality, now: DateTime<Utc>) -> ReviewState;

    /// Validate a raw 0-5 grade, then schedule.
    fn grade(&self, state: &ReviewState, quality: u8, now: DateTime<Utc>) -> Result<ReviewState> {
        let quality = Quality::new(quality)?;
        Ok(self.schedule(state, quality, now))
    }
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn ReviewAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}

/// Like [`get_algorithm`] but reports unknown names as a validation error.
pub fn require_algorithm(name: &str) -> Result<Box<dyn ReviewAlgorithm>> {
    get_algorithm(name).ok_or_else(|| ValidationError::UnknownAlgorithm(name.to_string()))
}

/// Grade with the default SM-2 parameters.
pub fn grade(state: &ReviewState, quality: u8, now: DateTime<Utc>) -> Result<ReviewState> {
    sm2::Sm2::default().grade(state, quality, now)
}
