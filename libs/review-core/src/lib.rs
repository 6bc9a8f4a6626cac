//! Core review library shared by the store and command-line front ends.
//!
//! Provides:
//! - SM-2 spaced repetition grading and due-item selection
//! - Answer scoring for typed and spoken answers (Levenshtein distance)
//! - Practice settings per answer mode
//! - Store and clock contracts the host application implements

pub mod algorithm;
pub mod clock;
pub mod error;
pub mod matching;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod types;

pub use algorithm::{get_algorithm, grade, require_algorithm, ReviewAlgorithm};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, ValidationError};
pub use matching::{
    char_diff, classify, compare, levenshtein_distance, normalize_answer, similarity,
    CompareOptions, DiffSegment, DiffType, TierThresholds,
};
pub use scheduler::{hydrate_states, select_due_items, DueSelection};
pub use settings::{EffectiveSettings, ModeSettings, PracticeMode, PracticeSettings};
pub use store::{MemoryStore, ReviewStore};
pub use types::{ComparisonResult, ItemId, Quality, Rating, ReviewState, Tier};
