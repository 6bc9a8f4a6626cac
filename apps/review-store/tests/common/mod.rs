//! Common test utilities for integration tests.
//!
//! Provides a TestContext that wires a review service over an in-memory
//! SQLite store and a manually driven clock.

pub mod fixtures;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use review_core::{FixedClock, PracticeSettings};
use review_store::{ReviewService, SqliteStore};

/// Fixed starting point for every test clock.
pub fn start_time() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

pub struct TestContext {
    pub service: ReviewService<SqliteStore>,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(PracticeSettings::default())
    }

    pub fn with_settings(settings: PracticeSettings) -> Self {
        let clock = Arc::new(FixedClock::new(start_time()));
        let store = SqliteStore::open_in_memory().expect("in-memory database");
        let service = ReviewService::new(store, settings, clock.clone()).expect("review service");
        Self { service, clock }
    }
}
