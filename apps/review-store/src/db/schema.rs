//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the review database.
pub const SCHEMA: &str = r#"
-- Review state per item
CREATE TABLE IF NOT EXISTS review_states (
    item_id TEXT PRIMARY KEY,
    next_review_at INTEGER NOT NULL,
    interval_days INTEGER NOT NULL DEFAULT 0,
    ease REAL NOT NULL DEFAULT 2.5,
    repetitions INTEGER NOT NULL DEFAULT 0
);

-- One row per grading
CREATE TABLE IF NOT EXISTS review_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id TEXT NOT NULL,
    reviewed_at INTEGER NOT NULL,
    quality INTEGER NOT NULL,
    interval_before INTEGER NOT NULL,
    interval_after INTEGER NOT NULL,
    ease_before REAL NOT NULL,
    ease_after REAL NOT NULL,
    algorithm TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_review_states_due ON review_states(next_review_at);
CREATE INDEX IF NOT EXISTS idx_review_log_item ON review_log(item_id);
"#;
