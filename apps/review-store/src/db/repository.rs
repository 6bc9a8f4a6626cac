//! SQLite-backed review store.

use crate::db::error::DbError;
use crate::db::schema::{SCHEMA, SCHEMA_VERSION};
use crate::journal::{RecordReviews, ReviewLogEntry};
use chrono::{DateTime, Utc};
use review_core::{ItemId, ReviewState, ReviewStore};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// SQLite implementation of the review store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating it and its directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(Into::into)
    }

    fn row_to_state(row: &Row) -> rusqlite::Result<ReviewState> {
        let millis: i64 = row.get(1)?;
        let next_review_at = DateTime::from_timestamp_millis(millis)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(1, millis))?;
        Ok(ReviewState {
            item_id: row.get(0)?,
            next_review_at,
            interval_days: row.get(2)?,
            ease: row.get(3)?,
            repetitions: row.get(4)?,
        })
    }

    fn row_to_entry(row: &Row) -> rusqlite::Result<ReviewLogEntry> {
        let millis: i64 = row.get(1)?;
        let reviewed_at = DateTime::from_timestamp_millis(millis)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(1, millis))?;
        Ok(ReviewLogEntry {
            item_id: row.get(0)?,
            reviewed_at,
            quality: row.get(2)?,
            interval_before: row.get(3)?,
            interval_after: row.get(4)?,
            ease_before: row.get(5)?,
            ease_after: row.get(6)?,
            algorithm: row.get(7)?,
        })
    }

    fn upsert_state(conn: &Connection, state: &ReviewState) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO review_states (item_id, next_review_at, interval_days, ease, repetitions) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                state.item_id,
                state.next_review_at.timestamp_millis(),
                state.interval_days,
                state.ease,
                state.repetitions
            ],
        )?;
        Ok(())
    }
}

impl ReviewStore for SqliteStore {
    type Error = DbError;

    fn load_all(&self) -> Result<HashMap<ItemId, ReviewState>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, next_review_at, interval_days, ease, repetitions FROM review_states",
        )?;
        let states = stmt
            .query_map([], Self::row_to_state)?
            .map(|r| r.map(|s| (s.item_id.clone(), s)))
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(states)
    }

    fn get(&self, item_id: &str) -> Result<Option<ReviewState>> {
        self.conn
            .query_row(
                "SELECT item_id, next_review_at, interval_days, ease, repetitions FROM review_states WHERE item_id = ?1",
                params![item_id],
                Self::row_to_state,
            )
            .optional()
            .map_err(Into::into)
    }

    fn save(&self, state: &ReviewState) -> Result<()> {
        Self::upsert_state(&self.conn, state)
    }

    fn save_all(&self, states: &[ReviewState]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for state in states {
            Self::upsert_state(&tx, state)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM review_states", [])?;
        tx.execute("DELETE FROM review_log", [])?;
        tx.commit()?;
        Ok(removed)
    }
}

impl RecordReviews for SqliteStore {
    fn record_review(&self, after: &ReviewState, entry: &ReviewLogEntry) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        Self::upsert_state(&tx, after)?;
        tx.execute(
            "INSERT INTO review_log (item_id, reviewed_at, quality, interval_before, interval_after, ease_before, ease_after, algorithm) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.item_id,
                entry.reviewed_at.timestamp_millis(),
                entry.quality,
                entry.interval_before,
                entry.interval_after,
                entry.ease_before,
                entry.ease_after,
                entry.algorithm
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn history(&self, item_id: &str) -> Result<Vec<ReviewLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, reviewed_at, quality, interval_before, interval_after, ease_before, ease_after, algorithm FROM review_log WHERE item_id = ?1 ORDER BY reviewed_at, id",
        )?;
        let entries = stmt
            .query_map(params![item_id], Self::row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn count_reviews_since(&self, since: DateTime<Utc>) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM review_log WHERE reviewed_at >= ?1",
            params![since.timestamp_millis()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
