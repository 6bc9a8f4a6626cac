//! JSON snapshot store.
//!
//! Keeps every state in one JSON object keyed by item id, the same shape the
//! browser client kept in local storage:
//!
//! ```json
//! { "neko": { "item_id": "neko", "next_review_at": 1700000000000,
//!             "interval_days": 1, "ease": 2.6, "repetitions": 1 } }
//! ```

use crate::db::DbError;
use crate::journal::RecordReviews;
use review_core::{ItemId, ReviewState, ReviewStore};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type Result<T> = std::result::Result<T, DbError>;

pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write of the snapshot file.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Use the snapshot at `path`. The file is created on first save.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    fn read_snapshot(&self) -> Result<HashMap<ItemId, ReviewState>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }

        let states: HashMap<ItemId, ReviewState> = serde_json::from_str(&contents)?;
        if let Some((key, state)) = states.iter().find(|(key, state)| **key != state.item_id) {
            return Err(DbError::InvalidData(format!(
                "snapshot key {key} holds state for {}",
                state.item_id
            )));
        }
        Ok(states)
    }

    fn write_snapshot(&self, states: &HashMap<ItemId, ReviewState>) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(states)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify<F>(&self, f: F) -> Result<usize>
    where
        F: FnOnce(&mut HashMap<ItemId, ReviewState>) -> usize,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| DbError::InvalidData("snapshot lock poisoned".into()))?;
        let mut states = self.read_snapshot()?;
        let changed = f(&mut states);
        self.write_snapshot(&states)?;
        Ok(changed)
    }
}

impl ReviewStore for JsonFileStore {
    type Error = DbError;

    fn load_all(&self) -> Result<HashMap<ItemId, ReviewState>> {
        self.read_snapshot()
    }

    fn get(&self, item_id: &str) -> Result<Option<ReviewState>> {
        Ok(self.read_snapshot()?.remove(item_id))
    }

    fn save(&self, state: &ReviewState) -> Result<()> {
        self.modify(|states| {
            states.insert(state.item_id.clone(), state.clone());
            1
        })?;
        Ok(())
    }

    fn save_all(&self, new_states: &[ReviewState]) -> Result<()> {
        self.modify(|states| {
            for state in new_states {
                states.insert(state.item_id.clone(), state.clone());
            }
            new_states.len()
        })?;
        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        self.modify(|states| {
            let removed = states.len();
            states.clear();
            removed
        })
    }
}

impl RecordReviews for JsonFileStore {}
