//! Note persistence contract and local-storage implementation.
//!
//! # Responsibility
//! - Serialize the whole note collection under a single storage key.
//! - Parse persisted JSON back into typed notes, dates included.
//!
//! # Invariants
//! - Order of the persisted array equals in-memory order (newest first).
//! - Loaded notes have a non-empty id and non-empty content; other entries
//!   are dropped.
//! - Duplicate ids in persisted data keep only their first occurrence.

use crate::db::{StorageError, KeyValueStore};
use crate::model::note::Note;
use log::{debug, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized note array.
pub const NOTES_STORAGE_KEY: &str = "notes";

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure reading or writing the persisted note collection.
#[derive(Debug)]
pub enum PersistenceError {
    /// Underlying storage read/write failed.
    Storage(StorageError),
    /// Persisted value is not a valid note array, or encoding failed.
    Serialization(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "note storage failed: {err}"),
            Self::Serialization(err) => write!(f, "invalid persisted notes: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Port between the note store and durable storage.
pub trait NotePersistence {
    /// Reads the persisted collection; empty when nothing was saved yet.
    fn load(&self) -> PersistenceResult<Vec<Note>>;
    /// Replaces the persisted collection with `notes`.
    fn save(&mut self, notes: &[Note]) -> PersistenceResult<()>;
}

/// Persists notes as one JSON array inside a [`KeyValueStore`].
pub struct LocalNotePersistence<S: KeyValueStore> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> LocalNotePersistence<S> {
    /// Uses the default [`NOTES_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, NOTES_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

impl<S: KeyValueStore> NotePersistence for LocalNotePersistence<S> {
    fn load(&self) -> PersistenceResult<Vec<Note>> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: Vec<Note> = serde_json::from_str(&raw)?;
        let notes = sanitize_loaded(&self.key, parsed);
        debug!(
            "event=notes_load module=repo status=ok key={} note_count={}",
            self.key,
            notes.len()
        );
        Ok(notes)
    }

    fn save(&mut self, notes: &[Note]) -> PersistenceResult<()> {
        let encoded = serde_json::to_string(notes)?;
        self.storage.set_item(&self.key, &encoded)?;
        debug!(
            "event=notes_save module=repo status=ok key={} note_count={} bytes={}",
            self.key,
            notes.len(),
            encoded.len()
        );
        Ok(())
    }
}

/// Keeps process-local notes; nothing outlives the value.
///
/// Backs ephemeral sessions and tests that do not care about SQLite.
#[derive(Debug, Default, Clone)]
pub struct MemoryNotePersistence {
    notes: Vec<Note>,
    saves: usize,
}

impl MemoryNotePersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing collection, as if it had been saved before.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self { notes, saves: 0 }
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl NotePersistence for MemoryNotePersistence {
    fn load(&self) -> PersistenceResult<Vec<Note>> {
        Ok(sanitize_loaded("memory", self.notes.clone()))
    }

    fn save(&mut self, notes: &[Note]) -> PersistenceResult<()> {
        self.notes = notes.to_vec();
        self.saves += 1;
        Ok(())
    }
}

fn sanitize_loaded(source: &str, notes: Vec<Note>) -> Vec<Note> {
    let total = notes.len();
    let mut invalid = 0usize;
    let mut duplicates = 0usize;
    let mut seen = HashSet::with_capacity(total);

    let kept = notes
        .into_iter()
        .filter(|note| {
            if note.id.as_str().is_empty() || note.content.is_empty() {
                invalid += 1;
                return false;
            }
            if !seen.insert(note.id.clone()) {
                duplicates += 1;
                return false;
            }
            true
        })
        .collect::<Vec<_>>();

    if kept.len() != total {
        warn!(
            "event=notes_load module=repo status=degraded source={} dropped_invalid={} dropped_duplicates={}",
            source, invalid, duplicates
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::{
        LocalNotePersistence, MemoryNotePersistence, NotePersistence, PersistenceError,
        NOTES_STORAGE_KEY,
    };
    use crate::db::{KeyValueStore, SqliteLocalStorage};
    use crate::model::note::Note;
    use chrono::{TimeZone, Utc};

    fn persistence() -> LocalNotePersistence<SqliteLocalStorage> {
        LocalNotePersistence::new(SqliteLocalStorage::open_in_memory().unwrap())
    }

    #[test]
    fn absent_and_blank_entries_load_empty() {
        let mut persistence = persistence();
        assert!(persistence.load().unwrap().is_empty());

        persistence
            .storage_mut()
            .set_item(NOTES_STORAGE_KEY, "")
            .unwrap();
        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let mut persistence = persistence();
        persistence
            .storage_mut()
            .set_item(NOTES_STORAGE_KEY, "{not json")
            .unwrap();

        let err = persistence.load().unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut persistence = persistence();
        persistence
            .storage_mut()
            .set_item(
                NOTES_STORAGE_KEY,
                r#"[
                    {"id":"1","date":"2024-01-02T00:00:00Z","content":"newer"},
                    {"id":"1","date":"2024-01-01T00:00:00Z","content":"older"}
                ]"#,
            )
            .unwrap();

        let notes = persistence.load().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "newer");
    }

    #[test]
    fn save_writes_full_array_under_key() {
        let mut persistence = persistence();
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        persistence
            .save(&[Note::with_id("a", date, "first")])
            .unwrap();

        let raw = persistence
            .storage()
            .get_item(NOTES_STORAGE_KEY)
            .unwrap()
            .expect("notes entry should exist");
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], "a");
        assert_eq!(value[0]["date"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn custom_key_keeps_collections_apart() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut archive = LocalNotePersistence::with_key(
            SqliteLocalStorage::open_in_memory().unwrap(),
            "archived_notes",
        );
        archive.save(&[Note::with_id("old", date, "archived")]).unwrap();

        assert!(archive
            .storage()
            .get_item(NOTES_STORAGE_KEY)
            .unwrap()
            .is_none());
        assert_eq!(archive.load().unwrap()[0].content, "archived");
    }

    #[test]
    fn memory_persistence_drops_invalid_entries_on_load() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut persistence = MemoryNotePersistence::with_notes(vec![
            Note::with_id("", date, "no id"),
            Note::with_id("blank", date, ""),
            Note::with_id("ok", date, "fine"),
        ]);

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_str(), "ok");

        persistence.save(&loaded).unwrap();
        assert_eq!(persistence.save_count(), 1);
        assert_eq!(persistence.load().unwrap(), loaded);
    }
}
