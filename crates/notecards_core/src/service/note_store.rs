//! Note store use-cases.
//!
//! # Responsibility
//! - Own the authoritative, ordered in-memory note collection.
//! - Mirror every mutation to the persistence port with a full rewrite.
//!
//! # Invariants
//! - Notes are ordered newest first; `create` prepends.
//! - Ids are unique within the collection.
//! - Empty content never reaches the collection.
//! - A failed write leaves the attempted change in memory; `persist`
//!   retries the write.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NotePersistence, PersistenceError};
use crate::search::filter::filter_notes;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store error for note use-cases.
#[derive(Debug)]
pub enum NoteStoreError {
    /// Content was empty; nothing was created.
    EmptyContent,
    /// Persisted mirror could not be read or written.
    Persistence(PersistenceError),
}

impl NoteStoreError {
    /// Whether the error is a rejected input rather than a storage failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyContent)
    }
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note content must not be empty"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyContent => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<PersistenceError> for NoteStoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Note collection plus its persisted mirror.
pub struct NoteStore<P: NotePersistence> {
    notes: Vec<Note>,
    persistence: P,
}

impl<P: NotePersistence> NoteStore<P> {
    /// Opens the store and loads the persisted collection.
    pub fn open(persistence: P) -> Result<Self, NoteStoreError> {
        let notes = persistence.load()?;
        info!(
            "event=store_open module=store status=ok note_count={}",
            notes.len()
        );
        Ok(Self { notes, persistence })
    }

    /// Reads the persisted collection without touching memory.
    pub fn load(&self) -> Result<Vec<Note>, NoteStoreError> {
        Ok(self.persistence.load()?)
    }

    /// Replaces the in-memory collection with the persisted one.
    pub fn reload(&mut self) -> Result<&[Note], NoteStoreError> {
        self.notes = self.persistence.load()?;
        Ok(&self.notes)
    }

    /// Creates a note from non-empty content and persists the collection.
    ///
    /// On a persistence failure the note stays in memory and the error is
    /// returned; the created note is not handed back in that case.
    pub fn create(&mut self, content: impl Into<String>) -> Result<Note, NoteStoreError> {
        let content = content.into();
        if content.is_empty() {
            info!("event=note_create module=store status=rejected reason=empty_content");
            return Err(NoteStoreError::EmptyContent);
        }

        let mut note = Note::new(content);
        while self.contains(&note.id) {
            note.id = NoteId::generate();
        }

        self.notes.insert(0, note.clone());
        self.write("note_create")?;
        info!(
            "event=note_create module=store status=ok note_id={} content_chars={} note_count={}",
            note.id,
            note.content.chars().count(),
            self.notes.len()
        );
        Ok(note)
    }

    /// Deletes the note with `id` and persists the collection.
    ///
    /// Unknown ids are a no-op; the collection is still rewritten. Returns
    /// whether a note was removed.
    pub fn delete(&mut self, id: &NoteId) -> Result<bool, NoteStoreError> {
        let before = self.notes.len();
        self.notes.retain(|note| &note.id != id);
        let removed = self.notes.len() != before;

        self.write("note_delete")?;
        info!(
            "event=note_delete module=store status=ok note_id={} removed={} note_count={}",
            id,
            removed,
            self.notes.len()
        );
        Ok(removed)
    }

    /// Rewrites the current collection, e.g. after a failed mutation.
    pub fn persist(&mut self) -> Result<(), NoteStoreError> {
        self.write("store_persist")
    }

    /// Notes narrowed by a free-text query; see [`filter_notes`].
    pub fn search(&self, query: &str) -> Vec<&Note> {
        filter_notes(&self.notes, query)
    }

    /// All notes, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    fn write(&mut self, event: &'static str) -> Result<(), NoteStoreError> {
        if let Err(err) = self.persistence.save(&self.notes) {
            error!(
                "event={} module=store status=error error_code=persist_failed note_count={} error={}",
                event,
                self.notes.len(),
                err
            );
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteStore, NoteStoreError};
    use crate::model::note::NoteId;
    use crate::repo::note_repo::{MemoryNotePersistence, NotePersistence};

    fn empty_store() -> NoteStore<MemoryNotePersistence> {
        NoteStore::open(MemoryNotePersistence::new()).unwrap()
    }

    #[test]
    fn create_prepends_newest_first() {
        let mut store = empty_store();
        let first = store.create("first").unwrap();
        let second = store.create("second").unwrap();

        let ids: Vec<_> = store.notes().iter().map(|note| note.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn empty_content_is_validation_error() {
        let mut store = empty_store();
        let err = store.create("").unwrap_err();
        assert!(matches!(err, NoteStoreError::EmptyContent));
        assert!(err.is_validation());
        assert!(store.is_empty());
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let mut store = empty_store();
        let note = store.create("hello").unwrap();

        assert!(!store.delete(&NoteId::new("nonexistent")).unwrap());
        assert!(store.delete(&note.id).unwrap());
        assert!(!store.delete(&note.id).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn every_mutation_writes_through() {
        let mut store = empty_store();
        let note = store.create("hello").unwrap();
        store.delete(&NoteId::new("nonexistent")).unwrap();
        assert_eq!(store.persistence_mut().save_count(), 2);

        store.delete(&note.id).unwrap();
        assert_eq!(store.persistence_mut().save_count(), 3);
        assert!(store.persistence_mut().load().unwrap().is_empty());
    }

    #[test]
    fn rejected_content_does_not_write() {
        let mut store = empty_store();
        store.create("").unwrap_err();
        assert_eq!(store.persistence_mut().save_count(), 0);
    }
}
