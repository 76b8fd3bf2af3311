//! Core domain logic for notecards.
//! This crate is the single source of truth for note invariants.

pub mod config;
pub mod db;
pub mod display;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod speech;

pub use config::AppConfig;
pub use db::{StorageError, StorageResult, KeyValueStore, SqliteLocalStorage};
pub use display::relative_label;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId};
pub use repo::note_repo::{
    LocalNotePersistence, MemoryNotePersistence, NotePersistence, PersistenceError,
    PersistenceResult, NOTES_STORAGE_KEY,
};
pub use search::filter::filter_notes;
pub use service::note_draft::{DraftMode, NoteDraft, NoteDraftError};
pub use service::note_store::{NoteStore, NoteStoreError};
pub use speech::capability::{
    RecognitionConfig, SpeechError, SpeechErrorCallback, SpeechToText, TranscriptCallback,
    TranscriptEvent, TranscriptSegment, DEFAULT_SPEECH_LANGUAGE,
};
pub use speech::scripted::{ScriptStep, ScriptedSpeech, UnsupportedSpeech};

/// Note store persisted in a SQLite-backed local storage file.
pub type LocalNoteStore = NoteStore<LocalNotePersistence<SqliteLocalStorage>>;

/// Opens the note store persisted at `config.db_path`.
pub fn open_local_store(config: &AppConfig) -> Result<LocalNoteStore, NoteStoreError> {
    let storage = SqliteLocalStorage::open(&config.db_path).map_err(PersistenceError::from)?;
    NoteStore::open(LocalNotePersistence::new(storage))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
