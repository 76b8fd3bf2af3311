//! Note domain model.
//!
//! # Responsibility
//! - Define the note record and its persisted JSON shape.
//! - Generate fresh identities for newly created notes.
//!
//! # Invariants
//! - `id` is stable and never reused for another note in the same store.
//! - `date` and `content` are immutable after creation.
//! - A note built by the store always has non-empty `content`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque note identifier.
///
/// Freshly created notes get a random UUID string, but ids loaded from
/// storage are accepted as arbitrary text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wraps an existing identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One user-authored note.
///
/// Serialized as `{ "id": ..., "date": ..., "content": ... }` with `date`
/// written as RFC 3339 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Creation time.
    pub date: DateTime<Utc>,
    pub content: String,
}

impl Note {
    /// Creates a note with a generated id stamped with the current time.
    ///
    /// Content validation is the caller's job; see `NoteStore::create`.
    pub(crate) fn new(content: impl Into<String>) -> Self {
        Self::with_id(NoteId::generate(), Utc::now(), content)
    }

    /// Builds a note with a caller-provided identity.
    ///
    /// Used by load/import paths where identity already exists.
    pub fn with_id(id: impl Into<NoteId>, date: DateTime<Utc>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date,
            content: content.into(),
        }
    }
}
