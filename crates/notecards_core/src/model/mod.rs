//! Domain model for note cards.
//!
//! # Responsibility
//! - Define the canonical note record shared by store, filter and UI layers.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard removal from the collection; there are no tombstones.

pub mod note;
