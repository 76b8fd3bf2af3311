//! Persistence port for the note collection.
//!
//! # Responsibility
//! - Define the `load`/`save` contract the note store depends on.
//! - Map the collection onto one local storage entry as JSON.
//!
//! # Invariants
//! - `save` always writes the full collection; there is no delta format.
//! - An absent entry loads as an empty collection.

pub mod note_repo;
