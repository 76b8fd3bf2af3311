//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate persistence calls into use-case level APIs.
//! - Keep UI layers decoupled from storage details.

pub mod note_draft;
pub mod note_store;
