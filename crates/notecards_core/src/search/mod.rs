//! Note search entry points.
//!
//! # Responsibility
//! - Derive the visible note subset for a free-text query.
//! - Never mutate or persist the collection being searched.

pub mod filter;
