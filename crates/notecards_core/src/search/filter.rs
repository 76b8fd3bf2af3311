//! Case-insensitive substring filter over note content.
//!
//! # Invariants
//! - An empty query is the identity: every note, same order.
//! - Matching preserves the relative order of the input.
//! - The query is used as typed (no trimming), so `" "` matches notes
//!   containing a space.

use crate::model::note::Note;

/// Returns the notes whose content contains `query`, ignoring case.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    if query.is_empty() {
        return notes.iter().collect();
    }

    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| note.content.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::filter_notes;
    use crate::model::note::Note;
    use chrono::Utc;

    fn notes(contents: &[&str]) -> Vec<Note> {
        contents
            .iter()
            .enumerate()
            .map(|(idx, content)| Note::with_id(idx.to_string(), Utc::now(), *content))
            .collect()
    }

    #[test]
    fn whitespace_query_is_not_trimmed() {
        let notes = notes(&["buymilk", "call mom"]);
        let hits = filter_notes(&notes, " ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "call mom");
    }

    #[test]
    fn matches_non_ascii_content_case_insensitively() {
        let notes = notes(&["Reunião às 10h", "outra coisa"]);
        let hits = filter_notes(&notes, "REUNIÃO");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "0");
    }
}
