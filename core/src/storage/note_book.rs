use crate::models::{Note, NoteId};
use crate::Result;
use chrono::NaiveDate;

/// In-memory, append-only list of notes. Lives as long as the process.
#[derive(Debug, Default, Clone)]
pub struct NoteBook {
    notes: Vec<Note>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a note for `date` and append it. Content is trimmed;
    /// whitespace-only content is rejected with [`crate::Error::EmptyNote`].
    pub fn add(&mut self, date: NaiveDate, content: &str) -> Result<&Note> {
        let note = Note::new(date, content)?;
        Ok(self.push(note))
    }

    /// Append an already-built note
    pub fn push(&mut self, note: Note) -> &Note {
        self.notes.push(note);
        &self.notes[self.notes.len() - 1]
    }

    /// Notes on the given day, in insertion order
    pub fn notes_for(&self, date: NaiveDate) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.is_on(date)).collect()
    }

    /// Number of notes on the given day
    pub fn count_for(&self, date: NaiveDate) -> usize {
        self.notes.iter().filter(|n| n.is_on(date)).count()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_and_filter() {
        let mut book = NoteBook::new();
        let id = book.add(date(2024, 8, 4), "Buy milk").unwrap().id.clone();

        let found = book.notes_for(date(2024, 8, 4));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content, "Buy milk");
        assert_eq!(found[0].id, id);
        assert!(book.notes_for(date(2024, 8, 5)).is_empty());
        assert!(book.notes_for(date(2025, 8, 4)).is_empty());
        assert!(book.notes_for(date(2024, 9, 4)).is_empty());
        assert_eq!(book.count_for(date(2025, 8, 4)), 0);
        assert_eq!(book.get(&id).map(|n| n.content.as_str()), Some("Buy milk"));
    }

    #[test]
    fn test_whitespace_is_rejected_without_mutation() {
        let mut book = NoteBook::new();
        assert_eq!(book.add(date(2024, 8, 4), "  ").unwrap_err(), Error::EmptyNote);
        assert!(book.is_empty());
    }

    #[test]
    fn test_many_notes_share_a_date() {
        let mut book = NoteBook::new();
        for text in ["a", "b", "c"] {
            book.add(date(2024, 2, 29), text).unwrap();
        }
        book.add(date(2024, 3, 1), "d").unwrap();

        let contents: Vec<&str> = book
            .notes_for(date(2024, 2, 29))
            .iter()
            .map(|n| n.content.as_str())
            .collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert_eq!(book.len(), 4);
    }

    #[test]
    fn test_count_matches_filter_for_every_day() {
        let mut book = NoteBook::new();
        let days = [3u32, 3, 17, 31, 3, 17, 1];
        for (i, d) in days.iter().enumerate() {
            book.add(date(2024, 1, *d), &format!("note {i}")).unwrap();
        }
        for d in 1..=31 {
            let day = date(2024, 1, d);
            let expected = days.iter().filter(|x| **x == d).count();
            assert_eq!(book.count_for(day), expected);
            assert_eq!(book.notes_for(day).len(), expected);
        }
    }
}
