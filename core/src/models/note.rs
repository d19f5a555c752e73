use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque note identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(String);

impl NoteId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub date: NaiveDate,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a new note with a generated ID. Content is trimmed.
    pub fn new(date: NaiveDate, content: &str) -> crate::Result<Self> {
        Self::with_id(NoteId::generate(), date, content)
    }

    /// Create a note with a specific ID (for testing or import)
    pub fn with_id(id: NoteId, date: NaiveDate, content: &str) -> crate::Result<Self> {
        let content = content.trim();
        if content.is_empty() {
            return Err(crate::Error::EmptyNote);
        }
        Ok(Self {
            id,
            date,
            content: content.to_string(),
            created_at: Utc::now(),
        })
    }

    /// The `YYYY-MM-DD` key this note is grouped under
    pub fn day_key(&self) -> String {
        super::day_key(self.date)
    }

    /// Whether this note belongs to the given calendar day
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.day_key() == super::day_key(date)
    }
}
