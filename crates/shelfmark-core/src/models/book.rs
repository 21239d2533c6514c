use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

// ─── Book ──────────────────────────────────────────────────

/// A single tracked book — the canonical record persisted in the
/// `"books"` slot as part of a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Opaque unique id, assigned at creation, immutable afterwards.
    pub id: String,

    pub title: String,

    pub author: String,

    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    pub pages: u32,

    /// Publication year.
    pub published: i32,

    pub isbn: String,

    #[serde(default)]
    pub status: BookStatus,
}

impl Book {
    /// Create a new record with a freshly assigned id. Remaining fields
    /// start empty and are filled in by the caller.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            author: author.into(),
            cover: None,
            pages: 0,
            published: 0,
            isbn: String::new(),
            status: BookStatus::default(),
        }
    }
}

/// Millisecond-timestamp id. Monotonically increasing in practice;
/// collision between two creations in the same millisecond is accepted
/// as out of scope.
pub fn generate_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

// ─── Status ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    New,
    Reading,
    Finished,
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Reading => write!(f, "reading"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "reading" => Ok(Self::Reading),
            "finished" => Ok(Self::Finished),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_new_defaults() {
        let book = Book::new("Dune", "Frank Herbert");
        assert!(!book.id.is_empty());
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert!(book.cover.is_none());
        assert_eq!(book.status, BookStatus::New);
    }

    #[test]
    fn test_book_json_roundtrip() {
        let mut book = Book::new("Dune", "Frank Herbert");
        book.pages = 412;
        book.published = 1965;
        book.isbn = "9780441172719".to_string();
        book.status = BookStatus::Reading;

        let json = serde_json::to_string(&book).unwrap();
        let restored: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, book);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookStatus::Finished).unwrap();
        assert_eq!(json, "\"finished\"");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("new".parse::<BookStatus>().unwrap(), BookStatus::New);
        assert_eq!("reading".parse::<BookStatus>().unwrap(), BookStatus::Reading);
        assert_eq!("finished".parse::<BookStatus>().unwrap(), BookStatus::Finished);
        assert!("read".parse::<BookStatus>().is_err());
    }

    #[test]
    fn test_missing_status_defaults_to_new() {
        let json = r#"{"id":"1","title":"T","author":"A","pages":1,"published":2000,"isbn":"x"}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.status, BookStatus::New);
    }
}
