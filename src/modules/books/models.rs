use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A book record held by the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier for the book, assigned at creation
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i64,
    pub available_copies: u32,
    /// Always `available_copies > 0` after a create or a copies update;
    /// a soft delete clears it without touching the copies.
    pub is_available: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Book {
    /// Build a fresh record with a generated id and creation timestamp.
    pub fn new(new_book: NewBook) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            is_available: new_book.available_copies > 0,
            title: new_book.title,
            author: new_book.author,
            genre: new_book.genre,
            published_year: new_book.published_year,
            available_copies: new_book.available_copies,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Shallow-merge every field present in `patch`.
    pub fn apply(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(author) = &patch.author {
            self.author.clone_from(author);
        }
        if let Some(genre) = &patch.genre {
            self.genre.clone_from(genre);
        }
        if let Some(published_year) = patch.published_year {
            self.published_year = published_year;
        }
        if let Some(available_copies) = patch.available_copies {
            self.available_copies = available_copies;
        }
        if let Some(is_available) = patch.is_available {
            self.is_available = is_available;
        }
    }
}

/// Validated input for creating a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i64,
    pub available_copies: u32,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub published_year: Option<i64>,
    pub available_copies: Option<u32>,
    pub is_available: Option<bool>,
}

/// Paginated list envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Matches after filtering, before pagination
    pub total_items: usize,
    pub current_page: i64,
    pub total_pages: usize,
    pub data: Vec<T>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_book_derives_availability_from_copies() {
        let stocked = Book::new(fixtures::new_book("Dune", "Frank Herbert", "SciFi", 2));
        let empty = Book::new(fixtures::new_book("Emma", "Jane Austen", "Classic", 0));

        assert!(stocked.is_available);
        assert!(!empty.is_available);
        assert_ne!(stocked.id, empty.id);
    }

    #[test]
    fn apply_only_overwrites_present_fields() {
        let mut book = Book::new(fixtures::new_book("Dune", "Frank Herbert", "SciFi", 2));
        let original = book.clone();

        book.apply(&BookPatch {
            title: Some("Dune Messiah".to_string()),
            published_year: Some(1969),
            ..BookPatch::default()
        });

        assert_eq!(book.title, "Dune Messiah");
        assert_eq!(book.published_year, 1969);
        assert_eq!(book.author, original.author);
        assert_eq!(book.available_copies, original.available_copies);
        assert_eq!(book.id, original.id);
        assert_eq!(book.created_at, original.created_at);
    }

    #[test]
    fn book_serializes_with_camel_case_fields() {
        let book = Book::new(fixtures::new_book("Dune", "Frank Herbert", "SciFi", 2));
        let json = serde_json::to_value(&book).unwrap();

        assert_eq!(json["publishedYear"], 2000);
        assert_eq!(json["availableCopies"], 2);
        assert_eq!(json["isAvailable"], true);
        assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));
    }
}
