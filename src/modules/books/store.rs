//! Book storage.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{Book, BookPatch};

/// Storage seam for the book catalogue.
///
/// Absence is reported as `None`; turning it into an error is the caller's job.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Append a record; ids are not checked for duplicates.
    async fn create(&self, book: Book) -> Book;

    /// Snapshot of every record in insertion order.
    async fn find_all(&self) -> Vec<Book>;

    async fn find_by_id(&self, id: &str) -> Option<Book>;

    /// Merge `patch` into the record in place and return the result.
    async fn update(&self, id: &str, patch: &BookPatch) -> Option<Book>;

    async fn len(&self) -> usize;
}

/// Insertion-ordered in-memory store; one lock guards each operation.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn create(&self, book: Book) -> Book {
        self.books.write().await.push(book.clone());
        book
    }

    async fn find_all(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    async fn find_by_id(&self, id: &str) -> Option<Book> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
    }

    async fn update(&self, id: &str, patch: &BookPatch) -> Option<Book> {
        let mut books = self.books.write().await;
        let book = books.iter_mut().find(|book| book.id == id)?;
        book.apply(patch);
        Some(book.clone())
    }

    async fn len(&self) -> usize {
        self.books.read().await.len()
    }
}
