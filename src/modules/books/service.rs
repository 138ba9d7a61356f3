use bookshelf_http::error::AppError;

use super::models::{Book, BookPatch, NewBook, Page};
use super::query::{self, QueryOptions};
use super::store::{BookStore, InMemoryBookStore};

const BOOK_NOT_FOUND: &str = "Book not found";

/// Business rules over a [`BookStore`].
pub struct BookManager<S = InMemoryBookStore> {
    store: S,
}

impl<S: BookStore> BookManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_book(&self, new_book: NewBook) -> Result<Book, AppError> {
        let book = self.store.create(Book::new(new_book)).await;
        tracing::info!(
            book_id = %book.id,
            available_copies = book.available_copies,
            "book created"
        );
        Ok(book)
    }

    pub async fn get_all_books(&self, options: &QueryOptions) -> Page<Book> {
        query::execute(self.store.find_all().await, options)
    }

    pub async fn get_book_by_id(&self, id: &str) -> Result<Book, AppError> {
        self.store
            .find_by_id(id)
            .await
            .ok_or_else(|| AppError::not_found(BOOK_NOT_FOUND))
    }

    /// Apply a partial update. A copies change always re-derives
    /// availability, overriding any explicit `is_available` in the patch.
    pub async fn update_book(&self, id: &str, mut patch: BookPatch) -> Result<Book, AppError> {
        self.get_book_by_id(id).await?;

        if let Some(available_copies) = patch.available_copies {
            patch.is_available = Some(available_copies > 0);
        }

        let book = self
            .store
            .update(id, &patch)
            .await
            .ok_or_else(|| lost_update(id))?;

        tracing::info!(book_id = %book.id, is_available = book.is_available, "book updated");
        Ok(book)
    }

    /// Soft delete: the record stays, only `is_available` is cleared.
    pub async fn delete_book(&self, id: &str) -> Result<(), AppError> {
        self.get_book_by_id(id).await?;

        let patch = BookPatch {
            is_available: Some(false),
            ..BookPatch::default()
        };
        self.store
            .update(id, &patch)
            .await
            .ok_or_else(|| lost_update(id))?;

        tracing::info!(book_id = %id, "book marked unavailable");
        Ok(())
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }
}

fn lost_update(id: &str) -> AppError {
    tracing::error!(book_id = %id, "book vanished between lookup and update");
    AppError::internal("Failed to update book")
}
