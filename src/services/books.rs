//! Book catalog service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, BookPatch, BookQuery},
    repository::Repository,
};

/// Parse a path identifier, rejecting anything that is not a UUID
pub fn parse_book_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId("Invalid book ID".to_string()))
}

pub fn book_not_found() -> AppError {
    AppError::NotFound("Book not found".to_string())
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One page of books plus the total number of matching books.
    ///
    /// The page and the total are two separate reads; under concurrent writes
    /// they may disagree.
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let books = self.repository.books.list(query).await?;
        let total = self.repository.books.count(query.genre).await?;
        tracing::debug!(
            "Listed {} of {} books (page {}, limit {})",
            books.len(),
            total,
            query.pagination.page,
            query.pagination.limit
        );
        Ok((books, total))
    }

    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        let new_book = input.into_new_book()?;
        let book = self.repository.books.insert(&new_book).await?;
        tracing::info!("Created book id={} isbn={}", book.id, book.isbn);
        Ok(book)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get(id).await?.ok_or_else(book_not_found)
    }

    /// Apply a partial update, re-validating the merged record before writing.
    pub async fn update(&self, id: Uuid, patch: BookPatch) -> AppResult<Book> {
        let existing = self.get(id).await?;
        let merged = BookInput::from(&existing).merge(patch).into_new_book()?;

        let book = self
            .repository
            .books
            .update(id, &merged)
            .await?
            .ok_or_else(book_not_found)?;
        tracing::info!("Updated book id={}", book.id);
        Ok(book)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repository.books.delete(id).await? {
            return Err(book_not_found());
        }
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
