//! Repository layer for database operations
//!
//! Services talk to storage through the [`BookStore`] and [`BorrowStore`]
//! traits so the same business rules run against Postgres or the in-memory
//! backend.

pub mod books;
pub mod borrows;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, BookQuery, Borrow, BorrowSummary, Genre, NewBook, NewBorrow},
};

/// Book persistence operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// One page of books matching the query, in query order
    async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>>;

    /// Number of books matching the genre filter, ignoring pagination
    async fn count(&self, genre: Option<Genre>) -> AppResult<i64>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// Insert a book, assigning its id and timestamps
    async fn insert(&self, book: &NewBook) -> AppResult<Book>;

    /// Replace the content of a book. Returns `None` when it does not exist.
    async fn update(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>>;

    /// Hard delete. Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Atomically take `quantity` copies off the shelf, marking the book
    /// unavailable when none are left. Returns `None` when the book does not
    /// exist or holds fewer than `quantity` copies.
    async fn take_copies(&self, id: Uuid, quantity: i32) -> AppResult<Option<Book>>;
}

/// Borrow persistence operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowStore: Send + Sync {
    async fn insert(&self, borrow: &NewBorrow) -> AppResult<Borrow>;

    /// Borrowed quantity per book, ordered by title
    async fn summary(&self) -> AppResult<Vec<BorrowSummary>>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub borrows: Arc<dyn BorrowStore>,
}

impl Repository {
    /// Create a Postgres-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            borrows: Arc::new(borrows::BorrowsRepository::new(pool)),
        }
    }

    /// Create a repository backed by process memory
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            books: store.clone(),
            borrows: store,
        }
    }

    pub fn from_stores(books: Arc<dyn BookStore>, borrows: Arc<dyn BorrowStore>) -> Self {
        Self { books, borrows }
    }
}
