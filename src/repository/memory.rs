//! In-memory storage backend
//!
//! Mirrors the Postgres repositories: same ordering rules (sort field, then
//! id ascending), unique ISBNs, and borrows removed together with their book.

use async_trait::async_trait;
use chrono::Utc;
use std::{cmp::Ordering, collections::HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookStore, BorrowStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Book, BookQuery, Borrow, BorrowSummary, BorrowedBook, Genre, NewBook, NewBorrow, SortDirection,
        SortField,
    },
};

#[derive(Default)]
struct State {
    books: HashMap<Uuid, Book>,
    borrows: Vec<Borrow>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Book, b: &Book, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Author => a.author.cmp(&b.author),
        SortField::Genre => a.genre.cmp(&b.genre),
        SortField::Isbn => a.isbn.cmp(&b.isbn),
        SortField::Copies => a.copies.cmp(&b.copies),
        SortField::Available => a.available.cmp(&b.available),
    }
}

fn isbn_taken(state: &State, isbn: &str, except: Option<Uuid>) -> bool {
    state
        .books
        .values()
        .any(|b| b.isbn == isbn && Some(b.id) != except)
}

fn duplicate_isbn() -> AppError {
    AppError::Conflict("A book with this ISBN already exists".to_string())
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;

        let mut books: Vec<&Book> = state
            .books
            .values()
            .filter(|b| query.genre.map_or(true, |g| b.genre == g))
            .collect();

        books.sort_by(|a, b| {
            let ord = compare(a, b, query.sort_by);
            let ord = match query.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            };
            ord.then_with(|| a.id.cmp(&b.id))
        });

        let offset = usize::try_from(query.pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.pagination.limit).unwrap_or(usize::MAX);

        Ok(books.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self, genre: Option<Genre>) -> AppResult<i64> {
        let state = self.state.read().await;
        let total = state
            .books
            .values()
            .filter(|b| genre.map_or(true, |g| b.genre == g))
            .count();
        Ok(total as i64)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.state.read().await.books.get(&id).cloned())
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let mut state = self.state.write().await;
        if isbn_taken(&state, &book.isbn, None) {
            return Err(duplicate_isbn());
        }

        let now = Utc::now();
        let stored = Book {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre,
            isbn: book.isbn.clone(),
            description: book.description.clone(),
            copies: book.copies,
            available: book.available,
            created_at: now,
            updated_at: now,
        };
        state.books.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&id) {
            return Ok(None);
        }
        if isbn_taken(&state, &book.isbn, Some(id)) {
            return Err(duplicate_isbn());
        }

        let Some(stored) = state.books.get_mut(&id) else {
            return Ok(None);
        };
        stored.title = book.title.clone();
        stored.author = book.author.clone();
        stored.genre = book.genre;
        stored.isbn = book.isbn.clone();
        stored.description = book.description.clone();
        stored.copies = book.copies;
        stored.available = book.available;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.books.remove(&id).is_none() {
            return Ok(false);
        }
        state.borrows.retain(|b| b.book_id != id);
        Ok(true)
    }

    async fn take_copies(&self, id: Uuid, quantity: i32) -> AppResult<Option<Book>> {
        let mut state = self.state.write().await;
        match state.books.get_mut(&id) {
            Some(book) if book.copies >= quantity => {
                book.copies -= quantity;
                book.available = book.copies > 0;
                book.updated_at = Utc::now();
                Ok(Some(book.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl BorrowStore for MemoryStore {
    async fn insert(&self, borrow: &NewBorrow) -> AppResult<Borrow> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&borrow.book_id) {
            return Err(AppError::NotFound("Book not found".to_string()));
        }

        let now = Utc::now();
        let stored = Borrow {
            id: Uuid::new_v4(),
            book_id: borrow.book_id,
            quantity: borrow.quantity,
            due_date: borrow.due_date,
            created_at: now,
            updated_at: now,
        };
        state.borrows.push(stored.clone());
        Ok(stored)
    }

    async fn summary(&self) -> AppResult<Vec<BorrowSummary>> {
        let state = self.state.read().await;

        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for borrow in &state.borrows {
            *totals.entry(borrow.book_id).or_default() += i64::from(borrow.quantity);
        }

        let mut summary: Vec<BorrowSummary> = totals
            .into_iter()
            .filter_map(|(book_id, total_quantity)| {
                state.books.get(&book_id).map(|book| BorrowSummary {
                    book: BorrowedBook {
                        title: book.title.clone(),
                        isbn: book.isbn.clone(),
                    },
                    total_quantity,
                })
            })
            .collect();
        summary.sort_by(|a, b| (&a.book.title, &a.book.isbn).cmp(&(&b.book.title, &b.book.isbn)));
        Ok(summary)
    }
}
